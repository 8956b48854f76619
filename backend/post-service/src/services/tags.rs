/// Tag reconciliation
///
/// Freeform tag strings become stable tag identifiers. Rows are created
/// lazily and shared across posts; this pipeline never deletes them.
use crate::db::tag_repo;
use crate::error::{AppError, Result};
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

/// Parse the raw `tags` form field. Accepts a JSON array of strings or a
/// comma-separated list; malformed JSON falls back to comma-splitting
/// instead of failing the request. Entries are trimmed and empties
/// dropped. Duplicates are kept here; reconciliation de-duplicates.
pub fn parse_tags(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    if let Ok(parsed) = serde_json::from_str::<Vec<String>>(raw) {
        return parsed
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
    }

    raw.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Trim, drop empties, and de-duplicate while preserving first-seen order
pub fn dedupe_names(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        if seen.insert(name.to_string()) {
            out.push(name.to_string());
        }
    }
    out
}

/// Resolves tag names to identifiers, creating rows for unseen names
pub struct TagService {
    pool: PgPool,
}

impl TagService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve each de-duplicated name to a tag identifier, one lookup at
    /// a time. No in-process lock serializes this: two concurrent requests
    /// introducing the same new name may both miss the lookup, in which
    /// case the uniqueness constraint on tags.name makes the losing insert
    /// return no row and the winner's row is fetched instead. The conflict
    /// never reaches the caller.
    pub async fn reconcile(&self, names: &[String]) -> Result<Vec<Uuid>> {
        let names = dedupe_names(names);
        let mut ids = Vec::with_capacity(names.len());

        for name in &names {
            if let Some(tag) = tag_repo::find_tag_by_name(&self.pool, name).await? {
                ids.push(tag.id);
                continue;
            }

            match tag_repo::insert_tag(&self.pool, Uuid::new_v4(), name).await? {
                Some(tag) => ids.push(tag.id),
                None => {
                    // Lost the insert race; the winning row exists now.
                    let tag = tag_repo::find_tag_by_name(&self.pool, name)
                        .await?
                        .ok_or_else(|| {
                            AppError::DatabaseError(format!(
                                "tag '{}' missing after insert conflict",
                                name
                            ))
                        })?;
                    tracing::debug!(tag = %name, "reused concurrently created tag");
                    ids.push(tag.id);
                }
            }
        }

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_json_array() {
        assert_eq!(
            parse_tags(r#"["nature","sunset"]"#),
            vec!["nature".to_string(), "sunset".to_string()]
        );
    }

    #[test]
    fn test_parse_tags_json_array_trims_and_drops_empties() {
        assert_eq!(
            parse_tags(r#"[" nature ", "", "  "]"#),
            vec!["nature".to_string()]
        );
    }

    #[test]
    fn test_parse_tags_malformed_json_falls_back_to_csv() {
        // Literal text that is not valid JSON must comma-split instead of
        // failing the whole request.
        assert_eq!(
            parse_tags("a, b, c"),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_parse_tags_csv_with_blanks() {
        assert_eq!(
            parse_tags("one,, two ,  "),
            vec!["one".to_string(), "two".to_string()]
        );
    }

    #[test]
    fn test_parse_tags_empty_input() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags("   ").is_empty());
    }

    #[test]
    fn test_dedupe_names_preserves_first_seen_order() {
        let names = vec![
            "sunset".to_string(),
            "nature".to_string(),
            "sunset".to_string(),
            " nature ".to_string(),
        ];
        assert_eq!(
            dedupe_names(&names),
            vec!["sunset".to_string(), "nature".to_string()]
        );
    }

    #[test]
    fn test_dedupe_names_is_case_sensitive() {
        let names = vec!["Nature".to_string(), "nature".to_string()];
        assert_eq!(dedupe_names(&names).len(), 2);
    }
}
