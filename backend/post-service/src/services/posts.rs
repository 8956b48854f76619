/// Post ingestion orchestrator
///
/// Owns the lifecycle of a post during ingestion: validates the incoming
/// form, hands the binary to the media store, derives the post record, and
/// persists the post together with its tag links in one transaction.
use crate::db::{post_repo, post_repo::NewPost};
use crate::error::{AppError, Result};
use crate::models::{AccessTier, MediaKind, NewPostForm, PostSummary, Visibility};
use crate::services::tags::{parse_tags, TagService};
use crate::services::MediaStore;
use bytes::Bytes;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Video file extensions the media host names thumbnails after: a stored
/// `clip.mov` has a sibling `clip.jpg`. Substitution applies only to
/// these exact suffixes.
const VIDEO_THUMBNAIL_EXTENSIONS: [&str; 3] = [".mp4", ".mov", ".avi"];

/// Derive the thumbnail URL for a stored video by swapping the extension.
/// Returns None when the URL does not end in a known video extension.
pub fn derive_thumbnail_url(media_url: &str) -> Option<String> {
    for ext in VIDEO_THUMBNAIL_EXTENSIONS {
        if let Some(stem) = media_url.strip_suffix(ext) {
            return Some(format!("{}.jpg", stem));
        }
    }
    None
}

/// Validated ingestion fields, ready for persistence
struct ValidatedForm {
    file: Bytes,
    title: String,
    description: Option<String>,
    visibility: Visibility,
    access_tier: AccessTier,
    price: Option<String>,
    is_downloadable: bool,
    tag_names: Vec<String>,
}

/// Validate and coerce the raw form. Runs before any external call so a
/// bad request never triggers an upload.
fn validate_form(form: NewPostForm) -> Result<ValidatedForm> {
    let file = match form.file {
        Some(file) if !file.is_empty() => file,
        _ => return Err(AppError::ValidationError("file is required".to_string())),
    };

    let title = form.title.as_deref().unwrap_or("").trim().to_string();
    if title.is_empty() {
        return Err(AppError::ValidationError("title is required".to_string()));
    }

    // Unrecognized values coerce to defaults rather than erroring; this
    // mirrors the client contract (see DESIGN.md).
    let visibility = form
        .visibility
        .as_deref()
        .and_then(Visibility::from_str)
        .unwrap_or(Visibility::Public);
    let access_tier = form
        .access_type
        .as_deref()
        .and_then(AccessTier::from_str)
        .unwrap_or(AccessTier::Free);

    // Price is meaningful only for paid posts and is forced to None
    // otherwise, keeping the access_tier/price invariant at the source.
    let price = match access_tier {
        AccessTier::Paid => {
            let raw = form.price.as_deref().unwrap_or("").trim().to_string();
            if raw.is_empty() {
                return Err(AppError::ValidationError(
                    "price is required for paid posts".to_string(),
                ));
            }
            let parsed: f64 = raw.parse().map_err(|_| {
                AppError::ValidationError("price must be a decimal number".to_string())
            })?;
            if !parsed.is_finite() || parsed <= 0.0 {
                return Err(AppError::ValidationError(
                    "price must be a positive decimal number".to_string(),
                ));
            }
            Some(raw)
        }
        AccessTier::Free => None,
    };

    let is_downloadable = form.is_downloadable.as_deref() == Some("true");

    let tag_names = form
        .tags
        .as_deref()
        .map(parse_tags)
        .unwrap_or_default();

    Ok(ValidatedForm {
        file,
        title,
        description: form.description.filter(|d| !d.is_empty()),
        visibility,
        access_tier,
        price,
        is_downloadable,
        tag_names,
    })
}

/// Post service handling ingestion and retrieval
pub struct PostService {
    pool: PgPool,
    media_store: Arc<dyn MediaStore>,
    upload_folder: String,
}

impl PostService {
    pub fn new(pool: PgPool, media_store: Arc<dyn MediaStore>, upload_folder: String) -> Self {
        Self {
            pool,
            media_store,
            upload_folder,
        }
    }

    /// Ingest one upload: validate, store the binary, reconcile tags, and
    /// persist the post plus its tag links atomically.
    ///
    /// Tag rows are reconciled before the transaction opens; they are
    /// shared, never-deleted entities, so a row created for a request
    /// that later fails is reusable, not garbage. The post and its links
    /// either all commit or none do. A database failure after the upload
    /// leaves the binary orphaned upstream; the caller sees the error.
    pub async fn ingest(&self, user_id: Uuid, form: NewPostForm) -> Result<PostSummary> {
        let form = validate_form(form)?;

        let stored = self
            .media_store
            .store(form.file, &self.upload_folder)
            .await?;

        let thumbnail_url = match stored.kind {
            MediaKind::Video => derive_thumbnail_url(&stored.url),
            MediaKind::Image => None,
        };

        let tag_ids = TagService::new(self.pool.clone())
            .reconcile(&form.tag_names)
            .await?;

        let post_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        let post = post_repo::create_post(
            &mut tx,
            &NewPost {
                id: post_id,
                user_id,
                media_kind: stored.kind.as_str(),
                title: &form.title,
                description: form.description.as_deref(),
                media_url: &stored.url,
                thumbnail_url: thumbnail_url.as_deref(),
                visibility: form.visibility.as_str(),
                access_tier: form.access_tier.as_str(),
                price: form.price.as_deref(),
                is_downloadable: form.is_downloadable,
            },
        )
        .await?;

        for tag_id in &tag_ids {
            post_repo::link_tag(&mut tx, post.id, *tag_id).await?;
        }

        tx.commit().await?;

        tracing::info!(
            post_id = %post.id,
            user_id = %user_id,
            kind = %post.media_kind,
            bytes = stored.size_bytes,
            tags = tag_ids.len(),
            "post ingested"
        );

        Ok(PostSummary::from(post))
    }

    /// Search public posts by title/tag substring. A blank query returns
    /// nothing; there is no implicit "list all".
    pub async fn search(&self, query: &str) -> Result<Vec<PostSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let posts = post_repo::search_public_posts(&self.pool, query).await?;
        Ok(posts.into_iter().map(PostSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPostForm;
    use crate::services::StoredMedia;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts invocations; never meant to be reached in these tests.
    struct CountingStore {
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MediaStore for CountingStore {
        async fn store(&self, _content: Bytes, _folder: &str) -> Result<StoredMedia> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(StoredMedia {
                url: "https://media.example.com/prism/x.jpg".to_string(),
                kind: MediaKind::Image,
                original_name: None,
                size_bytes: 3,
            })
        }
    }

    /// Pool that never connects; validation failures must return before
    /// the database or the store is touched.
    fn lazy_pool() -> PgPool {
        PgPool::connect_lazy("postgresql://localhost/unreachable").unwrap()
    }

    fn service_with(store: Arc<CountingStore>) -> PostService {
        PostService::new(lazy_pool(), store, "prism".to_string())
    }

    #[test]
    fn test_derive_thumbnail_url_for_known_video_extensions() {
        assert_eq!(
            derive_thumbnail_url("https://media.example.com/clip.mov"),
            Some("https://media.example.com/clip.jpg".to_string())
        );
        assert_eq!(
            derive_thumbnail_url("https://media.example.com/clip.mp4"),
            Some("https://media.example.com/clip.jpg".to_string())
        );
        assert_eq!(
            derive_thumbnail_url("https://media.example.com/clip.avi"),
            Some("https://media.example.com/clip.jpg".to_string())
        );
    }

    #[test]
    fn test_derive_thumbnail_url_unknown_extension() {
        assert_eq!(derive_thumbnail_url("https://media.example.com/clip.mkv"), None);
        assert_eq!(derive_thumbnail_url("https://media.example.com/photo.jpg"), None);
    }

    #[test]
    fn test_validate_rejects_unparseable_price_for_paid() {
        let form = NewPostForm {
            file: Some(Bytes::from_static(b"jpeg")),
            title: Some("Sunset".to_string()),
            access_type: Some("paid".to_string()),
            price: Some("4.99usd".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_form(form),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_nulls_price_for_free_posts() {
        let form = NewPostForm {
            file: Some(Bytes::from_static(b"jpeg")),
            title: Some("Sunset".to_string()),
            price: Some("4.99".to_string()),
            ..Default::default()
        };
        let validated = validate_form(form).unwrap();
        assert_eq!(validated.access_tier, AccessTier::Free);
        assert_eq!(validated.price, None);
    }

    #[test]
    fn test_validate_parses_downloadable_flag_by_string_equality() {
        let base = NewPostForm {
            file: Some(Bytes::from_static(b"jpeg")),
            title: Some("Sunset".to_string()),
            ..Default::default()
        };

        let mut form = base.clone();
        form.is_downloadable = Some("true".to_string());
        assert!(validate_form(form).unwrap().is_downloadable);

        let mut form = base.clone();
        form.is_downloadable = Some("TRUE".to_string());
        assert!(!validate_form(form).unwrap().is_downloadable);

        assert!(!validate_form(base).unwrap().is_downloadable);
    }

    #[tokio::test]
    async fn test_blank_search_query_returns_empty_without_querying() {
        let store = Arc::new(CountingStore::new());
        let service = service_with(store);

        // The lazy pool would error on any query; a blank search never
        // issues one.
        assert!(service.search("").await.unwrap().is_empty());
        assert!(service.search("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_fails_without_upload() {
        let store = Arc::new(CountingStore::new());
        let service = service_with(store.clone());

        let form = NewPostForm {
            title: Some("Sunset".to_string()),
            ..Default::default()
        };

        let err = service.ingest(Uuid::new_v4(), form).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_title_fails_without_upload() {
        let store = Arc::new(CountingStore::new());
        let service = service_with(store.clone());

        let form = NewPostForm {
            file: Some(Bytes::from_static(b"jpeg")),
            title: Some("   ".to_string()),
            ..Default::default()
        };

        let err = service.ingest(Uuid::new_v4(), form).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_paid_without_price_fails_without_upload() {
        let store = Arc::new(CountingStore::new());
        let service = service_with(store.clone());

        let form = NewPostForm {
            file: Some(Bytes::from_static(b"jpeg")),
            title: Some("Sunset".to_string()),
            access_type: Some("paid".to_string()),
            ..Default::default()
        };

        let err = service.ingest(Uuid::new_v4(), form).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(store.call_count(), 0);
    }
}
