use crate::models::Tag;
use sqlx::PgPool;
use uuid::Uuid;

/// Find a tag by exact name
pub async fn find_tag_by_name(pool: &PgPool, name: &str) -> Result<Option<Tag>, sqlx::Error> {
    let tag = sqlx::query_as::<_, Tag>(
        r#"
        SELECT id, name
        FROM tags
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(tag)
}

/// Insert a tag row with a caller-generated identifier.
///
/// Uses INSERT ... ON CONFLICT DO NOTHING so that a concurrent insert of
/// the same name never aborts the statement; returns None when the name
/// already exists and the caller should re-fetch the winning row.
pub async fn insert_tag(pool: &PgPool, id: Uuid, name: &str) -> Result<Option<Tag>, sqlx::Error> {
    let tag = sqlx::query_as::<_, Tag>(
        r#"
        INSERT INTO tags (id, name)
        VALUES ($1, $2)
        ON CONFLICT (name) DO NOTHING
        RETURNING id, name
        "#,
    )
    .bind(id)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(tag)
}
