use crate::models::Post;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Column values for a post row about to be inserted
#[derive(Debug)]
pub struct NewPost<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub media_kind: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub media_url: &'a str,
    pub thumbnail_url: Option<&'a str>,
    pub visibility: &'a str,
    pub access_tier: &'a str,
    pub price: Option<&'a str>,
    pub is_downloadable: bool,
}

/// Insert a post row inside the caller's transaction.
/// Returns the created post.
pub async fn create_post(
    tx: &mut Transaction<'_, Postgres>,
    new: &NewPost<'_>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, user_id, media_kind, title, description, media_url,
                           thumbnail_url, visibility, access_tier, price, is_downloadable)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id, user_id, media_kind, title, description, media_url,
                  thumbnail_url, visibility, access_tier, price, is_downloadable, created_at
        "#,
    )
    .bind(new.id)
    .bind(new.user_id)
    .bind(new.media_kind)
    .bind(new.title)
    .bind(new.description)
    .bind(new.media_url)
    .bind(new.thumbnail_url)
    .bind(new.visibility)
    .bind(new.access_tier)
    .bind(new.price)
    .bind(new.is_downloadable)
    .fetch_one(&mut **tx)
    .await?;

    Ok(post)
}

/// Link a post to a tag inside the caller's transaction.
/// The (post_id, tag_id) pair is unique; re-linking is a no-op.
pub async fn link_tag(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    tag_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO post_tags (post_id, tag_id)
        VALUES ($1, $2)
        ON CONFLICT (post_id, tag_id) DO NOTHING
        "#,
    )
    .bind(post_id)
    .bind(tag_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Find a post by ID
pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, user_id, media_kind, title, description, media_url,
               thumbnail_url, visibility, access_tier, price, is_downloadable, created_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Get all tag names linked to a post, alphabetically
pub async fn get_post_tag_names(pool: &PgPool, post_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String,)>(
        r#"
        SELECT t.name
        FROM post_tags pt
        JOIN tags t ON t.id = pt.tag_id
        WHERE pt.post_id = $1
        ORDER BY t.name
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(name,)| name).collect())
}

/// Case-insensitive substring search against title and tag names of
/// public posts. Private posts never match, regardless of owner.
/// Ordering is newest-first with id as a deterministic tie-breaker.
pub async fn search_public_posts(pool: &PgPool, query: &str) -> Result<Vec<Post>, sqlx::Error> {
    let pattern = format!("%{}%", query);

    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT DISTINCT p.id, p.user_id, p.media_kind, p.title, p.description, p.media_url,
               p.thumbnail_url, p.visibility, p.access_tier, p.price, p.is_downloadable, p.created_at
        FROM posts p
        LEFT JOIN post_tags pt ON pt.post_id = p.id
        LEFT JOIN tags t ON t.id = pt.tag_id
        WHERE p.visibility = 'public'
          AND (p.title ILIKE $1 OR t.name ILIKE $1)
        ORDER BY p.created_at DESC, p.id
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}
