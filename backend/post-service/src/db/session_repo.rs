use sqlx::PgPool;
use uuid::Uuid;

/// Resolve a session token to its user, if the session exists and has not
/// expired. This is the whole of the "current user" contract; how tokens
/// are minted is owned by the identity layer, not this service.
pub async fn find_user_by_token(pool: &PgPool, token: &str) -> Result<Option<Uuid>, sqlx::Error> {
    let row = sqlx::query_as::<_, (Uuid,)>(
        r#"
        SELECT user_id
        FROM sessions
        WHERE token = $1 AND expires_at > NOW()
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(user_id,)| user_id))
}
