/// Search handler - read-only query surface over public posts
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::services::{MediaStore, PostService};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Search public posts by title or tag substring, case-insensitively.
/// An empty query returns an empty list.
pub async fn search_posts(
    pool: web::Data<PgPool>,
    media_store: web::Data<Arc<dyn MediaStore>>,
    config: web::Data<Config>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let service = PostService::new(
        (**pool).clone(),
        media_store.get_ref().clone(),
        config.media_host.folder.clone(),
    );
    let results = service.search(&query.q).await?;

    Ok(HttpResponse::Ok().json(results))
}
