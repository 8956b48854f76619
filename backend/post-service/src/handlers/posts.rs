/// Post handlers - HTTP endpoints for ingestion and retrieval
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use bytes::Bytes;
use futures::StreamExt;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::db::post_repo;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{IngestResponse, NewPostForm};
use crate::services::{MediaStore, PostService};

/// Read the multipart payload into a form, enforcing the body cap while
/// streaming so oversized requests are rejected before full buffering.
async fn read_post_form(mut payload: Multipart, max_bytes: usize) -> Result<NewPostForm> {
    let mut form = NewPostForm::default();
    let mut total_bytes: usize = 0;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?;

        let name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        if name == "file" {
            if let Some(filename) = field.content_disposition().and_then(|cd| cd.get_filename()) {
                form.file_name = Some(filename.to_string());
            }

            let mut data = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk =
                    chunk.map_err(|e| AppError::BadRequest(format!("File read error: {}", e)))?;
                total_bytes += chunk.len();
                if total_bytes > max_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "request body exceeds {} bytes",
                        max_bytes
                    )));
                }
                data.extend_from_slice(&chunk);
            }

            if !data.is_empty() {
                form.file = Some(Bytes::from(data));
            }
            continue;
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::BadRequest(format!("Field read error: {}", e)))?;
            total_bytes += chunk.len();
            if total_bytes > max_bytes {
                return Err(AppError::PayloadTooLarge(format!(
                    "request body exceeds {} bytes",
                    max_bytes
                )));
            }
            data.extend_from_slice(&chunk);
        }
        let value = String::from_utf8_lossy(&data).to_string();

        match name.as_str() {
            "title" => form.title = Some(value),
            "description" => form.description = Some(value),
            "visibility" => form.visibility = Some(value),
            "accessType" => form.access_type = Some(value),
            "price" => form.price = Some(value),
            "isDownloadable" => form.is_downloadable = Some(value),
            "tags" => form.tags = Some(value),
            _ => {
                // Ignore unknown fields
            }
        }
    }

    Ok(form)
}

/// Ingest a new post from a multipart upload
pub async fn create_post(
    pool: web::Data<PgPool>,
    media_store: web::Data<Arc<dyn MediaStore>>,
    config: web::Data<Config>,
    user_id: UserId,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = read_post_form(payload, config.upload.max_body_bytes).await?;

    let service = PostService::new(
        (**pool).clone(),
        media_store.get_ref().clone(),
        config.media_host.folder.clone(),
    );
    let summary = service.ingest(user_id.0, form).await?;

    Ok(HttpResponse::Ok().json(IngestResponse::from_summary(summary)))
}

/// Get a post by ID
pub async fn get_post(pool: web::Data<PgPool>, post_id: web::Path<Uuid>) -> Result<HttpResponse> {
    match post_repo::find_post_by_id(pool.get_ref(), *post_id).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => Err(AppError::NotFound("Post not found".to_string())),
    }
}
