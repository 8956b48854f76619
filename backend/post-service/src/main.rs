/// Post Service - HTTP Server
///
/// Receives multipart media uploads, stores binaries on the external
/// media host, and persists posts with their tag links.
use actix_web::{middleware as actix_middleware, web, App, HttpResponse, HttpServer};
use post_service::handlers;
use post_service::middleware::SessionAuthMiddleware;
use post_service::services::{HttpMediaStore, MediaStore};
use post_service::Config;
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");

    let bind_address = format!("{}:{}", config.app.host, config.app.port);

    // Initialize database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    // Media host client is built once and shared; handlers receive it by
    // reference rather than reaching for global state.
    let media_store: Arc<dyn MediaStore> = Arc::new(
        HttpMediaStore::from_config(&config.media_host).map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to initialize media host client: {e}"),
            )
        })?,
    );

    tracing::info!(%bind_address, "post-service starting HTTP server");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(media_store.clone()))
            .wrap(actix_middleware::Logger::default())
            .route(
                "/api/v1/health",
                web::get()
                    .to(|| async { HttpResponse::Ok().json(serde_json::json!({"status": "ok"})) }),
            )
            .route(
                "/api/v1/health/ready",
                web::get().to(|| async { HttpResponse::Ok().finish() }),
            )
            .route(
                "/api/v1/health/live",
                web::get().to(|| async { HttpResponse::Ok().finish() }),
            )
            .route(
                "/api/v1/openapi.json",
                web::get().to(|| async {
                    use utoipa::OpenApi;
                    HttpResponse::Ok()
                        .content_type("application/json")
                        .json(post_service::openapi::ApiDoc::openapi())
                }),
            )
            .service(
                web::scope("/api/v1")
                    .wrap(SessionAuthMiddleware)
                    .service(
                        web::scope("/posts")
                            .route("", web::post().to(handlers::create_post))
                            .route("/search", web::get().to(handlers::search_posts))
                            .route("/{post_id}", web::get().to(handlers::get_post)),
                    ),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
