/// HTTP handlers for post endpoints
///
/// This module contains handlers for:
/// - Posts: multipart ingestion and retrieval
/// - Search: title/tag search over public posts
pub mod posts;
pub mod search;

pub use posts::{create_post, get_post};
pub use search::search_posts;
