/// Database access layer
///
/// This module provides repository implementations for posts, tags, the
/// post-to-tag association table, and session lookups.
pub mod post_repo;
pub mod session_repo;
pub mod tag_repo;
