/// Service layer for post ingestion
///
/// This module provides business logic for:
/// - Media store: uploading binaries to the external media host
/// - Tag service: reconciling freeform tag names to stable identifiers
/// - Post service: the ingestion orchestrator
pub mod media_store;
pub mod posts;
pub mod tags;

pub use media_store::{HttpMediaStore, MediaStore, StoredMedia};
pub use posts::PostService;
pub use tags::TagService;
