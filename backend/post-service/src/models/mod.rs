/// Data models for post-service
///
/// This module defines structures for:
/// - Post: user-submitted media items with metadata
/// - Tag: shared labels referenced by zero or more posts
/// - Request/response DTOs for the ingestion and query endpoints
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ========================================
// Post Models
// ========================================

/// Classification of uploaded content, as detected by the media host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// Whether a post is discoverable by users other than its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            _ => None,
        }
    }
}

/// Whether viewing/downloading a post requires payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessTier {
    Free,
    Paid,
}

impl AccessTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Paid => "paid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "free" => Some(Self::Free),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

/// Post database entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub media_kind: String,
    pub title: String,
    pub description: Option<String>,
    pub media_url: String,
    /// Non-null only when media_kind is "video"
    pub thumbnail_url: Option<String>,
    pub visibility: String,
    pub access_tier: String,
    /// Non-null iff access_tier is "paid"
    pub price: Option<String>,
    pub is_downloadable: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn get_kind(&self) -> MediaKind {
        MediaKind::from_str(&self.media_kind).unwrap_or(MediaKind::Image)
    }

    pub fn get_visibility(&self) -> Visibility {
        Visibility::from_str(&self.visibility).unwrap_or(Visibility::Public)
    }

    pub fn get_access_tier(&self) -> AccessTier {
        AccessTier::from_str(&self.access_tier).unwrap_or(AccessTier::Free)
    }
}

// ========================================
// Tag Models
// ========================================

/// Tag database entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

// ========================================
// Request/Response DTOs
// ========================================

/// Multipart form fields of the ingestion endpoint, as received.
/// Field-level validation and coercion happen in the service layer.
#[derive(Debug, Clone, Default)]
pub struct NewPostForm {
    pub file: Option<Bytes>,
    pub file_name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub visibility: Option<String>,
    pub access_type: Option<String>,
    pub price: Option<String>,
    pub is_downloadable: Option<String>,
    pub tags: Option<String>,
}

/// Compact post projection returned by ingestion and search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    #[serde(rename = "postId")]
    pub post_id: Uuid,
    #[serde(rename = "mediaUrl")]
    pub media_url: String,
    #[serde(rename = "type")]
    pub media_kind: String,
}

impl From<Post> for PostSummary {
    fn from(post: Post) -> Self {
        Self {
            post_id: post.id,
            media_url: post.media_url,
            media_kind: post.media_kind,
        }
    }
}

/// Success body of the ingestion endpoint
#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    pub message: String,
    #[serde(rename = "postId")]
    pub post_id: Uuid,
    #[serde(rename = "mediaUrl")]
    pub media_url: String,
    #[serde(rename = "type")]
    pub media_kind: String,
}

impl IngestResponse {
    pub fn from_summary(summary: PostSummary) -> Self {
        Self {
            message: "Media uploaded and post created successfully!".to_string(),
            post_id: summary.post_id,
            media_url: summary.media_url,
            media_kind: summary.media_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_round_trip() {
        assert_eq!(MediaKind::from_str("image"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_str("video"), Some(MediaKind::Video));
        assert_eq!(MediaKind::Video.as_str(), "video");
        assert_eq!(MediaKind::from_str("raw"), None);
    }

    #[test]
    fn test_unrecognized_visibility_coerces_to_public() {
        let post = Post {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            media_kind: "image".to_string(),
            title: "t".to_string(),
            description: None,
            media_url: "https://cdn.example.com/a.jpg".to_string(),
            thumbnail_url: None,
            visibility: "friends-only".to_string(),
            access_tier: "free".to_string(),
            price: None,
            is_downloadable: false,
            created_at: Utc::now(),
        };
        assert_eq!(post.get_visibility(), Visibility::Public);
    }

    #[test]
    fn test_post_summary_serializes_with_api_field_names() {
        let summary = PostSummary {
            post_id: Uuid::nil(),
            media_url: "https://cdn.example.com/a.jpg".to_string(),
            media_kind: "image".to_string(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("postId").is_some());
        assert!(json.get("mediaUrl").is_some());
        assert_eq!(json.get("type").unwrap(), "image");
    }
}
