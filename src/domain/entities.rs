//! Domain entities mirrored from persistent storage.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::PostStatus;

/// A blog post as persisted in the document collection.
///
/// `content_html` is author-trusted input: it is stored and rendered
/// verbatim, without sanitization. `id`, `created_at`, and `updated_at` are
/// assigned exclusively by the write path; clients never supply them.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content_html: String,
    pub meta_title: String,
    pub meta_description: String,
    pub cover_image: Option<String>,
    pub status: PostStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl PostRecord {
    /// Whether the post has been edited since creation.
    pub fn was_updated(&self) -> bool {
        self.updated_at != self.created_at
    }
}
