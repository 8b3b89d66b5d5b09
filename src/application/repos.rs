//! Repository traits describing persistence adapters.
//!
//! The document store is a collaborator, not part of this crate: the trait
//! below is the contract the rest of the system expects from it. Rows cross
//! this boundary as validated [`PostRecord`]s; anything the store hands back
//! that fails validation surfaces as an error instead of propagating.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::PostRecord;
use crate::domain::types::PostStatus;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("resource not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("validation failed: {message}")]
    Validation { message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Fields for a new post. Identifier and timestamps are assigned by the
/// repository, never supplied here.
#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub slug: String,
    pub content_html: String,
    pub meta_title: String,
    pub meta_description: String,
    pub cover_image: Option<String>,
    pub status: PostStatus,
}

/// Partial update: only supplied fields are written. `updated_at` is always
/// refreshed, and the slug is never recomputed from the title here.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content_html: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    /// `Some(None)` clears the cover image; `None` leaves it untouched.
    pub cover_image: Option<Option<String>>,
    pub status: Option<PostStatus>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.slug.is_none()
            && self.content_html.is_none()
            && self.meta_title.is_none()
            && self.meta_description.is_none()
            && self.cover_image.is_none()
            && self.status.is_none()
    }
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Persist a new post. Requires a non-empty title and slug; timestamps
    /// are stamped by the store.
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    /// Fetch by identifier regardless of status. Absent posts are `None`,
    /// not an error.
    async fn find_post(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;

    /// Fetch by slug regardless of status.
    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    /// Fetch a published post by slug; drafts are invisible here.
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    /// Every post, newest first. Admin surface only.
    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError>;

    /// Published posts, newest first.
    async fn list_published(&self) -> Result<Vec<PostRecord>, RepoError>;

    /// Merge the supplied fields into an existing post and refresh
    /// `updated_at`. An empty patch writes nothing and returns the stored
    /// row unchanged, `updated_at` included. Fails with
    /// [`RepoError::NotFound`] when the id does not resolve.
    async fn update_post(&self, id: Uuid, patch: PostPatch) -> Result<PostRecord, RepoError>;

    /// Delete a post. Deleting an id that does not resolve fails with
    /// [`RepoError::NotFound`].
    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError>;

    /// Liveness probe against the backing store.
    async fn ping(&self) -> Result<(), RepoError>;
}
