//! Admin-side post management: the dashboard overview and the single
//! entry point for persisting an editor submission.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::admin::editor::PostDraft;
use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::domain::slug::SlugError;
use crate::domain::types::PostStatus;

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<SlugError> for AdminPostError {
    fn from(err: SlugError) -> Self {
        match err {
            SlugError::EmptyInput => Self::Validation("title is required"),
            SlugError::Unrepresentable { .. } => {
                Self::Validation("title cannot be turned into a slug")
            }
        }
    }
}

/// What `save_draft` did with the submission.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft was clean; nothing was written.
    Unchanged { id: Uuid },
    Created { id: Uuid },
    Updated { id: Uuid },
}

impl SubmitOutcome {
    pub fn post_id(&self) -> Uuid {
        match self {
            Self::Unchanged { id } | Self::Created { id } | Self::Updated { id } => *id,
        }
    }
}

pub struct DashboardOverview {
    pub posts: Vec<PostRecord>,
    pub total: usize,
    pub published: usize,
    pub drafts: usize,
}

pub struct AdminPostService {
    posts: Arc<dyn PostsRepo>,
}

impl AdminPostService {
    pub fn new(posts: Arc<dyn PostsRepo>) -> Self {
        Self { posts }
    }

    pub async fn overview(&self) -> Result<DashboardOverview, RepoError> {
        let posts = self.posts.list_posts().await?;
        let published = posts
            .iter()
            .filter(|p| p.status == PostStatus::Published)
            .count();
        let total = posts.len();
        Ok(DashboardOverview {
            drafts: total - published,
            total,
            published,
            posts,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<PostRecord, RepoError> {
        self.posts.find_post(id).await?.ok_or(RepoError::NotFound)
    }

    /// Persist an editor submission.
    ///
    /// The slug is derived from the title when left blank, but an explicit
    /// slug is stored verbatim and never recomputed on edit. A clean edit
    /// submission writes nothing and reports [`SubmitOutcome::Unchanged`].
    pub async fn save_draft(
        &self,
        mut draft: PostDraft,
    ) -> Result<SubmitOutcome, AdminPostError> {
        if draft.title.trim().is_empty() {
            return Err(AdminPostError::Validation("title is required"));
        }
        draft.autofill_slug()?;

        match draft.existing_id {
            None => {
                let record = self.posts.create_post(draft.into_create_params()).await?;
                Ok(SubmitOutcome::Created { id: record.id })
            }
            Some(id) => {
                if !draft.is_dirty() {
                    return Ok(SubmitOutcome::Unchanged { id });
                }
                let stored = self
                    .posts
                    .find_post(id)
                    .await?
                    .ok_or(RepoError::NotFound)?;
                let patch = draft.diff_against(&stored);
                if patch.is_empty() {
                    return Ok(SubmitOutcome::Unchanged { id });
                }
                let record = self.posts.update_post(id, patch).await?;
                Ok(SubmitOutcome::Updated { id: record.id })
            }
        }
    }

    /// Delete strictly: a missing id is an error, not a silent success.
    pub async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        self.posts.delete_post(id).await
    }
}
