//! Editing surface for a single post.
//!
//! A [`PostDraft`] holds the pending field values for the editor form and
//! tracks whether anything actually changed. Setters only mark the draft
//! dirty when the incoming value differs from the current one, so a clean
//! round trip through the form submits a no-op.

use uuid::Uuid;

use crate::application::repos::{CreatePostParams, PostPatch};
use crate::domain::entities::PostRecord;
use crate::domain::slug::{self, SlugError};
use crate::domain::types::PostStatus;

#[derive(Debug, Clone)]
pub struct PostDraft {
    /// Present when editing an existing post, absent for a fresh draft.
    pub existing_id: Option<Uuid>,
    pub title: String,
    pub slug: String,
    pub content_html: String,
    pub meta_title: String,
    pub meta_description: String,
    pub cover_image: Option<String>,
    pub status: PostStatus,
    dirty: bool,
}

impl PostDraft {
    pub fn new() -> Self {
        Self {
            existing_id: None,
            title: String::new(),
            slug: String::new(),
            content_html: String::new(),
            meta_title: String::new(),
            meta_description: String::new(),
            cover_image: None,
            status: PostStatus::Draft,
            dirty: false,
        }
    }

    /// Seed the surface from a stored post. The draft starts clean.
    pub fn from_record(record: &PostRecord) -> Self {
        Self {
            existing_id: Some(record.id),
            title: record.title.clone(),
            slug: record.slug.clone(),
            content_html: record.content_html.clone(),
            meta_title: record.meta_title.clone(),
            meta_description: record.meta_description.clone(),
            cover_image: record.cover_image.clone(),
            status: record.status,
            dirty: false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_title(&mut self, value: String) {
        if self.title != value {
            self.title = value;
            self.dirty = true;
        }
    }

    pub fn set_slug(&mut self, value: String) {
        if self.slug != value {
            self.slug = value;
            self.dirty = true;
        }
    }

    pub fn set_content_html(&mut self, value: String) {
        if self.content_html != value {
            self.content_html = value;
            self.dirty = true;
        }
    }

    pub fn set_meta_title(&mut self, value: String) {
        if self.meta_title != value {
            self.meta_title = value;
            self.dirty = true;
        }
    }

    pub fn set_meta_description(&mut self, value: String) {
        if self.meta_description != value {
            self.meta_description = value;
            self.dirty = true;
        }
    }

    pub fn set_cover_image(&mut self, value: Option<String>) {
        if self.cover_image != value {
            self.cover_image = value;
            self.dirty = true;
        }
    }

    pub fn set_status(&mut self, value: PostStatus) {
        if self.status != value {
            self.status = value;
            self.dirty = true;
        }
    }

    /// Derive the slug from the title when the slug field was left blank.
    /// An explicit slug always wins and is never recomputed.
    pub fn autofill_slug(&mut self) -> Result<(), SlugError> {
        if !self.slug.trim().is_empty() {
            return Ok(());
        }
        let derived = slug::derive_slug(&self.title)?;
        self.set_slug(derived);
        Ok(())
    }

    pub fn into_create_params(self) -> CreatePostParams {
        CreatePostParams {
            title: self.title,
            slug: self.slug,
            content_html: self.content_html,
            meta_title: self.meta_title,
            meta_description: self.meta_description,
            cover_image: self.cover_image,
            status: self.status,
        }
    }

    /// Build the patch of fields that differ from the stored record.
    pub fn diff_against(&self, record: &PostRecord) -> PostPatch {
        let mut patch = PostPatch::default();
        if self.title != record.title {
            patch.title = Some(self.title.clone());
        }
        if self.slug != record.slug {
            patch.slug = Some(self.slug.clone());
        }
        if self.content_html != record.content_html {
            patch.content_html = Some(self.content_html.clone());
        }
        if self.meta_title != record.meta_title {
            patch.meta_title = Some(self.meta_title.clone());
        }
        if self.meta_description != record.meta_description {
            patch.meta_description = Some(self.meta_description.clone());
        }
        if self.cover_image != record.cover_image {
            patch.cover_image = Some(self.cover_image.clone());
        }
        if self.status != record.status {
            patch.status = Some(self.status);
        }
        patch
    }
}

impl Default for PostDraft {
    fn default() -> Self {
        Self::new()
    }
}
