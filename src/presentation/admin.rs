//! View models and templates for the admin panel.

use askama::Template;

use crate::application::admin::editor::PostDraft;
use crate::domain::types::PostStatus;

#[derive(Clone)]
pub struct AdminLayout<T> {
    pub brand_title: String,
    pub page_title: String,
    pub content: T,
}

impl<T> AdminLayout<T> {
    pub fn new(brand_title: String, page_title: impl Into<String>, content: T) -> Self {
        Self {
            brand_title,
            page_title: page_title.into(),
            content,
        }
    }
}

#[derive(Clone)]
pub struct LoginView {
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct AdminPostRow {
    pub edit_href: String,
    pub delete_action: String,
    pub title: String,
    pub slug: String,
    pub status: PostStatus,
    pub created_display: String,
    pub updated_display: Option<String>,
}

#[derive(Clone)]
pub struct DashboardView {
    pub notice: Option<String>,
    pub total: usize,
    pub published: usize,
    pub drafts: usize,
    pub rows: Vec<AdminPostRow>,
}

impl DashboardView {
    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}

/// The populated editor form. Built from a [`PostDraft`] so a failed
/// submission re-renders with everything the author typed still in place.
#[derive(Clone)]
pub struct EditorView {
    pub heading: String,
    pub action: String,
    pub submit_label: String,
    pub error: Option<String>,
    pub title: String,
    pub slug: String,
    pub content_html: String,
    pub meta_title: String,
    pub meta_description: String,
    pub cover_image: Option<String>,
    pub status: PostStatus,
}

impl EditorView {
    pub fn for_new(draft: &PostDraft, error: Option<String>) -> Self {
        Self::from_draft(
            draft,
            "New post".to_string(),
            "/admin/new".to_string(),
            "Create post".to_string(),
            error,
        )
    }

    pub fn for_edit(draft: &PostDraft, error: Option<String>) -> Self {
        let action = match draft.existing_id {
            Some(id) => format!("/admin/edit/{id}"),
            None => "/admin/new".to_string(),
        };
        Self::from_draft(
            draft,
            "Edit post".to_string(),
            action,
            "Save changes".to_string(),
            error,
        )
    }

    fn from_draft(
        draft: &PostDraft,
        heading: String,
        action: String,
        submit_label: String,
        error: Option<String>,
    ) -> Self {
        Self {
            heading,
            action,
            submit_label,
            error,
            title: draft.title.clone(),
            slug: draft.slug.clone(),
            content_html: draft.content_html.clone(),
            meta_title: draft.meta_title.clone(),
            meta_description: draft.meta_description.clone(),
            cover_image: draft.cover_image.clone(),
            status: draft.status,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.status == PostStatus::Draft
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub view: AdminLayout<LoginView>,
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub view: AdminLayout<DashboardView>,
}

#[derive(Template)]
#[template(path = "admin/post_edit.html")]
pub struct EditorTemplate {
    pub view: AdminLayout<EditorView>,
}
