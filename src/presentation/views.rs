use crate::application::error::{ErrorReport, HttpError};
use crate::domain::types::PostStatus;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(brand_title: String, meta: PageMetaView) -> Response {
    let view = LayoutContext::new(brand_title, meta, ErrorPageView::not_found());
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// Page-level metadata rendered into the document head.
#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub og_image: Option<String>,
    pub published_iso: Option<String>,
    pub updated_iso: Option<String>,
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand_title: String,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(brand_title: String, meta: PageMetaView, content: T) -> Self {
        Self {
            brand_title,
            meta,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PostCard {
    pub href: String,
    pub title: String,
    pub description: String,
    pub display_date: String,
    pub iso_date: String,
    pub status_badge: Option<PostStatus>,
    pub cover_image: Option<String>,
}

#[derive(Clone)]
pub struct ListingContext {
    pub cards: Vec<PostCard>,
}

impl ListingContext {
    pub fn has_posts(&self) -> bool {
        !self.cards.is_empty()
    }
}

#[derive(Clone)]
pub struct PostDetailContext {
    pub title: String,
    pub content_html: String,
    pub cover_image: Option<String>,
    pub published_display: String,
    pub published_iso: String,
    pub updated_display: Option<String>,
    pub meta: PageMetaView,
}

#[derive(Clone)]
pub struct ErrorPageView {
    pub heading: String,
    pub message: String,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            heading: "Page not found".to_string(),
            message: "The page you are looking for does not exist or was removed.".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<ListingContext>,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailContext>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}
