use std::{io::ErrorKind, sync::Arc};

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{
        HeaderValue, StatusCode,
        header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE},
    },
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use bytes::Bytes;
use tracing::error;

use crate::{
    application::{
        error::{ErrorReport, HttpError},
        feed::FeedService,
        repos::{PostsRepo, RepoError},
    },
    config::SiteSettings,
    infra::uploads::{UploadStorage, UploadStorageError},
    presentation::views::{
        IndexTemplate, LayoutContext, ListingContext, PostTemplate, render_not_found_response,
        render_template_response,
    },
};

use super::{
    AdminState, build_admin_router, db_health_response,
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct HttpState {
    pub feed: Arc<FeedService>,
    pub posts: Arc<dyn PostsRepo>,
    pub upload_storage: Arc<UploadStorage>,
    pub site: SiteSettings,
}

/// Build the complete application router: the public surface at the root
/// plus the admin panel nested under `/admin`.
pub fn build_router(
    state: HttpState,
    admin_state: AdminState,
    upload_body_limit: usize,
) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/blog/{slug}", get(post_detail))
        .route("/uploads/{*path}", get(serve_upload))
        .route("/_health/db", get(public_health))
        .fallback(fallback_not_found)
        .with_state(state)
        .nest("/admin", build_admin_router(admin_state, upload_body_limit))
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn index(State(state): State<HttpState>) -> Response {
    let meta = state.feed.base_meta("/");
    let brand = state.site.brand_title.clone();

    // Listing failures degrade to an empty feed rather than an error page.
    let content = match state.feed.public_listing().await {
        Ok(content) => content,
        Err(err) => {
            error!(
                target = "foglio::http::public",
                error = %err,
                "feed unavailable, rendering empty listing"
            );
            ListingContext { cards: Vec::new() }
        }
    };

    let view = LayoutContext::new(brand, meta, content);
    render_template_response(IndexTemplate { view }, StatusCode::OK)
}

async fn post_detail(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    let brand = state.site.brand_title.clone();

    match state.feed.published_detail(&slug).await {
        Ok(Some(content)) => {
            let meta = content.meta.clone();
            let view = LayoutContext::new(brand, meta, content);
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
        Ok(None) => render_not_found_response(brand, state.feed.base_meta("/")),
        Err(err) => detail_error_response(&state, err),
    }
}

/// Readers never see store failures on a post page: anything that is not a
/// published match renders the generic 404.
fn detail_error_response(state: &HttpState, err: RepoError) -> Response {
    let mut response =
        render_not_found_response(state.site.brand_title.clone(), state.feed.base_meta("/"));
    ErrorReport::from_error(
        "infra::http::public::post_detail",
        StatusCode::NOT_FOUND,
        &err,
    )
    .attach(&mut response);
    response
}

async fn serve_upload(State(state): State<HttpState>, Path(path): Path<String>) -> Response {
    const SOURCE: &str = "infra::http::public::serve_upload";

    match state.upload_storage.read(&path).await {
        Ok(bytes) => build_upload_response(&path, bytes),
        Err(UploadStorageError::InvalidPath) => HttpError::new(
            SOURCE,
            StatusCode::NOT_FOUND,
            "Upload not found",
            "The requested upload is not available",
        )
        .into_response(),
        Err(UploadStorageError::Io(err)) if err.kind() == ErrorKind::NotFound => HttpError::new(
            SOURCE,
            StatusCode::NOT_FOUND,
            "Upload not found",
            "The requested upload is not available",
        )
        .into_response(),
        Err(err) => {
            error!(
                target = SOURCE,
                path = %path,
                error = %err,
                "failed to read stored upload"
            );
            HttpError::new(
                SOURCE,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read uploaded file",
                err.to_string(),
            )
            .into_response()
        }
    }
}

fn build_upload_response(path: &str, bytes: Bytes) -> Response {
    let mut response = Response::new(Body::from(bytes.clone()));
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&bytes.len().to_string()) {
        headers.insert(CONTENT_LENGTH, value);
    }
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=31536000, immutable"),
    );

    response
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.posts.ping().await)
}

async fn fallback_not_found(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.site.brand_title.clone(), state.feed.base_meta("/"))
}
