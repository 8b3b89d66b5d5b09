mod auth;
mod forms;
mod posts;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

use crate::{
    application::{admin::posts::AdminPostService, session::SessionService, uploads::ImageUploadService},
    config::SiteSettings,
};

#[derive(Clone)]
pub struct AdminState {
    pub posts: Arc<AdminPostService>,
    pub sessions: Arc<SessionService>,
    pub uploads: Arc<ImageUploadService>,
    pub site: SiteSettings,
}

pub fn build_admin_router(state: AdminState, upload_body_limit: usize) -> Router {
    let gated = Router::new()
        .route("/", get(posts::admin_dashboard))
        .route("/new", get(posts::admin_post_new).post(posts::admin_post_create))
        .route(
            "/edit/{id}",
            get(posts::admin_post_edit).post(posts::admin_post_update),
        )
        .route("/delete/{id}", post(posts::admin_post_delete))
        .route("/logout", post(auth::logout))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ))
        .layer(DefaultBodyLimit::max(upload_body_limit));

    Router::new()
        .route("/login", get(auth::login_form).post(auth::login_submit))
        .merge(gated)
        .with_state(state)
}
