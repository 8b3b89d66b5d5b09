//! Session cookie plumbing for the admin panel.
//!
//! Every gated request starts from a pending gate and resolves it exactly
//! once against the session table; the gated handler only runs once the
//! gate reports an authenticated state.

use axum::{
    Form,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::info;

use crate::{
    domain::session::SessionGate,
    presentation::{
        admin::{AdminLayout, LoginTemplate, LoginView},
        views::render_template_response,
    },
};

use super::AdminState;

pub const SESSION_COOKIE: &str = "foglio_session";

const LOGIN_FAILED_MESSAGE: &str = "Invalid username or password.";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn require_session(
    State(state): State<AdminState>,
    jar: CookieJar,
    request: Request<Body>,
    next: Next,
) -> Response {
    let token = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string());

    let mut gate = SessionGate::new();
    gate.resolve(state.sessions.resolve(token.as_deref()));

    if gate.is_authenticated() {
        next.run(request).await
    } else {
        Redirect::to("/admin/login").into_response()
    }
}

pub async fn login_form(State(state): State<AdminState>, jar: CookieJar) -> Response {
    let token = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string());
    let mut gate = SessionGate::new();
    gate.resolve(state.sessions.resolve(token.as_deref()));
    if gate.is_authenticated() {
        return Redirect::to("/admin").into_response();
    }

    render_login(&state, None, StatusCode::OK)
}

pub async fn login_submit(
    State(state): State<AdminState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.sessions.login(&form.username, &form.password) {
        Ok(session) => {
            info!(
                target = "foglio::http::admin",
                username = %form.username,
                "admin signed in"
            );
            let cookie = session_cookie(session.token, session.expires_at);
            (jar.add(cookie), Redirect::to("/admin")).into_response()
        }
        Err(_) => render_login(
            &state,
            Some(LOGIN_FAILED_MESSAGE.to_string()),
            StatusCode::UNAUTHORIZED,
        ),
    }
}

pub async fn logout(State(state): State<AdminState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.sign_out(cookie.value());
    }

    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/admin");
    let jar = jar.remove(removal);
    (jar, Redirect::to("/admin/login")).into_response()
}

fn session_cookie(token: String, expires_at: OffsetDateTime) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/admin");
    cookie.set_expires(expires_at);
    cookie
}

fn render_login(state: &AdminState, error: Option<String>, status: StatusCode) -> Response {
    let view = AdminLayout::new(
        state.site.brand_title.clone(),
        "Sign in",
        LoginView { error },
    );
    render_template_response(LoginTemplate { view }, status)
}
