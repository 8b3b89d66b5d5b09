mod common;

use axum::http::StatusCode;
use foglio::domain::types::PostStatus;
use time::macros::datetime;

use common::{body_string, build_app, get, sample_post};

#[tokio::test]
async fn listing_shows_published_posts_only() {
    let app = build_app();
    app.repo.push(sample_post("visible", PostStatus::Published));
    app.repo.push(sample_post("hidden", PostStatus::Draft));

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("Post visible"));
    assert!(html.contains("/blog/visible"));
    assert!(!html.contains("Post hidden"));
}

#[tokio::test]
async fn empty_listing_renders_placeholder() {
    let app = build_app();

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("No posts yet."));
}

#[tokio::test]
async fn listing_degrades_to_empty_when_store_fails() {
    let app = build_app();
    app.repo.push(sample_post("visible", PostStatus::Published));
    app.repo.set_failing(true);

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("No posts yet."));
    assert!(!html.contains("Post visible"));
}

#[tokio::test]
async fn post_detail_renders_published_post() {
    let app = build_app();
    app.repo.push(sample_post("hello", PostStatus::Published));

    let response = get(&app, "/blog/hello").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("Post hello"));
    assert!(html.contains("<p>Hello readers</p>"));
    assert!(html.contains("/blog/hello\""));
}

#[tokio::test]
async fn post_detail_carries_social_meta_tags() {
    let app = build_app();
    let mut post = sample_post("shared", PostStatus::Published);
    post.cover_image = Some("http://localhost:8080/uploads/2025/01/cover.png".to_string());
    app.repo.push(post);

    let html = body_string(get(&app, "/blog/shared").await).await;
    assert!(html.contains("property=\"og:type\" content=\"article\""));
    assert!(html.contains("name=\"twitter:card\" content=\"summary_large_image\""));
    assert!(html.contains("name=\"twitter:title\""));
    assert!(html.contains(
        "name=\"twitter:image\" content=\"http://localhost:8080/uploads/2025/01/cover.png\""
    ));
}

#[tokio::test]
async fn listing_is_typed_as_a_website() {
    let app = build_app();

    let html = body_string(get(&app, "/").await).await;
    assert!(html.contains("property=\"og:type\" content=\"website\""));
    assert!(!html.contains("article:published_time"));
}

#[tokio::test]
async fn draft_post_detail_is_not_found() {
    let app = build_app();
    app.repo.push(sample_post("secret", PostStatus::Draft));

    let response = get(&app, "/blog/secret").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("Page not found"));
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let app = build_app();

    let response = get(&app, "/blog/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn detail_store_failure_renders_generic_not_found() {
    let app = build_app();
    app.repo.push(sample_post("hello", PostStatus::Published));
    app.repo.set_failing(true);

    let response = get(&app, "/blog/hello").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("Page not found"));
}

#[tokio::test]
async fn updated_indicator_appears_only_after_an_edit() {
    let app = build_app();

    let mut pristine = sample_post("pristine", PostStatus::Published);
    pristine.created_at = datetime!(2025-01-02 08:00:00 UTC);
    pristine.updated_at = pristine.created_at;
    app.repo.push(pristine);

    let mut edited = sample_post("edited", PostStatus::Published);
    edited.created_at = datetime!(2025-01-02 08:00:00 UTC);
    edited.updated_at = datetime!(2025-03-04 09:30:00 UTC);
    app.repo.push(edited);

    let html = body_string(get(&app, "/blog/pristine").await).await;
    assert!(!html.contains("Updated"));

    let html = body_string(get(&app, "/blog/edited").await).await;
    assert!(html.contains("Updated March 4, 2025"));
    assert!(html.contains("January 2, 2025"));
}

#[tokio::test]
async fn meta_title_falls_back_to_post_title() {
    let app = build_app();
    let mut post = sample_post("fallback", PostStatus::Published);
    post.meta_title = String::new();
    app.repo.push(post);

    let html = body_string(get(&app, "/blog/fallback").await).await;
    assert!(html.contains("<title>Post fallback</title>"));
}

#[tokio::test]
async fn stored_upload_is_served_with_immutable_caching() {
    let app = build_app();
    let stored = app
        .storage
        .store("cover.png", bytes::Bytes::from_static(b"pixels"))
        .await
        .expect("stored");

    let response = get(&app, &format!("/uploads/{}", stored.stored_path)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some("public, max-age=31536000, immutable")
    );
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("image/png")
    );
}

#[tokio::test]
async fn missing_upload_is_not_found() {
    let app = build_app();
    let response = get(&app, "/uploads/2025/01/02/missing.png").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn db_health_reflects_store_state() {
    let app = build_app();

    let response = get(&app, "/_health/db").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    app.repo.set_failing(true);
    let response = get(&app, "/_health/db").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = build_app();
    let response = get(&app, "/definitely/not/here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
