//! Shared harness: an in-memory posts repository behind the real router.
#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use foglio::{
    application::{
        admin::posts::AdminPostService,
        feed::FeedService,
        repos::{CreatePostParams, PostPatch, PostsRepo, RepoError},
        session::SessionService,
        uploads::ImageUploadService,
    },
    config::SiteSettings,
    domain::{entities::PostRecord, types::PostStatus},
    infra::{
        http::{AdminState, HttpState, build_router},
        uploads::UploadStorage,
    },
};
use http_body_util::BodyExt;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_USERNAME: &str = "editor";
pub const ADMIN_PASSWORD: &str = "hunter2";
pub const MULTIPART_BOUNDARY: &str = "xXformBoundaryXx";

#[derive(Default)]
pub struct MemoryPostsRepo {
    rows: Mutex<Vec<PostRecord>>,
    fail: AtomicBool,
}

impl MemoryPostsRepo {
    /// Make every subsequent repository call fail as if the store were down.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn push(&self, record: PostRecord) {
        self.rows.lock().unwrap().push(record);
    }

    pub fn all(&self) -> Vec<PostRecord> {
        self.rows.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), RepoError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(RepoError::Unavailable("store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PostsRepo for MemoryPostsRepo {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        self.check()?;
        let now = OffsetDateTime::now_utc();
        let record = PostRecord {
            id: Uuid::new_v4(),
            title: params.title,
            slug: params.slug,
            content_html: params.content_html,
            meta_title: params.meta_title,
            meta_description: params.meta_description,
            cover_image: params.cover_image,
            status: params.status,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.slug == slug)
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        self.check()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.slug == slug && p.status == PostStatus::Published)
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_published(&self) -> Result<Vec<PostRecord>, RepoError> {
        self.check()?;
        let mut rows: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.status == PostStatus::Published)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn update_post(&self, id: Uuid, patch: PostPatch) -> Result<PostRecord, RepoError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepoError::NotFound)?;
        if patch.is_empty() {
            return Ok(row.clone());
        }
        if let Some(title) = patch.title {
            row.title = title;
        }
        if let Some(slug) = patch.slug {
            row.slug = slug;
        }
        if let Some(content_html) = patch.content_html {
            row.content_html = content_html;
        }
        if let Some(meta_title) = patch.meta_title {
            row.meta_title = meta_title;
        }
        if let Some(meta_description) = patch.meta_description {
            row.meta_description = meta_description;
        }
        if let Some(cover_image) = patch.cover_image {
            row.cover_image = cover_image;
        }
        if let Some(status) = patch.status {
            row.status = status;
        }
        row.updated_at = OffsetDateTime::now_utc();
        Ok(row.clone())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepoError> {
        self.check()
    }
}

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MemoryPostsRepo>,
    pub storage: Arc<UploadStorage>,
    _uploads_dir: tempfile::TempDir,
}

pub fn build_app() -> TestApp {
    let repo = Arc::new(MemoryPostsRepo::default());
    let posts: Arc<dyn PostsRepo> = repo.clone();

    let site = SiteSettings {
        public_url: "http://127.0.0.1:3000".to_string(),
        brand_title: "Foglio".to_string(),
    };

    let uploads_dir = tempfile::tempdir().expect("tempdir");
    let storage =
        Arc::new(UploadStorage::new(uploads_dir.path().to_path_buf()).expect("storage root"));

    let feed = Arc::new(FeedService::new(posts.clone(), site.clone()));
    let sessions = Arc::new(SessionService::new(
        ADMIN_USERNAME,
        ADMIN_PASSWORD,
        Duration::from_secs(3600),
    ));
    let uploads = Arc::new(ImageUploadService::new(storage.clone(), &site.public_url));
    let admin_posts = Arc::new(AdminPostService::new(posts.clone()));

    let http_state = HttpState {
        feed,
        posts,
        upload_storage: storage.clone(),
        site: site.clone(),
    };
    let admin_state = AdminState {
        posts: admin_posts,
        sessions,
        uploads,
        site,
    };

    TestApp {
        router: build_router(http_state, admin_state, 10 * 1024 * 1024),
        repo,
        storage,
        _uploads_dir: uploads_dir,
    }
}

pub fn sample_post(slug: &str, status: PostStatus) -> PostRecord {
    let now = OffsetDateTime::now_utc();
    PostRecord {
        id: Uuid::new_v4(),
        title: format!("Post {slug}"),
        slug: slug.to_string(),
        content_html: "<p>Hello readers</p>".to_string(),
        meta_title: String::new(),
        meta_description: "A short description.".to_string(),
        cover_image: None,
        status,
        created_at: now,
        updated_at: now,
    }
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    request(app, Request::get(uri).body(Body::empty()).expect("request")).await
}

pub async fn request(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router
        .clone()
        .oneshot(request)
        .await
        .expect("infallible")
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

/// Log in and return the session cookie (`name=value`).
pub async fn login(app: &TestApp) -> String {
    let body = format!("username={ADMIN_USERNAME}&password={ADMIN_PASSWORD}");
    let response = request(
        app,
        Request::post("/admin/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("request"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .expect("cookie header")
        .to_string();
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

/// Build a multipart body for the editor form. Text fields first, then an
/// optional file part named `cover_file`.
pub fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((name, filename, data)) = file {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(uri: &str, cookie: &str, body: Vec<u8>) -> Request<Body> {
    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .expect("request")
}
