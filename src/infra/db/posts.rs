use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{FromRow, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{CreatePostParams, PostPatch, PostsRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::domain::types::PostStatus;

use super::{PostgresRepositories, map_sqlx_error};

const POST_COLUMNS: &str = "id, title, slug, content_html, meta_title, meta_description, \
     cover_image, status, created_at, updated_at";

/// Raw row shape; `status` stays TEXT until validated at the boundary.
#[derive(Debug, FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    slug: String,
    content_html: String,
    meta_title: String,
    meta_description: String,
    cover_image: Option<String>,
    status: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<PostRow> for PostRecord {
    type Error = RepoError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        let status = PostStatus::from_str(&row.status).map_err(|_| {
            RepoError::validation(format!(
                "post {} carries unknown status `{}`",
                row.id, row.status
            ))
        })?;

        Ok(PostRecord {
            id: row.id,
            title: row.title,
            slug: row.slug,
            content_html: row.content_html,
            meta_title: row.meta_title,
            meta_description: row.meta_description,
            cover_image: row.cover_image,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn rows_to_records(rows: Vec<PostRow>) -> Result<Vec<PostRecord>, RepoError> {
    rows.into_iter().map(PostRecord::try_from).collect()
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        if params.title.trim().is_empty() {
            return Err(RepoError::validation("title must not be empty"));
        }
        if params.slug.trim().is_empty() {
            return Err(RepoError::validation("slug must not be empty"));
        }

        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let sql = format!(
            "INSERT INTO posts ( \
                 id, title, slug, content_html, meta_title, meta_description, \
                 cover_image, status, created_at, updated_at \
             ) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9) \
             RETURNING {POST_COLUMNS}"
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .bind(&params.title)
            .bind(&params.slug)
            .bind(&params.content_html)
            .bind(&params.meta_title)
            .bind(&params.meta_description)
            .bind(&params.cover_image)
            .bind(params.status.as_str())
            .bind(now)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        PostRecord::try_from(row)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(PostRecord::try_from).transpose()
    }

    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE slug = $1 \
             ORDER BY created_at DESC \
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(PostRecord::try_from).transpose()
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE slug = $1 AND status = $2 \
             ORDER BY created_at DESC \
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(slug)
            .bind(PostStatus::Published.as_str())
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(PostRecord::try_from).transpose()
    }

    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC");
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        rows_to_records(rows)
    }

    async fn list_published(&self) -> Result<Vec<PostRecord>, RepoError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE status = $1 \
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(PostStatus::Published.as_str())
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        rows_to_records(rows)
    }

    async fn update_post(&self, id: Uuid, patch: PostPatch) -> Result<PostRecord, RepoError> {
        if patch.is_empty() {
            return self.find_post(id).await?.ok_or(RepoError::NotFound);
        }
        if matches!(patch.title.as_deref(), Some(t) if t.trim().is_empty()) {
            return Err(RepoError::validation("title must not be empty"));
        }
        if matches!(patch.slug.as_deref(), Some(s) if s.trim().is_empty()) {
            return Err(RepoError::validation("slug must not be empty"));
        }

        let now = OffsetDateTime::now_utc();
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE posts SET updated_at = ");
        qb.push_bind(now);

        if let Some(title) = patch.title {
            qb.push(", title = ");
            qb.push_bind(title);
        }
        if let Some(slug) = patch.slug {
            qb.push(", slug = ");
            qb.push_bind(slug);
        }
        if let Some(content_html) = patch.content_html {
            qb.push(", content_html = ");
            qb.push_bind(content_html);
        }
        if let Some(meta_title) = patch.meta_title {
            qb.push(", meta_title = ");
            qb.push_bind(meta_title);
        }
        if let Some(meta_description) = patch.meta_description {
            qb.push(", meta_description = ");
            qb.push_bind(meta_description);
        }
        if let Some(cover_image) = patch.cover_image {
            qb.push(", cover_image = ");
            qb.push_bind(cover_image);
        }
        if let Some(status) = patch.status {
            qb.push(", status = ");
            qb.push_bind(status.as_str());
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING ");
        qb.push(POST_COLUMNS);

        let row = qb
            .build_query_as::<PostRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        PostRecord::try_from(row)
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepoError> {
        self.health_check().await.map_err(map_sqlx_error)
    }
}
