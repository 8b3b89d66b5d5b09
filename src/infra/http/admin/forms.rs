//! Multipart decoding for the post editor form.

use std::str::FromStr;

use axum::extract::Multipart;
use bytes::Bytes;
use thiserror::Error;

use crate::domain::types::PostStatus;

#[derive(Debug, Error)]
pub enum FormReadError {
    #[error("failed to read form field `{field}`: {message}")]
    Field { field: &'static str, message: String },
    #[error("unknown status value `{0}`")]
    UnknownStatus(String),
}

/// A decoded editor submission. The cover upload, when present, carries the
/// client-supplied filename and the raw payload; storing it is the
/// handler's job.
#[derive(Debug, Default)]
pub struct EditorSubmission {
    pub title: String,
    pub slug: String,
    pub content_html: String,
    pub meta_title: String,
    pub meta_description: String,
    pub status: PostStatus,
    pub remove_cover: bool,
    pub cover_upload: Option<CoverUpload>,
}

#[derive(Debug)]
pub struct CoverUpload {
    pub filename: String,
    pub data: Bytes,
}

pub async fn read_editor_submission(
    multipart: &mut Multipart,
) -> Result<EditorSubmission, FormReadError> {
    let mut submission = EditorSubmission::default();

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        FormReadError::Field {
            field: "multipart",
            message: err.to_string(),
        }
    })? {
        let name = field.name().map(|name| name.to_string());
        match name.as_deref() {
            Some("title") => submission.title = read_text(field, "title").await?,
            Some("slug") => submission.slug = read_text(field, "slug").await?,
            Some("content_html") => {
                submission.content_html = read_text(field, "content_html").await?;
            }
            Some("meta_title") => submission.meta_title = read_text(field, "meta_title").await?,
            Some("meta_description") => {
                submission.meta_description = read_text(field, "meta_description").await?;
            }
            Some("status") => {
                let raw = read_text(field, "status").await?;
                submission.status = PostStatus::from_str(raw.trim())
                    .map_err(|_| FormReadError::UnknownStatus(raw))?;
            }
            Some("remove_cover") => {
                let raw = read_text(field, "remove_cover").await?;
                submission.remove_cover = matches!(raw.as_str(), "on" | "true" | "1");
            }
            Some("cover_file") => {
                // A file input submitted without a selection arrives with an
                // empty filename; that is not an upload attempt.
                let filename = field
                    .file_name()
                    .map(|name| name.to_string())
                    .unwrap_or_default();
                if filename.is_empty() {
                    continue;
                }
                let data = field.bytes().await.map_err(|err| FormReadError::Field {
                    field: "cover_file",
                    message: err.to_string(),
                })?;
                submission.cover_upload = Some(CoverUpload { filename, data });
            }
            _ => {}
        }
    }

    Ok(submission)
}

async fn read_text(
    field: axum::extract::multipart::Field<'_>,
    name: &'static str,
) -> Result<String, FormReadError> {
    field.text().await.map_err(|err| FormReadError::Field {
        field: name,
        message: err.to_string(),
    })
}
