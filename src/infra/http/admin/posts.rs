use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    application::{
        admin::{
            editor::PostDraft,
            posts::{AdminPostError, SubmitOutcome},
        },
        feed::format_long_date,
    },
    infra::http::repo_error_to_http,
    presentation::{
        admin::{AdminLayout, AdminPostRow, DashboardTemplate, DashboardView, EditorTemplate, EditorView},
        views::render_template_response,
    },
};

use super::{
    AdminState,
    forms::{EditorSubmission, read_editor_submission},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct NoticeQuery {
    notice: Option<String>,
}

fn notice_text(key: &str) -> Option<String> {
    let text = match key {
        "created" => "Post created.",
        "updated" => "Post updated.",
        "unchanged" => "No changes to save.",
        "deleted" => "Post deleted.",
        _ => return None,
    };
    Some(text.to_string())
}

pub(super) async fn admin_dashboard(
    State(state): State<AdminState>,
    Query(query): Query<NoticeQuery>,
) -> Response {
    const SOURCE: &str = "infra::http::admin::dashboard";

    let overview = match state.posts.overview().await {
        Ok(overview) => overview,
        Err(err) => return repo_error_to_http(SOURCE, err).into_response(),
    };

    let rows = overview
        .posts
        .iter()
        .map(|record| AdminPostRow {
            edit_href: format!("/admin/edit/{}", record.id),
            delete_action: format!("/admin/delete/{}", record.id),
            title: record.title.clone(),
            slug: record.slug.clone(),
            status: record.status,
            created_display: format_long_date(record.created_at),
            updated_display: record
                .was_updated()
                .then(|| format_long_date(record.updated_at)),
        })
        .collect();

    let content = DashboardView {
        notice: query.notice.as_deref().and_then(notice_text),
        total: overview.total,
        published: overview.published,
        drafts: overview.drafts,
        rows,
    };

    let view = AdminLayout::new(state.site.brand_title.clone(), "Posts", content);
    render_template_response(DashboardTemplate { view }, StatusCode::OK)
}

pub(super) async fn admin_post_new(State(state): State<AdminState>) -> Response {
    let draft = PostDraft::new();
    render_editor(&state, EditorView::for_new(&draft, None), StatusCode::OK)
}

pub(super) async fn admin_post_edit(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Response {
    const SOURCE: &str = "infra::http::admin::post_edit";

    match state.posts.get(id).await {
        Ok(record) => {
            let draft = PostDraft::from_record(&record);
            render_editor(&state, EditorView::for_edit(&draft, None), StatusCode::OK)
        }
        Err(err) => repo_error_to_http(SOURCE, err).into_response(),
    }
}

pub(super) async fn admin_post_create(
    State(state): State<AdminState>,
    mut multipart: Multipart,
) -> Response {
    let submission = match read_editor_submission(&mut multipart).await {
        Ok(submission) => submission,
        Err(err) => {
            let draft = PostDraft::new();
            return render_editor(
                &state,
                EditorView::for_new(&draft, Some(err.to_string())),
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
    };

    let draft = PostDraft::new();
    submit_editor(&state, draft, submission, true).await
}

pub(super) async fn admin_post_update(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Response {
    const SOURCE: &str = "infra::http::admin::post_update";

    let record = match state.posts.get(id).await {
        Ok(record) => record,
        Err(err) => return repo_error_to_http(SOURCE, err).into_response(),
    };

    let draft = PostDraft::from_record(&record);

    let submission = match read_editor_submission(&mut multipart).await {
        Ok(submission) => submission,
        Err(err) => {
            return render_editor(
                &state,
                EditorView::for_edit(&draft, Some(err.to_string())),
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
    };

    submit_editor(&state, draft, submission, false).await
}

pub(super) async fn admin_post_delete(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Response {
    const SOURCE: &str = "infra::http::admin::post_delete";

    match state.posts.delete_post(id).await {
        Ok(()) => Redirect::to("/admin?notice=deleted").into_response(),
        Err(err) => repo_error_to_http(SOURCE, err).into_response(),
    }
}

/// Apply a decoded submission to the draft and persist it. A failed cover
/// upload aborts the whole submission: nothing is written and the editor
/// re-renders with the typed values intact.
async fn submit_editor(
    state: &AdminState,
    mut draft: PostDraft,
    submission: EditorSubmission,
    is_new: bool,
) -> Response {
    draft.set_title(submission.title);
    draft.set_slug(submission.slug);
    draft.set_content_html(submission.content_html);
    draft.set_meta_title(submission.meta_title);
    draft.set_meta_description(submission.meta_description);
    draft.set_status(submission.status);

    let previous_cover = draft.cover_image.clone();

    if submission.remove_cover {
        draft.set_cover_image(None);
    }

    if let Some(upload) = submission.cover_upload {
        match state.uploads.upload(upload.data, &upload.filename).await {
            Ok(url) => draft.set_cover_image(Some(url)),
            Err(err) => {
                warn!(
                    target = "foglio::http::admin",
                    filename = %upload.filename,
                    error = %err,
                    "cover upload failed, submission blocked"
                );
                let error = Some("Cover upload failed. The post was not saved.".to_string());
                let view = editor_view(&draft, error, is_new);
                return render_editor(state, view, StatusCode::UNPROCESSABLE_ENTITY);
            }
        }
    }

    match state.posts.save_draft(draft.clone()).await {
        Ok(SubmitOutcome::Created { .. }) => Redirect::to("/admin?notice=created").into_response(),
        Ok(SubmitOutcome::Updated { .. }) => {
            reap_replaced_cover(state, previous_cover, &draft.cover_image).await;
            Redirect::to("/admin?notice=updated").into_response()
        }
        Ok(SubmitOutcome::Unchanged { .. }) => {
            Redirect::to("/admin?notice=unchanged").into_response()
        }
        Err(AdminPostError::Validation(message)) => {
            let view = editor_view(&draft, Some(message.to_string()), is_new);
            render_editor(state, view, StatusCode::UNPROCESSABLE_ENTITY)
        }
        Err(AdminPostError::Repo(err)) => {
            repo_error_to_http("infra::http::admin::submit_editor", err).into_response()
        }
    }
}

/// Once an edit that swapped out or cleared the cover has been persisted,
/// the old blob is unreachable; delete it from storage.
async fn reap_replaced_cover(
    state: &AdminState,
    previous: Option<String>,
    current: &Option<String>,
) {
    if let Some(old_url) = previous {
        if current.as_deref() != Some(old_url.as_str()) {
            state.uploads.remove(&old_url).await;
        }
    }
}

fn editor_view(draft: &PostDraft, error: Option<String>, is_new: bool) -> EditorView {
    if is_new {
        EditorView::for_new(draft, error)
    } else {
        EditorView::for_edit(draft, error)
    }
}

fn render_editor(state: &AdminState, content: EditorView, status: StatusCode) -> Response {
    let heading = content.heading.clone();
    let view = AdminLayout::new(state.site.brand_title.clone(), heading, content);
    render_template_response(EditorTemplate { view }, status)
}
