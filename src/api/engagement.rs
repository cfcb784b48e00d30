use super::{require_user, ApiResult, AppState};
use crate::database::models::CommentRecord;
use crate::database::repositories::EngagementRepository;
use crate::utils::now_utc_iso;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub(crate) struct ToggleLikeResponse {
    success: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddCommentRequest {
    text: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentView {
    id: String,
    user_id: String,
    post_id: String,
    text: String,
    created_at: String,
    username: String,
}

pub(crate) async fn toggle_like(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<ToggleLikeResponse> {
    let user = require_user(&state, &headers)?;

    state
        .database
        .with_repositories(|repos| repos.engagement().toggle_like(&user.id, &post_id))?;

    Ok(Json(ToggleLikeResponse { success: true }))
}

pub(crate) async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<Vec<CommentView>> {
    let comments = state
        .database
        .with_repositories(|repos| repos.engagement().list_comments(&post_id))?;

    let views = comments
        .into_iter()
        .map(|(comment, username)| CommentView {
            id: comment.id,
            user_id: comment.user_id,
            post_id: comment.post_id,
            text: comment.text,
            created_at: comment.created_at,
            username,
        })
        .collect();
    Ok(Json(views))
}

pub(crate) async fn add_comment(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<AddCommentRequest>,
) -> ApiResult<CommentView> {
    let user = require_user(&state, &headers)?;

    // Empty text is rejected by the engagement store.
    let record = CommentRecord {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        post_id,
        text: payload.text.trim().to_string(),
        created_at: now_utc_iso(),
    };
    state
        .database
        .with_repositories(|repos| repos.engagement().add_comment(&record))?;

    Ok(Json(CommentView {
        id: record.id,
        user_id: record.user_id,
        post_id: record.post_id,
        text: record.text,
        created_at: record.created_at,
        username: user.username,
    }))
}
