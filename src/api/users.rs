use super::{optional_user, ApiError, ApiResult, AppState};
use crate::database::models::FeedPostRecord;
use crate::database::repositories::UserRepository;
use crate::feed::FeedService;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct ProfileResponse {
    id: String,
    username: String,
    posts: Vec<FeedPostRecord>,
}

pub(crate) async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> ApiResult<ProfileResponse> {
    let viewer = optional_user(&state, &headers);

    let user = state
        .database
        .with_repositories(|repos| repos.users().get_by_username(&username))?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let feed = FeedService::new(state.database.clone());
    let posts = feed.build_feed_for_owner(viewer.as_ref().map(|c| c.id.as_str()), &user.id)?;

    Ok(Json(ProfileResponse {
        id: user.id,
        username: user.username,
        posts,
    }))
}
