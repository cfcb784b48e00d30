use super::{optional_user, require_user, ApiError, ApiResult, AppState};
use crate::database::models::FeedPostRecord;
use crate::feed::FeedService;
use crate::files::{FileService, UploadInput};
use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::Json;

pub(crate) async fn list_posts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<FeedPostRecord>> {
    let viewer = optional_user(&state, &headers);
    let feed = FeedService::new(state.database.clone());
    let posts = feed.build_feed(viewer.as_ref().map(|c| c.id.as_str()))?;
    Ok(Json(posts))
}

pub(crate) async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult<FeedPostRecord> {
    let user = require_user(&state, &headers)?;

    let mut upload: Option<UploadInput> = None;
    let mut caption: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Error uploading file".into()))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("image") => {
                let original_name = field.file_name().map(|s| s.to_string());
                let declared_mime = field.content_type().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::BadRequest("Error uploading file".into()))?;
                upload = Some(UploadInput {
                    original_name,
                    declared_mime,
                    declared_size: Some(bytes.len() as u64),
                    data: bytes.to_vec(),
                });
            }
            Some("caption") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::BadRequest("Error uploading file".into()))?;
                caption = Some(text).filter(|t| !t.is_empty());
            }
            _ => {}
        }
    }

    let upload =
        upload.ok_or_else(|| ApiError::BadRequest("No image file provided".into()))?;

    let files = FileService::new(
        state.config.paths.clone(),
        state.config.file.max_upload_bytes,
    );
    let stored = files.accept(upload).await?;

    let feed = FeedService::new(state.database.clone());
    let post = feed
        .create_post(&user.id, &user.username, &stored.locator, caption)
        .map_err(|err| {
            // The blob is already on disk; a failed insert orphans it.
            tracing::warn!(locator = %stored.locator, error = %err, "post insert failed, uploaded blob orphaned");
            ApiError::from(err)
        })?;

    tracing::info!(post_id = %post.id, username = %user.username, "created post");
    Ok(Json(post))
}
