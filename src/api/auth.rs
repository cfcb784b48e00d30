use super::{ApiError, ApiResult, AppState};
use crate::auth::CredentialService;
use crate::error::DomainError;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct CredentialsRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionResponse {
    id: String,
    username: String,
    token: String,
}

pub(crate) async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> ApiResult<SessionResponse> {
    let credentials = CredentialService::new(state.database.clone());
    let user = credentials.register(&payload.username, &payload.password)?;
    let token = state.tokens.issue(&user)?;
    Ok(Json(SessionResponse {
        id: user.id,
        username: user.username,
        token,
    }))
}

pub(crate) async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> ApiResult<SessionResponse> {
    let credentials = CredentialService::new(state.database.clone());
    // Unknown user and bad password are both client errors on this route.
    let user = credentials
        .verify(&payload.username, &payload.password)
        .map_err(|err| match err {
            DomainError::NotFound(msg) => ApiError::BadRequest(msg),
            other => ApiError::from(other),
        })?;
    let token = state.tokens.issue(&user)?;
    Ok(Json(SessionResponse {
        id: user.id,
        username: user.username,
        token,
    }))
}
