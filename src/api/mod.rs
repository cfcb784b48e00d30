mod auth;
mod engagement;
mod posts;
mod users;

use crate::config::PhotogramConfig;
use crate::database::Database;
use crate::error::DomainError;
use crate::token::{Claims, TokenService};
use anyhow::Result;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

#[derive(Clone)]
pub struct AppState {
    pub config: PhotogramConfig,
    pub database: Database,
    pub tokens: TokenService,
}

pub(crate) type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Internal(anyhow::Error),
}

impl ApiError {
    fn into_response_parts(self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse { message: msg }),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorResponse { message: msg })
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorResponse { message: msg }),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse { message: msg }),
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        message: "Server error".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.into_response_parts();
        (status, Json(body)).into_response()
    }
}

/// The single place a domain failure kind becomes an HTTP status.
impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(_)
            | DomainError::DuplicateUsername
            | DomainError::InvalidCredential
            | DomainError::UnsupportedMediaType
            | DomainError::PayloadTooLarge => ApiError::BadRequest(err.to_string()),
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::InvalidToken => ApiError::Forbidden(err.to_string()),
            DomainError::Storage(inner) => ApiError::Internal(inner),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves the caller on auth-required routes: 401 when no token is
/// present, 403 when one is present but does not verify.
pub(crate) fn require_user(state: &AppState, headers: &HeaderMap) -> Result<Claims, ApiError> {
    let token = bearer_token(headers)
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".into()))?;
    state
        .tokens
        .verify(token)
        .map_err(|_| ApiError::Forbidden("Invalid token".into()))
}

/// On optional-auth routes an absent or unverifiable token degrades to an
/// anonymous viewer.
pub(crate) fn optional_user(state: &AppState, headers: &HeaderMap) -> Option<Claims> {
    bearer_token(headers).and_then(|token| state.tokens.verify(token).ok())
}

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub(crate) async fn health_handler(State(_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Tries to bind to the given port, or finds the next available port
async fn find_available_port(start_port: u16) -> Result<(TcpListener, u16)> {
    const MAX_PORT_ATTEMPTS: u16 = 100;

    for offset in 0..MAX_PORT_ATTEMPTS {
        let port = start_port + offset;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        match TcpListener::bind(addr).await {
            Ok(listener) => return Ok((listener, port)),
            Err(e) => {
                if offset == 0 {
                    tracing::debug!(port, error = %e, "Port in use, trying next port");
                }
                continue;
            }
        }
    }

    anyhow::bail!(
        "Could not find available port in range {}-{}",
        start_port,
        start_port + MAX_PORT_ATTEMPTS - 1
    )
}

pub async fn serve_http(config: PhotogramConfig, database: Database) -> Result<()> {
    let tokens = TokenService::new(&config.auth.token_secret);
    let state = AppState {
        config: config.clone(),
        database,
        tokens,
    };

    // Body limit sits above the upload ceiling so the ingestor owns the
    // too-large rejection and its message.
    let body_limit = state.config.file.max_upload_bytes as usize + 1024 * 1024;
    let router = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route(
            "/api/posts",
            get(posts::list_posts).post(posts::create_post),
        )
        .route("/api/posts/:id/like", post(engagement::toggle_like))
        .route(
            "/api/posts/:id/comments",
            get(engagement::list_comments).post(engagement::add_comment),
        )
        .route("/api/users/:username", get(users::get_profile))
        .nest_service(
            "/uploads",
            ServeDir::new(state.config.paths.uploads_dir.clone()),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let (listener, actual_port) = find_available_port(config.api_port).await?;
    let addr = SocketAddr::from(([0, 0, 0, 0], actual_port));

    if actual_port != config.api_port {
        tracing::warn!(
            requested_port = config.api_port,
            actual_port = actual_port,
            "Configured port was in use, bound to next available port"
        );
    }

    tracing::info!(?addr, "HTTP server listening");
    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}
