use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::{request_time_headers, ApiJson, ApiResponse};
use crate::errors::AppError;
use crate::middleware::session::{expired_session_cookie, session_cookie, session_token};
use crate::store::LoginOutcome;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub project_id: Option<String>,
}

/// POST /api/v1/project: open a session on a project, creating it if needed
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<(CookieJar, HeaderMap, Json<ApiResponse<()>>), AppError> {
    let project_id = payload
        .project_id
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            tracing::warn!("login: missing projectId");
            AppError::validation("projectId is required")
        })?;

    let (token, outcome) = state.store.login(&project_id);
    let message = match outcome {
        LoginOutcome::Created => "New project created",
        LoginOutcome::Existing => "Existing project found",
    };
    tracing::info!(project_id = %project_id, "login: {}", message);

    Ok((
        jar.add(session_cookie(&token)),
        request_time_headers(),
        ApiResponse::with_message((), message),
    ))
}

/// DELETE /api/v1/project: end the session; always succeeds
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, HeaderMap, Json<ApiResponse<()>>) {
    if let Some(token) = session_token(&jar) {
        if state.store.logout(&token) {
            tracing::info!("logout: session closed");
        }
    }

    (
        jar.add(expired_session_cookie()),
        request_time_headers(),
        ApiResponse::with_message((), "Logged out successfully"),
    )
}

/// DELETE /api/v1/project/:project_id: remove a project and all its data
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> (HeaderMap, Json<ApiResponse<()>>) {
    if state.store.delete_project(&project_id) {
        tracing::info!(project_id = %project_id, "project deleted");
    } else {
        tracing::debug!(project_id = %project_id, "delete_project: already absent");
    }

    (
        request_time_headers(),
        ApiResponse::with_message((), "Project deleted successfully"),
    )
}
