use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
};

use crate::errors::AppError;
use crate::middleware::session::Session;
use crate::reports;
use crate::AppState;

fn csv_download(kind: &str, body: Vec<u8>) -> Result<impl IntoResponse, AppError> {
    let filename = reports::report_filename(kind, chrono::Utc::now());
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(anyhow::Error::from)?;
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    Ok((headers, body))
}

/// GET /api/v1/report/scenario
pub async fn scenario_report(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let body = state
        .store
        .read(session.token(), |project| Ok(reports::scenario_report(project)?))?;
    csv_download("scenario", body)
}

/// GET /api/v1/report/testcase/:scenario_id
pub async fn testcase_report(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(scenario_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let body = state.store.read(session.token(), |project| {
        let scenario = project
            .scenario(&scenario_id)
            .ok_or(AppError::ScenarioNotFound)?;
        Ok(reports::testcase_report(scenario)?)
    })?;
    csv_download("testcase", body)
}
