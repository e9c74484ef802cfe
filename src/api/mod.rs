use std::sync::Arc;

use axum::{
    extract::FromRequest,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::AppState;

pub mod project;
pub mod report;
pub mod scenario;
pub mod spec;
pub mod test_run;
pub mod testcase;

/// Success envelope shared by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: &'static str,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Self::with_message(data, "OK")
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            data,
            status: "success",
            message: message.into(),
        })
    }
}

/// JSON body extractor whose rejections use the `{"error"}` body of [`AppError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Headers carrying the server time the request was handled at.
pub(crate) fn request_time_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let now = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    if let Ok(val) = HeaderValue::from_str(&now) {
        headers.insert("requesttime", val);
    }
    headers
}

/// Build the AVALON API router.
/// All routes are relative; the caller mounts this under `/api/v1`.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Projects / sessions
        .route("/project", post(project::login).delete(project::logout))
        .route("/project/:project_id", delete(project::delete_project))
        // Scenarios
        .route("/scenario/create", post(scenario::generate_scenarios))
        .route(
            "/scenario",
            get(scenario::list_scenarios).post(scenario::create_scenario),
        )
        .route(
            "/scenario/:scenario_id",
            get(scenario::get_scenario)
                .put(scenario::update_scenario)
                .delete(scenario::delete_scenario),
        )
        // Test cases
        .route("/tc", post(testcase::generate_test_cases))
        .route(
            "/tc/scenario/:scenario_id",
            get(testcase::list_scenario_test_cases).post(testcase::create_scenario_test_case),
        )
        .route("/tc/api/:scenario_id", get(testcase::list_apis))
        .route(
            "/tc/api/:scenario_id/:api_id",
            get(testcase::api_test_data_template).post(testcase::create_api_test_case),
        )
        .route(
            "/tc/:tc_id",
            get(testcase::get_test_case)
                .put(testcase::update_test_case)
                .delete(testcase::delete_test_case),
        )
        // Test runs
        .route("/test/run", post(test_run::run_tests))
        .route("/test/result", get(test_run::list_results))
        .route("/test/result/:scenario_id", get(test_run::scenario_results))
        // Reports
        .route("/report/scenario", get(report::scenario_report))
        .route("/report/testcase/:scenario_id", get(report::testcase_report))
        // Spec documents
        .route("/spec", post(spec::upload_spec))
        .route("/spec/analyze", post(spec::analyze_spec))
        .layer(TraceLayer::new_for_http())
        .fallback(fallback_404)
}

async fn fallback_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
