//! AVALON: API test scenario workbench server.
//!
//! The binary in `main.rs` is a thin CLI over this library; integration tests
//! in `tests/` drive [`app`] directly.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fixtures;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod reports;
pub mod store;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::Instrument;

use fixtures::FixtureProvider;
use store::MemoryStore;

/// Shared application state passed to handlers and middleware.
pub struct AppState {
    pub store: MemoryStore,
    pub fixtures: Arc<dyn FixtureProvider>,
    pub config: config::Config,
}

impl AppState {
    pub fn new(store: MemoryStore, fixtures: Arc<dyn FixtureProvider>, config: config::Config) -> Self {
        Self {
            store,
            fixtures,
            config,
        }
    }
}

/// The full HTTP application: health check, `/api/v1`, body limit, CORS and
/// request ids.
pub fn app(state: Arc<AppState>) -> Router {
    let max_body = state.config.max_upload_bytes;
    let cors = cors_layer(state.config.dashboard_origin.clone());

    Router::new()
        .route("/healthz", axum::routing::get(|| async { "ok" }))
        .nest("/api/v1", api::api_router())
        .with_state(state)
        // Four spec documents share one request body.
        .layer(DefaultBodyLimit::max(max_body.saturating_mul(4)))
        .layer(cors)
        .layer(axum::middleware::from_fn(request_id_middleware))
}

/// Browser access is limited to the dashboard origin and local dev servers.
/// Credentials are allowed so the session cookie is sent.
fn cors_layer(dashboard_origin: String) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            let origin_str = origin.to_str().unwrap_or("");
            origin_str == dashboard_origin
                || origin_str.starts_with("http://localhost:")
                || origin_str.starts_with("http://127.0.0.1:")
        }))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        // AllowHeaders::any() is not allowed together with credentials
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([
            HeaderName::from_static("requesttime"),
            HeaderName::from_static("x-request-id"),
        ])
        .allow_credentials(true)
}

/// Middleware: tags every request with an id, echoed as `X-Request-Id`.
async fn request_id_middleware(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let req_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("request", request_id = %req_id);
    let mut resp = next.run(req).instrument(span).await;
    if let Ok(val) = HeaderValue::from_str(&req_id) {
        resp.headers_mut().insert("x-request-id", val);
    }
    resp
}
