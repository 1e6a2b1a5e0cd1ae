use crate::response::ApiResponse;
use axum::{Router, extract::State, routing::get};
use core_config::AppInfo;
use serde_json::json;

/// State behind the liveness endpoint.
#[derive(Clone, Copy, Debug)]
pub struct HealthState {
    /// Display name used in the message, e.g. "Mail API"
    pub service: &'static str,
    pub app: AppInfo,
}

/// Health check endpoint handler.
///
/// Always 200 while the process is up; it never touches the SMTP relay.
pub async fn health_handler(State(state): State<HealthState>) -> ApiResponse {
    ApiResponse::ok(format!("{} service is running", state.service)).with_data(json!({
        "name": state.app.name,
        "version": state.app.version,
    }))
}

/// Creates a router with the /health endpoint.
///
/// # Example
/// ```ignore
/// use axum_helpers::server::health_router;
/// use core_config::app_info;
///
/// let app = Router::new().merge(health_router("Mail API", app_info!()));
/// ```
pub fn health_router(service: &'static str, app: AppInfo) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(HealthState { service, app })
}
