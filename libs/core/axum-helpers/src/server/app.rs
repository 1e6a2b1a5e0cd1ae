use super::shutdown::shutdown_signal;
use crate::errors::{AppError, ErrorCode, handlers::not_found};
use crate::http::{cors_layer_for, parse_origin_list};
use crate::response::ApiResponse;
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or, server::ServerConfig};
use std::any::Any;
use std::io;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Limits applied to every inbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouterOptions {
    /// Maximum accepted request body, in bytes
    pub max_body_size: usize,
    /// Upper bound on handling one request, SMTP conversation included
    pub request_timeout: Duration,
    /// CORS origin allowlist; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024,
            request_timeout: Duration::from_secs(60),
            allowed_origins: Vec::new(),
        }
    }
}

impl FromEnv for RouterOptions {
    /// - MAX_BODY_SIZE: bytes, defaults to 1 MiB
    /// - REQUEST_TIMEOUT_SECS: defaults to 60
    /// - CORS_ALLOWED_ORIGIN: comma-separated origins, defaults to any origin
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            max_body_size: env_parse_or("MAX_BODY_SIZE", defaults.max_body_size)?,
            request_timeout: Duration::from_secs(env_parse_or(
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            allowed_origins: parse_origin_list(&env_or_default("CORS_ALLOWED_ORIGIN", "")),
        })
    }
}

/// Starts the Axum server with graceful shutdown.
///
/// # Errors
/// Returns an error if:
/// - The TCP listener fails to bind to the configured address
/// - The server encounters an error during operation
pub async fn create_app(router: Router, server_config: &ServerConfig) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;

    info!("Server starting on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        })?;

    info!("Server exited gracefully");
    Ok(())
}

/// Wraps service routes with the cross-cutting layers every service shares.
///
/// This sets up:
/// - `GET /api-docs/openapi.json` serving `T`'s OpenAPI document
/// - a JSON 404 fallback
/// - request tracing, panic recovery, body size limit and a request timeout
///   answered with a 408 envelope
/// - CORS (see [`cors_layer_for`])
///
/// Routes are merged at the root; callers nest them where they need to.
///
/// # Errors
/// Returns an error if an allowed origin is not a valid header value.
pub fn create_router<T>(routes: Router, options: &RouterOptions) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let cors_layer = cors_layer_for(&options.allowed_origins)?;

    let router = Router::new()
        .route("/api-docs/openapi.json", get(|| async { Json(T::openapi()) }))
        .merge(routes)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(options.max_body_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            options.request_timeout,
        ))
        .layer(middleware::map_response(timeout_envelope))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer);

    Ok(router)
}

/// The timeout layer answers 408 with an empty body; give it the envelope.
/// A 408 that already carries a content type came from a handler and is kept.
async fn timeout_envelope(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }
    AppError::RequestTimeout(ErrorCode::RequestTimeout.default_message().to_string())
        .into_response()
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::failure("Internal server error")),
    )
        .into_response()
}
