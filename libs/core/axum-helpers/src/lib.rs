//! # Axum Helpers
//!
//! Utilities shared by the relay HTTP services.
//!
//! ## Modules
//!
//! - **[`response`]**: the `{success, message, data}` envelope
//! - **[`errors`]**: `AppError` and error codes, rendered as envelopes
//! - **[`extractors`]**: `ValidatedJson`
//! - **[`http`]**: CORS layers
//! - **[`server`]**: router setup, health endpoint, graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_app, create_router, RouterOptions};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let router = create_router::<ApiDoc>(Router::new(), &RouterOptions::default())?;
//!     create_app(router, &ServerConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod response;
pub mod server;

pub use errors::{AppError, ErrorCode};
pub use extractors::ValidatedJson;
pub use http::{cors_layer_for, create_cors_layer, create_permissive_cors_layer};
pub use response::ApiResponse;
pub use server::{
    HealthState, RouterOptions, create_app, create_router, health_router, shutdown_signal,
};
