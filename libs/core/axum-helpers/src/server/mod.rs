//! Server infrastructure module.
//!
//! This module provides:
//! - Router setup with shared middleware and OpenAPI document
//! - The liveness endpoint
//! - Graceful shutdown on SIGINT/SIGTERM
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_app, create_router, health_router, RouterOptions};
//! use core_config::{server::ServerConfig, app_info};
//!
//! let routes = api_routes.merge(health_router("Mail API", app_info!()));
//! let router = create_router::<ApiDoc>(routes, &RouterOptions::default())?;
//! create_app(router, &ServerConfig::default()).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{RouterOptions, create_app, create_router};
pub use health::{HealthState, health_handler, health_router};
pub use shutdown::shutdown_signal;
