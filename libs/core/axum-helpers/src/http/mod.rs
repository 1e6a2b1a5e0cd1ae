//! HTTP middleware module.
//!
//! ```ignore
//! use axum_helpers::http::cors_layer_for;
//!
//! let app = Router::new().layer(cors_layer_for(&options.allowed_origins)?);
//! ```

pub mod cors;

pub use cors::{cors_layer_for, create_cors_layer, create_permissive_cors_layer, parse_origin_list};
