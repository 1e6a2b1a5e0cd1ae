use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

/// Methods browsers may use against the form endpoints.
const FORM_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

/// Creates a CORS layer restricted to the given origins.
///
/// - Methods: GET, POST, OPTIONS
/// - Headers: Content-Type, Accept, Authorization
/// - 1 hour max age
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods(FORM_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .max_age(Duration::from_secs(3600))
}

/// Creates a CORS layer that accepts any origin.
///
/// Contact forms are embedded in arbitrary sites, so this is the default when
/// no allowlist is configured.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(FORM_METHODS)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600))
}

/// Pick the CORS layer for a configured origin allowlist.
///
/// An empty list allows any origin; otherwise every entry must be a valid
/// header value.
pub fn cors_layer_for(origins: &[String]) -> io::Result<CorsLayer> {
    if origins.is_empty() {
        info!("No CORS allowlist configured, allowing any origin");
        return Ok(create_permissive_cors_layer());
    }

    let allowed_origins = origins
        .iter()
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    info!("CORS configured with allowed origins: {}", origins.join(","));
    Ok(create_cors_layer(allowed_origins))
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origin_list_splits_and_trims() {
        let origins = parse_origin_list("https://a.example.com, https://b.example.com,");
        assert_eq!(origins, vec!["https://a.example.com", "https://b.example.com"]);
    }

    #[test]
    fn test_cors_layer_for_empty_list_is_permissive() {
        assert!(cors_layer_for(&[]).is_ok());
    }

    #[test]
    fn test_cors_layer_for_valid_origins() {
        assert!(cors_layer_for(&["https://example.com".to_string()]).is_ok());
    }

    #[test]
    fn test_cors_layer_for_rejects_invalid_header_value() {
        let err = cors_layer_for(&["bad\norigin".to_string()]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
