use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Local front-end dev servers.
pub(crate) const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

// Reads are GET, creates POST, edits PATCH, removals DELETE.
const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(origins))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(PREFLIGHT_MAX_AGE)
}

fn allowed_origins(origins: &[String]) -> AllowOrigin {
    let mut accepted = Vec::with_capacity(origins.len());
    for origin in origins {
        match HeaderValue::from_str(origin) {
            Ok(value) => accepted.push(value),
            Err(e) => tracing::warn!(origin = %origin, error = %e, "Skipping invalid CORS origin"),
        }
    }

    // Credentials rule out a wildcard origin, so an empty list mirrors the
    // caller's origin instead.
    if accepted.is_empty() {
        tracing::warn!("No valid CORS origins configured, mirroring request origin");
        return AllowOrigin::mirror_request();
    }
    tracing::info!(count = accepted.len(), "CORS origins configured");
    AllowOrigin::list(accepted)
}
