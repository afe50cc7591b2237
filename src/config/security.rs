use axum::http::{header, HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

const NOSNIFF: &str = "nosniff";
const DENY: &str = "DENY";
const XSS_BLOCK: &str = "1; mode=block";
const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";
const CSP_API_VALUE: &str = "default-src 'none'; frame-ancestors 'none'";
const REFERRER_POLICY_VALUE: &str = "strict-origin-when-cross-origin";
const PERMISSIONS_POLICY_VALUE: &str = "geolocation=(), microphone=(), camera=()";

fn headers(include_hsts: bool) -> Vec<(HeaderName, &'static str)> {
    let mut headers = vec![
        (header::X_CONTENT_TYPE_OPTIONS, NOSNIFF),
        (header::X_FRAME_OPTIONS, DENY),
        (header::X_XSS_PROTECTION, XSS_BLOCK),
        (header::CONTENT_SECURITY_POLICY, CSP_API_VALUE),
        (header::REFERRER_POLICY, REFERRER_POLICY_VALUE),
        (
            HeaderName::from_static("permissions-policy"),
            PERMISSIONS_POLICY_VALUE,
        ),
    ];
    // Only meaningful behind TLS.
    if include_hsts {
        headers.push((header::STRICT_TRANSPORT_SECURITY, HSTS_VALUE));
    }
    headers
}

/// Stamps the API security headers on every response.
pub fn apply_security_headers(router: Router, include_hsts: bool) -> Router {
    if include_hsts {
        tracing::info!("Security: HSTS header enabled (production mode)");
    } else {
        tracing::info!("Security: HSTS header disabled (development mode)");
    }

    headers(include_hsts)
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::overriding(
                name,
                HeaderValue::from_static(value),
            ))
        })
}
