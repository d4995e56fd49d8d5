//! Cross-origin access for browser clients
//!
//! Every origin is allowed. Any `OPTIONS` request is answered by the layer
//! with an empty body, before routing.
use axum::http::{header, HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};

/// Request headers browser clients may send
pub fn allowed_headers() -> [HeaderName; 4] {
    [
        header::AUTHORIZATION,
        HeaderName::from_static("x-client-info"),
        HeaderName::from_static("apikey"),
        header::CONTENT_TYPE,
    ]
}

/// CORS layer applied to the whole router
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(allowed_headers())
}
