//! Cross-origin policy for the JSON API.

use axum::http::Method;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Allow `GET` and `POST` from any origin, echoing the caller's origin back.
#[must_use]
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
