//! Liveness, fallback and failure handlers

use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::any::Any;
use tracing::{error, warn};

pub async fn health() -> &'static str {
    "OK"
}

pub async fn not_found(uri: Uri) -> (StatusCode, &'static str) {
    warn!("[404] [{}]", uri);
    (StatusCode::NOT_FOUND, "[404] Not Found")
}

/// Response for a handler that panicked mid-request.
pub fn internal_error(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    };
    error!("[500] Handler panicked: {}", message);

    (StatusCode::INTERNAL_SERVER_ERROR, "[500] Internal Server Error").into_response()
}
