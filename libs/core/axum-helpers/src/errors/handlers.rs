use axum::response::Response;

use super::{AppError, messages};

/// Router fallback for unknown paths.
pub async fn not_found() -> Response {
    axum::response::IntoResponse::into_response(AppError::NotFound(
        messages::NOT_FOUND_RESOURCE.to_string(),
    ))
}
