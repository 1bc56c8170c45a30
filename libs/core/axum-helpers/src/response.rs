//! Success envelope shared by every endpoint.
//!
//! Payload-carrying responses (`products`, `orders`, ...) repeat the two
//! fields next to their payload in the domain crates.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommonApiResponse {
    pub success: bool,
    pub response_message: String,
}

impl CommonApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            response_message: message.into(),
        }
    }

    /// A 200 response that reports nothing was found or done.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            response_message: message.into(),
        }
    }
}

impl IntoResponse for CommonApiResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(CommonApiResponse::ok("Product Added Successfully!")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "responseMessage": "Product Added Successfully!"})
        );
    }

    #[test]
    fn failed_is_still_a_200() {
        let response = CommonApiResponse::failed("Products not found!").into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
