//! JSON extractor with validation through the `validator` crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has passed `Validate`.
///
/// An unreadable body is rejected with `"bad request - missing request"`,
/// a body that fails validation with `"bad request - missing field"`; both
/// are 400s in the standard envelope.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct AddCategoryRequest {
///     #[validate(length(min = 1))]
///     name: String,
/// }
///
/// async fn add(ValidatedJson(payload): ValidatedJson<AddCategoryRequest>) -> String {
///     payload.name
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request as HttpRequest, http::StatusCode, routing::post};
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1))]
        name: String,
    }

    async fn handler(ValidatedJson(payload): ValidatedJson<Payload>) -> String {
        payload.name
    }

    async fn call(body: &'static str) -> (StatusCode, String) {
        let app = Router::new().route("/", post(handler));
        let response = app
            .oneshot(
                HttpRequest::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn accepts_valid_body() {
        let (status, body) = call(r#"{"name":"Shoes"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Shoes");
    }

    #[tokio::test]
    async fn rejects_unreadable_body_as_missing_request() {
        let (status, body) = call("not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("bad request - missing request"));
    }

    #[tokio::test]
    async fn rejects_invalid_body_as_missing_field() {
        let (status, body) = call(r#"{"name":""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("bad request - missing field"));
    }
}
