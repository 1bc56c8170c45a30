use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{User, UserListResponse, UserRole};
use crate::repository::UserRepository;
use crate::service::UserService;

#[derive(OpenApi)]
#[openapi(
    paths(list_delivery_persons),
    components(schemas(User, UserRole, UserListResponse)),
    tags((name = "users", description = "Shop users"))
)]
pub struct ApiDoc;

pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    Router::new()
        .route("/delivery-persons", get(list_delivery_persons::<R>))
        .with_state(Arc::new(service))
}

/// Delivery persons available for assignment
#[utoipa::path(
    get,
    path = "/delivery-persons",
    tag = "users",
    responses(
        (status = 200, description = "Delivery persons; success=false when there are none", body = UserListResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_delivery_persons<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
) -> UserResult<Json<UserListResponse>> {
    let users = service.list_delivery_persons().await?;

    let response = if users.is_empty() {
        UserListResponse {
            users,
            success: false,
            response_message: "Delivery persons not found".to_string(),
        }
    } else {
        UserListResponse {
            users,
            success: true,
            response_message: "Delivery persons fetched successfully".to_string(),
        }
    };

    Ok(Json(response))
}
