use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, messages};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    /// A required input is absent; the message is shown to the client
    #[error("{0}")]
    MissingField(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("No orders match")]
    OrdersNotFound,

    /// Placement was rolled back
    #[error("Failed to place order")]
    PlacementFailed,

    #[error("Product not found: {0}")]
    ProductNotFound(i32),

    #[error("Cart item not found: {0}")]
    CartItemNotFound(i32),

    #[error("Database error: {0}")]
    Database(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::MissingField(msg) => AppError::BadRequest(msg),
            OrderError::EmptyCart => AppError::BadRequest("Your Cart is Empty!!!".to_string()),
            OrderError::OrdersNotFound => AppError::BadRequest("Orders not found!!!".to_string()),
            OrderError::PlacementFailed => {
                AppError::InternalServerError("Failed to Order Products!!!".to_string())
            }
            OrderError::ProductNotFound(_) => AppError::BadRequest("Product not found".to_string()),
            OrderError::CartItemNotFound(_) => {
                AppError::NotFound("Cart item not found".to_string())
            }
            OrderError::Database(msg) => {
                tracing::error!("Order store failure: {}", msg);
                AppError::InternalServerError(messages::DB_ERROR.to_string())
            }
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<sea_orm::DbErr> for OrderError {
    fn from(err: sea_orm::DbErr) -> Self {
        OrderError::Database(err.to_string())
    }
}
