use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, messages};
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ProductError {
    /// The request body could not be read at all
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// A required input is absent; the message is shown to the client
    #[error("{0}")]
    MissingField(String),

    #[error("Unknown product category")]
    InvalidCategory,

    #[error("Product not found: {0}")]
    UnknownProduct(i32),

    #[error("Category not found: {0}")]
    CategoryNotFound(i32),

    #[error("Category '{0}' already exists")]
    DuplicateCategory(String),

    /// Delete target does not exist
    #[error("Product not found: {0}")]
    NotFound(i32),

    #[error("Failed to add product")]
    AddFailed,

    #[error("Failed to delete product {0}")]
    DeleteFailed(i32),

    #[error("Image storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::MalformedRequest(reason) => {
                tracing::warn!(reason = %reason, "Unreadable product request");
                AppError::BadRequest(messages::MISSING_REQUEST.to_string())
            }
            ProductError::MissingField(msg) => AppError::BadRequest(msg),
            ProductError::InvalidCategory => {
                AppError::BadRequest("please select correct product category".to_string())
            }
            ProductError::UnknownProduct(_) => AppError::BadRequest("Product not found".to_string()),
            ProductError::CategoryNotFound(_) => {
                AppError::BadRequest("Category not found!".to_string())
            }
            ProductError::DuplicateCategory(name) => {
                AppError::BadRequest(format!("Category '{}' already exists", name))
            }
            ProductError::NotFound(_) => AppError::NotFound("Product not found".to_string()),
            ProductError::AddFailed => {
                AppError::InternalServerError("Failed to add the Product".to_string())
            }
            ProductError::DeleteFailed(_) => {
                AppError::InternalServerError("Failed to delete the product".to_string())
            }
            ProductError::Storage(e) => {
                tracing::error!("Image storage failure: {}", e);
                AppError::InternalServerError(messages::INTERNAL_ERROR.to_string())
            }
            ProductError::Database(msg) => {
                tracing::error!("Catalog store failure: {}", msg);
                AppError::InternalServerError(messages::DB_ERROR.to_string())
            }
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<sea_orm::DbErr> for ProductError {
    fn from(err: sea_orm::DbErr) -> Self {
        ProductError::Database(err.to_string())
    }
}
