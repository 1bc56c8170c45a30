use axum::body::Bytes;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Prices are stored as NUMERIC(10, 2)
const PRICE_SCALE: u32 = 2;
const PRICE_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// Exact decimal, serialized as a string (`"499.00"`)
    #[schema(value_type = String, example = "499.00")]
    pub price: Decimal,
    /// Name under which the image is kept in image storage
    pub image_name: String,
    pub category_id: i32,
}

/// A validated product ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub image_name: String,
    pub category_id: i32,
}

/// An uploaded image as received from the client
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Fields of the product add form.
///
/// Every field is optional so that an incomplete form can be reported as a
/// missing field rather than a malformed request.
#[derive(Debug, Clone, Default, Validate)]
pub struct ProductAddRequest {
    #[validate(required, length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(required, length(min = 1))]
    pub description: Option<String>,
    #[validate(required)]
    pub price: Option<Decimal>,
    #[validate(required, range(min = 1))]
    pub category_id: Option<i32>,
    pub image: Option<ImageUpload>,
}

impl ProductAddRequest {
    /// Apply one text field of the multipart form. Blank values and
    /// unparsable numbers are left unset.
    pub fn set_text_field(&mut self, name: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }

        match name {
            "title" => self.title = Some(value.to_string()),
            "description" => self.description = Some(value.to_string()),
            "price" => self.price = value.parse().ok(),
            "categoryId" => self.category_id = value.parse().ok(),
            other => tracing::debug!(field = other, "Ignoring unknown product form field"),
        }
    }

    /// All required fields present and the price a positive amount the
    /// price column holds exactly
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
            && self.price.is_some_and(storable_price)
            && self.image.as_ref().is_some_and(|i| !i.bytes.is_empty())
    }
}

fn storable_price(price: Decimal) -> bool {
    price > Decimal::ZERO && price < PRICE_LIMIT && price.normalize().scale() <= PRICE_SCALE
}

/// Multipart body of `POST /product/add`, for the API docs only
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ProductAddForm {
    pub title: String,
    pub description: String,
    #[schema(example = "499.00")]
    pub price: String,
    pub category_id: i32,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddCategoryRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductIdQuery {
    #[serde(rename = "productId")]
    pub product_id: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryIdQuery {
    #[serde(rename = "categoryId")]
    pub category_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub products: Vec<Product>,
    pub success: bool,
    pub response_message: String,
}

impl ProductResponse {
    pub fn new(products: Vec<Product>, message: impl Into<String>) -> Self {
        Self {
            success: !products.is_empty(),
            products,
            response_message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub categories: Vec<Category>,
    pub success: bool,
    pub response_message: String,
}
