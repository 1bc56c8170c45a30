use axum::{
    Json, Router,
    extract::{
        Multipart, Path, Query, State,
        multipart::MultipartRejection,
        rejection::QueryRejection,
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use axum_helpers::{CommonApiResponse, ErrorResponse, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    AddCategoryRequest, Category, CategoryIdQuery, CategoryResponse, ImageUpload, Product,
    ProductAddForm, ProductAddRequest, ProductIdQuery, ProductResponse,
};
use crate::repository::CatalogRepository;
use crate::service::{CategoryService, ProductService};
use crate::storage::{ImageStorage, content_type_for};

#[derive(OpenApi)]
#[openapi(
    paths(
        add_product,
        delete_product,
        list_products,
        get_product,
        list_by_category,
        list_similar,
        fetch_image
    ),
    components(schemas(Product, ProductResponse, ProductAddForm, CommonApiResponse, ErrorResponse)),
    tags((name = "products", description = "Product catalog"))
)]
pub struct ProductApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(add_category, list_categories),
    components(schemas(Category, CategoryResponse, AddCategoryRequest)),
    tags((name = "categories", description = "Product categories"))
)]
pub struct CategoryApiDoc;

pub fn product_router<R, S>(service: ProductService<R, S>) -> Router
where
    R: CatalogRepository + 'static,
    S: ImageStorage + 'static,
{
    Router::new()
        .route("/add", post(add_product::<R, S>))
        .route("/delete/{product_id}", delete(delete_product::<R, S>))
        .route("/all", get(list_products::<R, S>))
        .route("/id", get(get_product::<R, S>))
        .route("/category", get(list_by_category::<R, S>))
        .route("/similar", get(list_similar::<R, S>))
        .route("/{image_name}", get(fetch_image::<R, S>))
        .with_state(Arc::new(service))
}

pub fn category_router<R: CatalogRepository + 'static>(service: CategoryService<R>) -> Router {
    Router::new()
        .route("/add", post(add_category::<R>))
        .route("/all", get(list_categories::<R>))
        .with_state(Arc::new(service))
}

async fn read_product_form(mut multipart: Multipart) -> ProductResult<ProductAddRequest> {
    let mut form = ProductAddRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ProductError::MalformedRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ProductError::MalformedRequest(e.body_text()))?;

            form.image = Some(ImageUpload {
                file_name,
                content_type,
                bytes,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ProductError::MalformedRequest(e.body_text()))?;
            form.set_text_field(&name, &value);
        }
    }

    Ok(form)
}

/// Add a product with its image
#[utoipa::path(
    post,
    path = "/add",
    tag = "products",
    request_body(content = ProductAddForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product added", body = CommonApiResponse),
        (status = 400, description = "Missing request, missing field or unknown category", body = ErrorResponse),
        (status = 500, description = "Failed to add the product", body = ErrorResponse)
    )
)]
pub async fn add_product<R: CatalogRepository, S: ImageStorage>(
    State(service): State<Arc<ProductService<R, S>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ProductResult<CommonApiResponse> {
    let multipart = multipart.map_err(|e| ProductError::MalformedRequest(e.body_text()))?;
    let form = read_product_form(multipart).await?;

    service.add_product(form).await?;
    Ok(CommonApiResponse::ok("Product Added Successfully!"))
}

/// Delete a product and its image
#[utoipa::path(
    delete,
    path = "/delete/{product_id}",
    tag = "products",
    params(("product_id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = CommonApiResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Failed to delete the product", body = ErrorResponse)
    )
)]
pub async fn delete_product<R: CatalogRepository, S: ImageStorage>(
    State(service): State<Arc<ProductService<R, S>>>,
    Path(product_id): Path<i32>,
) -> ProductResult<CommonApiResponse> {
    service.delete_product(product_id).await?;
    Ok(CommonApiResponse::ok("Product deleted successfully!"))
}

/// All products
#[utoipa::path(
    get,
    path = "/all",
    tag = "products",
    responses(
        (status = 200, description = "Products; success=false when there are none", body = ProductResponse)
    )
)]
pub async fn list_products<R: CatalogRepository, S: ImageStorage>(
    State(service): State<Arc<ProductService<R, S>>>,
) -> ProductResult<Json<ProductResponse>> {
    let products = service.list_products().await?;
    Ok(Json(products_response(products)))
}

/// One product by id
#[utoipa::path(
    get,
    path = "/id",
    tag = "products",
    params(ProductIdQuery),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 400, description = "Product id missing or unknown", body = ErrorResponse)
    )
)]
pub async fn get_product<R: CatalogRepository, S: ImageStorage>(
    State(service): State<Arc<ProductService<R, S>>>,
    query: Result<Query<ProductIdQuery>, QueryRejection>,
) -> ProductResult<Json<ProductResponse>> {
    let id = query.ok().and_then(|Query(q)| q.product_id).unwrap_or(0);
    let product = service.get_product(id).await?;

    Ok(Json(ProductResponse::new(
        vec![product],
        "Product fetched successfully!",
    )))
}

/// Products of one category
#[utoipa::path(
    get,
    path = "/category",
    tag = "products",
    params(CategoryIdQuery),
    responses(
        (status = 200, description = "Products; success=false when there are none", body = ProductResponse),
        (status = 400, description = "Category id missing or unknown", body = ErrorResponse)
    )
)]
pub async fn list_by_category<R: CatalogRepository, S: ImageStorage>(
    State(service): State<Arc<ProductService<R, S>>>,
    query: Result<Query<CategoryIdQuery>, QueryRejection>,
) -> ProductResult<Json<ProductResponse>> {
    let category_id = query.ok().and_then(|Query(q)| q.category_id).unwrap_or(0);
    let products = service.list_by_category(category_id).await?;
    Ok(Json(products_response(products)))
}

/// Products similar to a category's products; same listing as `/category`
#[utoipa::path(
    get,
    path = "/similar",
    tag = "products",
    params(CategoryIdQuery),
    responses(
        (status = 200, description = "Products; success=false when there are none", body = ProductResponse),
        (status = 400, description = "Category id missing or unknown", body = ErrorResponse)
    )
)]
pub async fn list_similar<R: CatalogRepository, S: ImageStorage>(
    state: State<Arc<ProductService<R, S>>>,
    query: Result<Query<CategoryIdQuery>, QueryRejection>,
) -> ProductResult<Json<ProductResponse>> {
    list_by_category(state, query).await
}

/// Raw image bytes. An image that cannot be located yields an empty body.
#[utoipa::path(
    get,
    path = "/{image_name}",
    tag = "products",
    params(("image_name" = String, Path, description = "Stored image name")),
    responses(
        (status = 200, description = "Image bytes, empty when the image is missing", content_type = "application/octet-stream")
    )
)]
pub async fn fetch_image<R: CatalogRepository, S: ImageStorage>(
    State(service): State<Arc<ProductService<R, S>>>,
    Path(image_name): Path<String>,
) -> Response {
    match service.fetch_image(&image_name).await {
        Some(bytes) => (
            [(header::CONTENT_TYPE, content_type_for(&image_name))],
            bytes,
        )
            .into_response(),
        None => StatusCode::OK.into_response(),
    }
}

fn products_response(products: Vec<Product>) -> ProductResponse {
    if products.is_empty() {
        ProductResponse::new(products, "Products not found!")
    } else {
        ProductResponse::new(products, "Products fetched successfully!")
    }
}

/// Add a category
#[utoipa::path(
    post,
    path = "/add",
    tag = "categories",
    request_body = AddCategoryRequest,
    responses(
        (status = 200, description = "Category added", body = CommonApiResponse),
        (status = 400, description = "Missing request or field", body = ErrorResponse)
    )
)]
pub async fn add_category<R: CatalogRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    ValidatedJson(request): ValidatedJson<AddCategoryRequest>,
) -> ProductResult<CommonApiResponse> {
    service.add_category(request).await?;
    Ok(CommonApiResponse::ok("Category Added Successfully"))
}

/// All categories
#[utoipa::path(
    get,
    path = "/all",
    tag = "categories",
    responses(
        (status = 200, description = "Categories; success=false when there are none", body = CategoryResponse)
    )
)]
pub async fn list_categories<R: CatalogRepository>(
    State(service): State<Arc<CategoryService<R>>>,
) -> ProductResult<Json<CategoryResponse>> {
    let categories = service.list_categories().await?;

    let (success, message) = if categories.is_empty() {
        (false, "Categories not found")
    } else {
        (true, "Categories fetched successfully")
    };

    Ok(Json(CategoryResponse {
        categories,
        success,
        response_message: message.to_string(),
    }))
}
