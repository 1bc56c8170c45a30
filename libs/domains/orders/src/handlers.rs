use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    routing::{delete, get, post, put},
};
use axum_helpers::{AppError, CommonApiResponse, ErrorResponse, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::OrderResult;
use crate::models::{
    AddToCartRequest, CartItem, CartResponse, DeliveryPersonQuery, DeliveryStatus, DeliveryTime,
    OrderIdQuery, OrderListResponse, OrderView, UpdateDeliveryStatusRequest, UserIdQuery,
};
use crate::repository::{CartRepository, OrderRepository};
use crate::service::{CartService, OrderService};

#[derive(OpenApi)]
#[openapi(
    paths(
        place_order,
        list_user_orders,
        list_all_orders,
        list_by_order_id,
        update_delivery_status,
        assign_delivery_person,
        list_delivery_orders
    ),
    components(schemas(
        OrderView,
        OrderListResponse,
        UpdateDeliveryStatusRequest,
        DeliveryStatus,
        DeliveryTime,
        CommonApiResponse,
        ErrorResponse
    )),
    tags((name = "orders", description = "Checkout and delivery"))
)]
pub struct OrderApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(add_to_cart, fetch_cart, remove_from_cart),
    components(schemas(AddToCartRequest, CartItem, CartResponse)),
    tags((name = "cart", description = "Shopping cart"))
)]
pub struct CartApiDoc;

pub fn order_router<R: OrderRepository + 'static>(service: OrderService<R>) -> Router {
    Router::new()
        .route("/place", post(place_order::<R>))
        .route("/user", get(list_user_orders::<R>))
        .route("/all", get(list_all_orders::<R>))
        .route("/id", get(list_by_order_id::<R>))
        .route("/delivery-status", put(update_delivery_status::<R>))
        .route("/assign-delivery", put(assign_delivery_person::<R>))
        .route("/delivery", get(list_delivery_orders::<R>))
        .with_state(Arc::new(service))
}

pub fn cart_router<R: CartRepository + 'static>(service: CartService<R>) -> Router {
    Router::new()
        .route("/add", post(add_to_cart::<R>))
        .route("/fetch", get(fetch_cart::<R>))
        .route("/delete/{cart_id}", delete(remove_from_cart::<R>))
        .with_state(Arc::new(service))
}

fn orders_response(orders: Vec<OrderView>) -> OrderListResponse {
    if orders.is_empty() {
        OrderListResponse::not_found()
    } else {
        OrderListResponse::fetched(orders)
    }
}

/// Place an order for everything in the user's cart
#[utoipa::path(
    post,
    path = "/place",
    tag = "orders",
    params(UserIdQuery),
    responses(
        (status = 200, description = "Order placed; the message carries the order id", body = CommonApiResponse),
        (status = 400, description = "Missing user id or empty cart", body = ErrorResponse),
        (status = 500, description = "Placement failed and was rolled back", body = ErrorResponse)
    )
)]
pub async fn place_order<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> OrderResult<CommonApiResponse> {
    let user_id = query.ok().and_then(|Query(q)| q.user_id).unwrap_or(0);
    let order_id = service.place_order(user_id).await?;

    Ok(CommonApiResponse::ok(format!(
        "Your Order Placed, Order Id: {}",
        order_id
    )))
}

/// Orders placed by one user
#[utoipa::path(
    get,
    path = "/user",
    tag = "orders",
    params(UserIdQuery),
    responses(
        (status = 200, description = "Orders; success=false when there are none", body = OrderListResponse),
        (status = 400, description = "User id missing", body = ErrorResponse)
    )
)]
pub async fn list_user_orders<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> OrderResult<Json<OrderListResponse>> {
    let user_id = query.ok().and_then(|Query(q)| q.user_id).unwrap_or(0);
    let orders = service.list_user_orders(user_id).await?;
    Ok(Json(orders_response(orders)))
}

/// Every order row
#[utoipa::path(
    get,
    path = "/all",
    tag = "orders",
    responses(
        (status = 200, description = "Orders; success=false when there are none", body = OrderListResponse)
    )
)]
pub async fn list_all_orders<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
) -> OrderResult<Json<OrderListResponse>> {
    let orders = service.list_all_orders().await?;
    Ok(Json(orders_response(orders)))
}

/// Rows of one checkout. A missing order id is reported like an unknown one.
#[utoipa::path(
    get,
    path = "/id",
    tag = "orders",
    params(OrderIdQuery),
    responses(
        (status = 200, description = "Orders; success=false when there are none", body = OrderListResponse)
    )
)]
pub async fn list_by_order_id<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    query: Result<Query<OrderIdQuery>, QueryRejection>,
) -> OrderResult<Json<OrderListResponse>> {
    let order_id = query
        .ok()
        .and_then(|Query(q)| q.order_id)
        .filter(|id| !id.trim().is_empty());

    let Some(order_id) = order_id else {
        return Ok(Json(OrderListResponse::not_found()));
    };

    let orders = service.list_by_order_id(order_id.trim()).await?;
    Ok(Json(orders_response(orders)))
}

/// Set delivery date, time and status on every row of an order
#[utoipa::path(
    put,
    path = "/delivery-status",
    tag = "orders",
    request_body = UpdateDeliveryStatusRequest,
    responses(
        (status = 200, description = "Updated rows", body = OrderListResponse),
        (status = 400, description = "Missing request, missing field or unknown order", body = ErrorResponse)
    )
)]
pub async fn update_delivery_status<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    payload: Result<Json<UpdateDeliveryStatusRequest>, axum::extract::rejection::JsonRejection>,
) -> Result<Json<OrderListResponse>, AppError> {
    let Json(request) = payload?;
    let orders = service.update_delivery_status(request).await?;
    Ok(Json(OrderListResponse::fetched(orders)))
}

/// Assign a delivery person to every row of an order
#[utoipa::path(
    put,
    path = "/assign-delivery",
    tag = "orders",
    request_body = UpdateDeliveryStatusRequest,
    responses(
        (status = 200, description = "Updated rows", body = OrderListResponse),
        (status = 400, description = "Missing request, missing field or unknown order", body = ErrorResponse)
    )
)]
pub async fn assign_delivery_person<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    payload: Result<Json<UpdateDeliveryStatusRequest>, axum::extract::rejection::JsonRejection>,
) -> Result<Json<OrderListResponse>, AppError> {
    let Json(request) = payload?;
    let orders = service.assign_delivery_person(request).await?;
    Ok(Json(OrderListResponse::fetched(orders)))
}

/// Orders assigned to one delivery person
#[utoipa::path(
    get,
    path = "/delivery",
    tag = "orders",
    params(DeliveryPersonQuery),
    responses(
        (status = 200, description = "Assigned orders", body = OrderListResponse),
        (status = 400, description = "Missing delivery person id or no orders", body = ErrorResponse)
    )
)]
pub async fn list_delivery_orders<R: OrderRepository>(
    State(service): State<Arc<OrderService<R>>>,
    query: Result<Query<DeliveryPersonQuery>, QueryRejection>,
) -> OrderResult<Json<OrderListResponse>> {
    let id = query
        .ok()
        .and_then(|Query(q)| q.delivery_person_id)
        .unwrap_or(0);
    let orders = service.list_delivery_orders(id).await?;
    Ok(Json(OrderListResponse::fetched(orders)))
}

/// Put a product into the user's cart
#[utoipa::path(
    post,
    path = "/add",
    tag = "cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Line added", body = CommonApiResponse),
        (status = 400, description = "Missing field or unknown product", body = ErrorResponse)
    )
)]
pub async fn add_to_cart<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    ValidatedJson(request): ValidatedJson<AddToCartRequest>,
) -> OrderResult<CommonApiResponse> {
    service.add_to_cart(request).await?;
    Ok(CommonApiResponse::ok("Product added to cart successfully"))
}

/// The user's cart with line and cart totals
#[utoipa::path(
    get,
    path = "/fetch",
    tag = "cart",
    params(UserIdQuery),
    responses(
        (status = 200, description = "Cart; success=false when it is empty", body = CartResponse),
        (status = 400, description = "User id missing", body = ErrorResponse)
    )
)]
pub async fn fetch_cart<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> OrderResult<Json<CartResponse>> {
    let user_id = query.ok().and_then(|Query(q)| q.user_id).unwrap_or(0);
    let cart = service.fetch_cart(user_id).await?;

    let (success, message) = if cart.items.is_empty() {
        (false, "Your Cart is Empty!!!")
    } else {
        (true, "Cart fetched successfully")
    };

    Ok(Json(CartResponse {
        cart: cart.items,
        total_cart_price: cart.total,
        success,
        response_message: message.to_string(),
    }))
}

/// Remove one line from a cart
#[utoipa::path(
    delete,
    path = "/delete/{cart_id}",
    tag = "cart",
    params(("cart_id" = i32, Path, description = "Cart line id")),
    responses(
        (status = 200, description = "Line removed", body = CommonApiResponse),
        (status = 404, description = "Cart item not found", body = ErrorResponse)
    )
)]
pub async fn remove_from_cart<R: CartRepository>(
    State(service): State<Arc<CartService<R>>>,
    Path(cart_id): Path<i32>,
) -> OrderResult<CommonApiResponse> {
    service.remove_from_cart(cart_id).await?;
    Ok(CommonApiResponse::ok("Cart item removed successfully"))
}
