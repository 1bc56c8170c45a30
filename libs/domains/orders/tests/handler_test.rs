//! Handler tests for the orders domain
//!
//! The in-memory store backs both routers; a wrapper around it injects
//! save failures to exercise rollback.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::Router;
use chrono::Utc;
use domain_catalog::Product;
use domain_orders::*;
use domain_users::{User, UserRole};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use std::sync::Arc;
use test_utils::{TestDataBuilder, TestDatabase};
use tower::ServiceExt;

const CUSTOMER: i32 = 1;
const COURIER: i32 = 2;
const MUG: i32 = 10;
const LAMP: i32 = 11;

async fn json_body(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn user(id: i32, first: &str, role: UserRole) -> User {
    User {
        id,
        first_name: first.into(),
        last_name: "Tester".into(),
        email_id: format!("{}@shop.test", first.to_lowercase()),
        phone_no: format!("90000000{:02}", id),
        address: "12 Lake Rd".into(),
        role,
        created_at: Utc::now(),
    }
}

fn product(id: i32, title: &str, price: Decimal) -> Product {
    Product {
        id,
        title: title.into(),
        description: format!("{} description", title),
        price,
        image_name: format!("{}.png", title.to_lowercase()),
        category_id: 1,
    }
}

async fn seeded_store() -> InMemoryOrderStore {
    let store = InMemoryOrderStore::new();
    store.register_user(&user(CUSTOMER, "Asha", UserRole::Customer)).await;
    store.register_user(&user(COURIER, "Ravi", UserRole::Delivery)).await;
    store.register_product(&product(MUG, "Mug", Decimal::new(24950, 2))).await;
    store.register_product(&product(LAMP, "Lamp", Decimal::new(1299, 0))).await;
    store
}

async fn fill_cart(store: &InMemoryOrderStore) {
    for (product_id, quantity) in [(MUG, 2), (LAMP, 1)] {
        store
            .add(AddToCartRequest {
                user_id: CUSTOMER,
                product_id,
                quantity,
            })
            .await
            .unwrap();
    }
}

fn order_app<R: OrderRepository + 'static>(repo: R) -> Router {
    handlers::order_router(OrderService::new(repo))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, json_body(response.into_body()).await)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn put_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::put(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn place(app: &Router) -> String {
    let (status, body) = send(
        app,
        Request::post(format!("/place?userId={CUSTOMER}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let message = body["responseMessage"].as_str().unwrap();
    message
        .strip_prefix("Your Order Placed, Order Id: ")
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_place_order_converts_whole_cart() {
    let store = seeded_store().await;
    fill_cart(&store).await;
    let app = order_app(store.clone());

    let order_id = place(&app).await;
    assert_eq!(order_id.len(), 10);

    let orders = store.orders().await;
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o.order_id == order_id));
    assert!(orders.iter().all(|o| o.delivery_status == DeliveryStatus::Pending
        && o.delivery_time == DeliveryTime::Default
        && o.delivery_date == "Pending"
        && o.delivery_person_id == 0
        && !o.delivery_assigned));
    assert!(store.cart_lines(CUSTOMER).await.is_empty());

    let (status, body) = send(&app, get(&format!("/id?orderId={order_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["responseMessage"], "Order Fetched Successful!!");
    assert_eq!(body["orders"][0]["totalPrice"], "499.00");
    assert_eq!(body["orders"][1]["totalPrice"], "1299");
    assert_eq!(body["orders"][0]["userName"], "Asha Tester");
    assert_eq!(body["orders"][0]["deliveryPersonName"], "Pending");
    assert_eq!(body["orders"][0]["deliveryPersonContact"], "Pending");
}

#[tokio::test]
async fn test_place_order_empty_cart_creates_nothing() {
    let store = seeded_store().await;
    let app = order_app(store.clone());

    let (status, body) = send(
        &app,
        Request::post(format!("/place?userId={CUSTOMER}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["responseMessage"], "Your Cart is Empty!!!");
    assert!(store.orders().await.is_empty());
}

#[tokio::test]
async fn test_place_order_missing_user() {
    let app = order_app(seeded_store().await);

    let (status, body) = send(&app, Request::post("/place").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["responseMessage"], "bad request - missing field");
}

/// Delegates to the in-memory store but reports the n-th save as not
/// persisted.
struct FlakyStore {
    inner: InMemoryOrderStore,
    successful_saves: usize,
}

struct FlakyUnitOfWork {
    inner: Box<dyn OrderUnitOfWork>,
    saves_left: usize,
}

#[async_trait]
impl OrderUnitOfWork for FlakyUnitOfWork {
    async fn cart_lines(&mut self, user_id: i32) -> OrderResult<Vec<CartLine>> {
        self.inner.cart_lines(user_id).await
    }

    async fn save_order(&mut self, order: NewOrder) -> OrderResult<Option<Order>> {
        if self.saves_left == 0 {
            return Ok(None);
        }
        self.saves_left -= 1;
        self.inner.save_order(order).await
    }

    async fn delete_cart_line(&mut self, cart_id: i32) -> OrderResult<u64> {
        self.inner.delete_cart_line(cart_id).await
    }

    async fn update_delivery_status(
        &mut self,
        order_id: &str,
        update: &DeliveryUpdate,
    ) -> OrderResult<u64> {
        self.inner.update_delivery_status(order_id, update).await
    }

    async fn assign_delivery_person(
        &mut self,
        order_id: &str,
        delivery_person_id: i32,
    ) -> OrderResult<u64> {
        self.inner
            .assign_delivery_person(order_id, delivery_person_id)
            .await
    }

    async fn commit(self: Box<Self>) -> OrderResult<()> {
        self.inner.commit().await
    }

    async fn rollback(self: Box<Self>) -> OrderResult<()> {
        self.inner.rollback().await
    }
}

#[async_trait]
impl OrderRepository for FlakyStore {
    async fn begin(&self) -> OrderResult<Box<dyn OrderUnitOfWork>> {
        Ok(Box::new(FlakyUnitOfWork {
            inner: self.inner.begin().await?,
            saves_left: self.successful_saves,
        }))
    }

    async fn list_details(&self, scope: OrderScope) -> OrderResult<Vec<OrderDetail>> {
        self.inner.list_details(scope).await
    }

    async fn find_delivery_person(&self, id: i32) -> OrderResult<Option<DeliveryContact>> {
        self.inner.find_delivery_person(id).await
    }
}

#[tokio::test]
async fn test_place_order_failure_midway_rolls_back() {
    let store = seeded_store().await;
    fill_cart(&store).await;
    let app = order_app(FlakyStore {
        inner: store.clone(),
        successful_saves: 1,
    });

    let (status, body) = send(
        &app,
        Request::post(format!("/place?userId={CUSTOMER}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["responseMessage"], "Failed to Order Products!!!");
    assert!(store.orders().await.is_empty());
    assert_eq!(store.cart_lines(CUSTOMER).await.len(), 2);
}

#[tokio::test]
async fn test_update_delivery_status_touches_every_row() {
    let store = seeded_store().await;
    fill_cart(&store).await;
    let app = order_app(store.clone());
    let order_id = place(&app).await;

    let (status, body) = send(
        &app,
        put_json(
            "/delivery-status",
            serde_json::json!({
                "orderId": order_id,
                "deliveryDate": "12-06-2025",
                "deliveryTime": "Evening",
                "deliveryStatus": "On the Way"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    for order in orders {
        assert_eq!(order["deliveryStatus"], "On the Way");
        assert_eq!(order["deliveryDate"], "12-06-2025 Evening");
    }

    let (_, body) = send(&app, get(&format!("/id?orderId={order_id}"))).await;
    assert!(body["orders"]
        .as_array()
        .unwrap()
        .iter()
        .all(|o| o["deliveryStatus"] == "On the Way"));
}

#[tokio::test]
async fn test_update_delivery_status_error_branches() {
    let store = seeded_store().await;
    let app = order_app(store);

    let (status, body) = send(
        &app,
        put_json(
            "/delivery-status",
            serde_json::json!({
                "orderId": "NOSUCHORDR",
                "deliveryDate": "12-06-2025",
                "deliveryTime": "Morning",
                "deliveryStatus": "Delivered"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["responseMessage"], "Orders not found!!!");

    let (status, body) = send(
        &app,
        put_json(
            "/delivery-status",
            serde_json::json!({ "orderId": "", "deliveryStatus": "Delivered" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["responseMessage"], "bad request - missing field");

    let response = app
        .clone()
        .oneshot(
            Request::put("/delivery-status")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["responseMessage"], "bad request - missing request");
}

#[tokio::test]
async fn test_assign_delivery_person_and_queue() {
    let store = seeded_store().await;
    fill_cart(&store).await;
    let app = order_app(store.clone());
    let order_id = place(&app).await;

    let (status, body) = send(&app, get(&format!("/delivery?deliveryPersonId={COURIER}"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["responseMessage"], "Orders not found!!!");

    let (status, body) = send(
        &app,
        put_json(
            "/assign-delivery",
            serde_json::json!({ "orderId": order_id, "deliveryId": COURIER }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    for order in body["orders"].as_array().unwrap() {
        assert_eq!(order["deliveryPersonName"], "Ravi");
        assert_eq!(order["deliveryPersonContact"], "9000000002");
    }
    assert!(store
        .orders()
        .await
        .iter()
        .all(|o| o.delivery_assigned && o.delivery_person_id == COURIER));

    let (status, body) = send(&app, get(&format!("/delivery?deliveryPersonId={COURIER}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, get("/delivery")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["responseMessage"], "bad request - missing field");
}

#[tokio::test]
async fn test_dangling_delivery_person_shows_pending() {
    let store = seeded_store().await;
    fill_cart(&store).await;
    let app = order_app(store.clone());
    let order_id = place(&app).await;

    let (status, body) = send(
        &app,
        put_json(
            "/assign-delivery",
            serde_json::json!({ "orderId": order_id, "deliveryId": 404 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"][0]["deliveryPersonName"], "Pending");
    assert_eq!(body["orders"][0]["deliveryPersonContact"], "Pending");
}

#[tokio::test]
async fn test_order_listing_soft_failures() {
    let app = order_app(seeded_store().await);

    let (status, body) = send(&app, get("/user")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["responseMessage"], "User Id missing");

    for uri in [
        format!("/user?userId={CUSTOMER}"),
        "/all".to_string(),
        "/id".to_string(),
        "/id?orderId=UNKNOWN123".to_string(),
    ] {
        let (status, body) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["success"], false, "{uri}");
        assert_eq!(body["responseMessage"], "Orders not found", "{uri}");
    }
}

#[tokio::test]
async fn test_user_orders_only_lists_own_rows() {
    let store = seeded_store().await;
    fill_cart(&store).await;
    let app = order_app(store.clone());
    place(&app).await;

    let (status, body) = send(&app, get(&format!("/user?userId={CUSTOMER}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, get(&format!("/user?userId={COURIER}"))).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_cart_add_fetch_and_remove() {
    let store = seeded_store().await;
    let app = handlers::cart_router(CartService::new(store.clone()));

    let add = |body: serde_json::Value| {
        Request::post("/add")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let (status, body) = send(
        &app,
        add(serde_json::json!({"userId": CUSTOMER, "productId": MUG, "quantity": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["responseMessage"], "Product added to cart successfully");

    let (status, body) = send(
        &app,
        add(serde_json::json!({"userId": CUSTOMER, "productId": 999, "quantity": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["responseMessage"], "Product not found");

    let (status, body) = send(
        &app,
        add(serde_json::json!({"userId": CUSTOMER, "productId": MUG})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["responseMessage"], "bad request - missing field");

    let (status, body) = send(&app, get(&format!("/fetch?userId={CUSTOMER}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["cart"][0]["totalPrice"], "748.50");
    assert_eq!(body["totalCartPrice"], "748.50");

    let cart_id = body["cart"][0]["id"].as_i64().unwrap();
    let (status, body) = send(
        &app,
        Request::delete(format!("/delete/{cart_id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["responseMessage"], "Cart item removed successfully");

    let (status, _) = send(
        &app,
        Request::delete(format!("/delete/{cart_id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get(&format!("/fetch?userId={CUSTOMER}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["responseMessage"], "Your Cart is Empty!!!");

    let (status, body) = send(&app, get("/fetch")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["responseMessage"], "User Id missing");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_pg_checkout_and_delivery_flow() {
    use domain_catalog::{CatalogRepository, NewProduct, PgCatalogRepository};
    use domain_users::{CreateUser, PgUserRepository, UserRepository};

    let db = TestDatabase::new().await;
    let builder = TestDataBuilder::from_test_name("pg_checkout_flow");

    let users = PgUserRepository::new(db.connection());
    let customer = users
        .create(CreateUser {
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            email_id: builder.email("customer"),
            phone_no: builder.phone(),
            address: "12 Lake Rd".into(),
            role: UserRole::Customer,
        })
        .await
        .unwrap();
    let courier = users
        .create(CreateUser {
            first_name: "Ravi".into(),
            last_name: "Kumar".into(),
            email_id: builder.email("courier"),
            phone_no: builder.phone(),
            address: String::new(),
            role: UserRole::Delivery,
        })
        .await
        .unwrap();

    let catalog = PgCatalogRepository::new(db.connection());
    let category = catalog
        .create_category(builder.name("cat", "kitchen"))
        .await
        .unwrap();
    let mug = catalog
        .create_product(NewProduct {
            title: "Mug".into(),
            description: "Stoneware".into(),
            price: Decimal::new(24950, 2),
            image_name: "mug.png".into(),
            category_id: category.id,
        })
        .await
        .unwrap();

    let repo = Arc::new(PgOrderRepository::new(db.connection()));
    let carts = CartService::from_shared(Arc::clone(&repo));
    let orders = OrderService::from_shared(Arc::clone(&repo));

    carts
        .add_to_cart(AddToCartRequest {
            user_id: customer.id,
            product_id: mug.id,
            quantity: 2,
        })
        .await
        .unwrap();
    let cart = carts.fetch_cart(customer.id).await.unwrap();
    assert_eq!(cart.total, Decimal::new(49900, 2));

    let order_id = orders.place_order(customer.id).await.unwrap();
    assert!(carts.fetch_cart(customer.id).await.unwrap().items.is_empty());
    assert!(matches!(
        orders.place_order(customer.id).await,
        Err(OrderError::EmptyCart)
    ));

    let views = orders.list_by_order_id(&order_id).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].total_price, Decimal::new(49900, 2));
    assert_eq!(views[0].product_name, "Mug");

    let views = orders
        .update_delivery_status(UpdateDeliveryStatusRequest {
            order_id: order_id.clone(),
            delivery_date: Some("12-06-2025".into()),
            delivery_time: Some(DeliveryTime::Morning),
            delivery_status: Some(DeliveryStatus::Processing),
            delivery_id: None,
        })
        .await
        .unwrap();
    assert_eq!(views[0].delivery_status, DeliveryStatus::Processing);
    assert_eq!(views[0].delivery_date, "12-06-2025 Morning");

    let views = orders
        .assign_delivery_person(UpdateDeliveryStatusRequest {
            order_id: order_id.clone(),
            delivery_id: Some(courier.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(views[0].delivery_person_name, "Ravi");

    let queue = orders.list_delivery_orders(courier.id).await.unwrap();
    assert_eq!(queue.len(), 1);

    // orders reference the product, so it cannot be deleted
    assert!(catalog.delete_product(mug.id).await.is_err());
}
