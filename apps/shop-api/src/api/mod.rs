use axum::Router;

pub mod carts;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;

/// API routes without the `/api` prefix, which `create_router` adds.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest("/product", products::router(state))
        .nest("/category", categories::router(state))
        .nest("/cart", carts::router(state))
        .nest("/order", orders::router(state))
        .nest("/user", users::router(state))
}

/// `/ready`, checking the database.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
