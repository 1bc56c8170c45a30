use axum::Router;
use domain_orders::{CartService, PgOrderRepository, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let service = CartService::new(PgOrderRepository::new(state.db.clone()));
    handlers::cart_router(service)
}
