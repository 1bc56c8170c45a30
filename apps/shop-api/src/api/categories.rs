use axum::Router;
use domain_catalog::{CategoryService, PgCatalogRepository, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let service = CategoryService::new(PgCatalogRepository::new(state.db.clone()));
    handlers::category_router(service)
}
