use axum::{Router, extract::DefaultBodyLimit};
use domain_catalog::{PgCatalogRepository, ProductService, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgCatalogRepository::new(state.db.clone());
    let service = ProductService::new(repository, state.images.clone());

    handlers::product_router(service)
        .layer(DefaultBodyLimit::max(state.config.storage.max_upload_bytes))
}
