use axum::Router;
use domain_users::{PgUserRepository, UserService, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let service = UserService::new(PgUserRepository::new(state.db.clone()));
    handlers::router(service)
}
