//! Shared application state.
//!
//! Routers are built from it once at startup; handlers receive their
//! domain service, not this struct.

use domain_catalog::FsImageStorage;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Product images on disk
    pub images: FsImageStorage,
}
