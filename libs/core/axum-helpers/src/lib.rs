//! # Axum Helpers
//!
//! Shared HTTP plumbing for the shop services.
//!
//! - **[`errors`]**: `AppError` and the failure envelope with stable error codes
//! - **[`response`]**: the `{success, responseMessage}` envelope used by every endpoint
//! - **[`extractors`]**: `ValidatedJson`
//! - **[`http`]**: CORS and security headers
//! - **[`server`]**: router assembly, health/readiness, graceful shutdown
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let router = create_router::<ApiDoc>(api_routes, &config.server)?
//!     .merge(health_router(app_info!()));
//! create_production_app(router, &config.server, Duration::from_secs(30), cleanup).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod response;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse, messages};
pub use extractors::ValidatedJson;
pub use http::{create_cors_layer, security_headers};
pub use response::CommonApiResponse;
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};
