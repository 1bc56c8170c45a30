//! Users Domain
//!
//! Shop users: customers who place orders, delivery persons who carry them
//! and administrators. Registration and login are handled elsewhere; this
//! crate provides the data access the order workflow joins against and the
//! delivery-person listing used when assigning orders.
//!
//! ```rust,no_run
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use models::{CreateUser, User, UserListResponse, UserRole};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
