//! Orders Domain
//!
//! Carts and orders. Placing an order converts every line of a user's cart
//! into an order row under one generated order id and empties the cart,
//! inside a single [`OrderUnitOfWork`]. Delivery status updates and
//! delivery-person assignment touch every row of an order the same way.
//! Listings join order rows with their product and customer.
//!
//! ```rust,no_run
//! use domain_orders::{handlers, InMemoryOrderStore, OrderService};
//!
//! let service = OrderService::new(InMemoryOrderStore::new());
//! let router = handlers::order_router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use models::{
    AddToCartRequest, CartItem, CartLine, CartResponse, DeliveryContact, DeliveryStatus,
    DeliveryTime, DeliveryUpdate, NewOrder, Order, OrderDetail, OrderListResponse, OrderScope,
    OrderView, UpdateDeliveryStatusRequest,
};
pub use postgres::{PgOrderRepository, PgOrderUnitOfWork};
pub use repository::{
    CartRepository, InMemoryOrderStore, InMemoryUnitOfWork, OrderRepository, OrderUnitOfWork,
};
pub use service::{CartService, CartView, OrderService, generate_order_id};
