//! Catalog Domain
//!
//! Categories, products and product images. The product workflow validates
//! the add form, checks the category, stores the image and persists the
//! product; deletes remove the row before the image.
//!
//! ```rust,no_run
//! use domain_catalog::{handlers, InMemoryCatalogRepository, InMemoryImageStorage, ProductService};
//!
//! let service = ProductService::new(InMemoryCatalogRepository::new(), InMemoryImageStorage::new());
//! let router = handlers::product_router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod storage;

pub use error::{ProductError, ProductResult};
pub use models::{
    AddCategoryRequest, Category, CategoryResponse, ImageUpload, NewProduct, Product,
    ProductAddRequest, ProductResponse,
};
pub use postgres::PgCatalogRepository;
pub use repository::{CatalogRepository, InMemoryCatalogRepository};
pub use service::{CategoryService, ProductService};
pub use storage::{FsImageStorage, ImageStorage, InMemoryImageStorage, StorageError};
