use axum::body::Bytes;
use axum_helpers::messages;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{AddCategoryRequest, Category, NewProduct, Product, ProductAddRequest};
use crate::repository::CatalogRepository;
use crate::storage::ImageStorage;

/// Product workflow: add, lookup, delete and image access
pub struct ProductService<R: CatalogRepository, S: ImageStorage> {
    repository: Arc<R>,
    storage: Arc<S>,
}

impl<R: CatalogRepository, S: ImageStorage> Clone for ProductService<R, S> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<R: CatalogRepository, S: ImageStorage> ProductService<R, S> {
    pub fn new(repository: R, storage: S) -> Self {
        Self::from_shared(Arc::new(repository), Arc::new(storage))
    }

    /// Share a repository with other services
    pub fn from_shared(repository: Arc<R>, storage: Arc<S>) -> Self {
        Self {
            repository,
            storage,
        }
    }

    /// Validate the form, store the image and persist the product.
    ///
    /// Storage and store failures are logged and reported as
    /// [`ProductError::AddFailed`]. A stored image whose product could not
    /// be saved is removed again.
    #[instrument(skip(self, request), fields(title = ?request.title, category_id = ?request.category_id))]
    pub async fn add_product(&self, request: ProductAddRequest) -> ProductResult<Product> {
        if !request.is_complete() {
            return Err(ProductError::MissingField(messages::MISSING_FIELD.to_string()));
        }

        let ProductAddRequest {
            title: Some(title),
            description: Some(description),
            price: Some(price),
            category_id: Some(category_id),
            image: Some(image),
        } = request
        else {
            return Err(ProductError::MissingField(messages::MISSING_FIELD.to_string()));
        };

        if self.repository.find_category(category_id).await?.is_none() {
            return Err(ProductError::InvalidCategory);
        }

        let image_name = self.storage.store(image).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to store product image");
            ProductError::AddFailed
        })?;

        let input = NewProduct {
            title,
            description,
            price,
            image_name: image_name.clone(),
            category_id,
        };

        match self.repository.create_product(input).await {
            Ok(product) => Ok(product),
            Err(e) => {
                tracing::error!(error = %e, "Failed to save product");
                if let Err(cleanup) = self.storage.delete(&image_name).await {
                    tracing::warn!(image = %image_name, error = %cleanup, "Orphaned product image");
                }
                Err(ProductError::AddFailed)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list_products().await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> ProductResult<Product> {
        if id == 0 {
            return Err(ProductError::MissingField("Product ID is missing".to_string()));
        }

        self.repository
            .get_product(id)
            .await?
            .ok_or(ProductError::UnknownProduct(id))
    }

    /// Products of one category; an unknown category is an error, an
    /// empty one is not.
    #[instrument(skip(self))]
    pub async fn list_by_category(&self, category_id: i32) -> ProductResult<Vec<Product>> {
        if category_id == 0 {
            return Err(ProductError::MissingField("Category ID is missing".to_string()));
        }

        if self.repository.find_category(category_id).await?.is_none() {
            return Err(ProductError::CategoryNotFound(category_id));
        }

        self.repository.list_by_category(category_id).await
    }

    /// Delete the product row, then its image.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> ProductResult<()> {
        let product = self
            .repository
            .get_product(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        match self.repository.delete_product(id).await {
            Ok(true) => {}
            Ok(false) => return Err(ProductError::NotFound(id)),
            Err(e) => {
                // typically orders still reference the product
                tracing::error!(product_id = id, error = %e, "Failed to delete product");
                return Err(ProductError::DeleteFailed(id));
            }
        }

        if let Err(e) = self.storage.delete(&product.image_name).await {
            tracing::warn!(image = %product.image_name, error = %e, "Failed to remove product image");
        }

        tracing::info!(product_id = id, "Deleted product");
        Ok(())
    }

    /// Image bytes, or `None` when the image cannot be located
    #[instrument(skip(self))]
    pub async fn fetch_image(&self, name: &str) -> Option<Bytes> {
        match self.storage.load(name).await {
            Ok(Some(bytes)) => Some(bytes),
            Ok(None) => {
                tracing::warn!(image = %name, "Product image not found");
                None
            }
            Err(e) => {
                tracing::warn!(image = %name, error = %e, "Failed to load product image");
                None
            }
        }
    }
}

#[derive(Clone)]
pub struct CategoryService<R: CatalogRepository> {
    repository: Arc<R>,
}

impl<R: CatalogRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_shared(Arc::new(repository))
    }

    pub fn from_shared(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn add_category(&self, request: AddCategoryRequest) -> ProductResult<Category> {
        let name = request.name.trim().to_string();
        if name.is_empty() || request.validate().is_err() {
            return Err(ProductError::MissingField(messages::MISSING_FIELD.to_string()));
        }

        self.repository.create_category(name).await
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> ProductResult<Vec<Category>> {
        self.repository.list_categories().await
    }
}
