use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{Category, NewProduct, Product};

/// Repository trait for categories and products
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn find_category(&self, id: i32) -> ProductResult<Option<Category>>;

    /// All categories, ordered by id
    async fn list_categories(&self) -> ProductResult<Vec<Category>>;

    /// Category names are unique
    async fn create_category(&self, name: String) -> ProductResult<Category>;

    async fn create_product(&self, input: NewProduct) -> ProductResult<Product>;

    async fn get_product(&self, id: i32) -> ProductResult<Option<Product>>;

    /// All products, ordered by id
    async fn list_products(&self) -> ProductResult<Vec<Product>>;

    async fn list_by_category(&self, category_id: i32) -> ProductResult<Vec<Product>>;

    /// Returns false when nothing was deleted
    async fn delete_product(&self, id: i32) -> ProductResult<bool>;
}

#[derive(Default)]
struct CatalogState {
    categories: HashMap<i32, Category>,
    products: HashMap<i32, Product>,
    next_category_id: i32,
    next_product_id: i32,
}

/// In-memory implementation for tests and local runs
#[derive(Clone, Default)]
pub struct InMemoryCatalogRepository {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn find_category(&self, id: i32) -> ProductResult<Option<Category>> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> ProductResult<Vec<Category>> {
        let state = self.state.read().await;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by_key(|c| c.id);
        Ok(categories)
    }

    async fn create_category(&self, name: String) -> ProductResult<Category> {
        let mut state = self.state.write().await;

        if state.categories.values().any(|c| c.name == name) {
            return Err(ProductError::DuplicateCategory(name));
        }

        state.next_category_id += 1;
        let category = Category {
            id: state.next_category_id,
            name,
        };
        state.categories.insert(category.id, category.clone());

        tracing::info!(category_id = category.id, "Created category");
        Ok(category)
    }

    async fn create_product(&self, input: NewProduct) -> ProductResult<Product> {
        let mut state = self.state.write().await;

        // mirrors the foreign key on products.category_id
        if !state.categories.contains_key(&input.category_id) {
            return Err(ProductError::Database(format!(
                "category {} does not exist",
                input.category_id
            )));
        }

        state.next_product_id += 1;
        let product = Product {
            id: state.next_product_id,
            title: input.title,
            description: input.description,
            price: input.price,
            image_name: input.image_name,
            category_id: input.category_id,
        };
        state.products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn get_product(&self, id: i32) -> ProductResult<Option<Product>> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn list_products(&self) -> ProductResult<Vec<Product>> {
        let state = self.state.read().await;
        let mut products: Vec<Product> = state.products.values().cloned().collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn list_by_category(&self, category_id: i32) -> ProductResult<Vec<Product>> {
        let state = self.state.read().await;
        let mut products: Vec<Product> = state
            .products
            .values()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn delete_product(&self, id: i32) -> ProductResult<bool> {
        Ok(self.state.write().await.products.remove(&id).is_some())
    }
}
