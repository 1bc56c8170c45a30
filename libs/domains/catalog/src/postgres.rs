use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    SqlErr,
};

use crate::{
    entity::{category, product},
    error::{ProductError, ProductResult},
    models::{Category, NewProduct, Product},
    repository::CatalogRepository,
};

pub struct PgCatalogRepository {
    db: DatabaseConnection,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn find_category(&self, id: i32) -> ProductResult<Option<Category>> {
        let model = category::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list_categories(&self) -> ProductResult<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn create_category(&self, name: String) -> ProductResult<Category> {
        let model = category::ActiveModel::named(name.clone())
            .insert(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => ProductError::DuplicateCategory(name),
                _ => ProductError::from(e),
            })?;

        tracing::info!(category_id = model.id, "Created category");
        Ok(model.into())
    }

    async fn create_product(&self, input: NewProduct) -> ProductResult<Product> {
        let active_model: product::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(product_id = model.id, category_id = model.category_id, "Created product");
        Ok(model.into())
    }

    async fn get_product(&self, id: i32) -> ProductResult<Option<Product>> {
        let model = product::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list_products(&self) -> ProductResult<Vec<Product>> {
        let models = product::Entity::find()
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_by_category(&self, category_id: i32) -> ProductResult<Vec<Product>> {
        let models = product::Entity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn delete_product(&self, id: i32) -> ProductResult<bool> {
        let result = product::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
