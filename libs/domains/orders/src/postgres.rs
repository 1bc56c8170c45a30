use async_trait::async_trait;
use domain_catalog::entity::product;
use domain_users::entity as user;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    TransactionTrait,
};

use crate::{
    entity::{cart, order},
    error::OrderResult,
    models::{
        AddToCartRequest, CartLine, CartLineDetail, DeliveryContact, DeliveryUpdate, NewOrder,
        Order, OrderDetail, OrderScope,
    },
    repository::{CartRepository, OrderRepository, OrderUnitOfWork},
};

/// Orders and carts in Postgres; one repository serves both traits
#[derive(Clone)]
pub struct PgOrderRepository {
    db: DatabaseConnection,
}

impl PgOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// A unit of work backed by a database transaction
pub struct PgOrderUnitOfWork {
    txn: DatabaseTransaction,
}

#[async_trait]
impl OrderUnitOfWork for PgOrderUnitOfWork {
    async fn cart_lines(&mut self, user_id: i32) -> OrderResult<Vec<CartLine>> {
        let models = cart::Entity::find()
            .filter(cart::Column::UserId.eq(user_id))
            .order_by_asc(cart::Column::Id)
            .all(&self.txn)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn save_order(&mut self, input: NewOrder) -> OrderResult<Option<Order>> {
        let active_model: order::ActiveModel = input.into();
        let model = active_model.insert(&self.txn).await?;
        Ok(Some(model.into()))
    }

    async fn delete_cart_line(&mut self, cart_id: i32) -> OrderResult<u64> {
        let result = cart::Entity::delete_by_id(cart_id).exec(&self.txn).await?;
        Ok(result.rows_affected)
    }

    async fn update_delivery_status(
        &mut self,
        order_id: &str,
        update: &DeliveryUpdate,
    ) -> OrderResult<u64> {
        let result = order::Entity::update_many()
            .set(order::ActiveModel {
                delivery_date: Set(update.delivery_date.clone()),
                delivery_time: Set(update.delivery_time),
                delivery_status: Set(update.delivery_status),
                ..Default::default()
            })
            .filter(order::Column::OrderId.eq(order_id))
            .exec(&self.txn)
            .await?;
        Ok(result.rows_affected)
    }

    async fn assign_delivery_person(
        &mut self,
        order_id: &str,
        delivery_person_id: i32,
    ) -> OrderResult<u64> {
        let result = order::Entity::update_many()
            .set(order::ActiveModel {
                delivery_person_id: Set(delivery_person_id),
                delivery_assigned: Set(true),
                ..Default::default()
            })
            .filter(order::Column::OrderId.eq(order_id))
            .exec(&self.txn)
            .await?;
        Ok(result.rows_affected)
    }

    async fn commit(self: Box<Self>) -> OrderResult<()> {
        self.txn.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> OrderResult<()> {
        self.txn.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn begin(&self) -> OrderResult<Box<dyn OrderUnitOfWork>> {
        let txn = self.db.begin().await?;
        Ok(Box::new(PgOrderUnitOfWork { txn }))
    }

    async fn list_details(&self, scope: OrderScope) -> OrderResult<Vec<OrderDetail>> {
        let query = order::Entity::find()
            .select_only()
            .columns([
                order::Column::OrderId,
                order::Column::UserId,
                order::Column::ProductId,
                order::Column::Quantity,
                order::Column::OrderDate,
                order::Column::DeliveryDate,
                order::Column::DeliveryTime,
                order::Column::DeliveryStatus,
                order::Column::DeliveryPersonId,
            ])
            .column_as(product::Column::Title, "product_title")
            .column_as(product::Column::Description, "product_description")
            .column_as(product::Column::ImageName, "product_image")
            .column_as(product::Column::Price, "product_price")
            .column_as(user::Column::FirstName, "user_first_name")
            .column_as(user::Column::LastName, "user_last_name")
            .column_as(user::Column::PhoneNo, "user_phone")
            .column_as(user::Column::Address, "user_address")
            .join(JoinType::InnerJoin, order::Relation::Product.def())
            .join(JoinType::InnerJoin, order::Relation::Customer.def());

        let query = match scope {
            OrderScope::All => query,
            OrderScope::Customer(user_id) => query.filter(order::Column::UserId.eq(user_id)),
            OrderScope::OrderId(order_id) => query.filter(order::Column::OrderId.eq(order_id)),
            OrderScope::DeliveryPerson(id) => {
                query.filter(order::Column::DeliveryPersonId.eq(id))
            }
        };

        let details = query
            .order_by_asc(order::Column::Id)
            .into_model::<OrderDetail>()
            .all(&self.db)
            .await?;

        Ok(details)
    }

    async fn find_delivery_person(&self, id: i32) -> OrderResult<Option<DeliveryContact>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(|u| DeliveryContact {
            name: u.first_name,
            contact: u.phone_no,
        }))
    }
}

#[async_trait]
impl CartRepository for PgOrderRepository {
    async fn add(&self, input: AddToCartRequest) -> OrderResult<CartLine> {
        let active_model: cart::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(cart_id = model.id, user_id = model.user_id, "Added cart line");
        Ok(model.into())
    }

    async fn list_for_user(&self, user_id: i32) -> OrderResult<Vec<CartLineDetail>> {
        let lines = cart::Entity::find()
            .select_only()
            .columns([
                cart::Column::Id,
                cart::Column::ProductId,
                cart::Column::Quantity,
            ])
            .column_as(product::Column::Title, "product_title")
            .column_as(product::Column::ImageName, "product_image")
            .column_as(product::Column::Price, "product_price")
            .join(JoinType::InnerJoin, cart::Relation::Product.def())
            .filter(cart::Column::UserId.eq(user_id))
            .order_by_asc(cart::Column::Id)
            .into_model::<CartLineDetail>()
            .all(&self.db)
            .await?;

        Ok(lines)
    }

    async fn delete(&self, id: i32) -> OrderResult<bool> {
        let result = cart::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn product_exists(&self, product_id: i32) -> OrderResult<bool> {
        let count = product::Entity::find_by_id(product_id)
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}
