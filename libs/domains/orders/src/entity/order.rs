use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{DeliveryStatus, DeliveryTime};

/// Sea-ORM entity for the `orders` table.
///
/// One row per product of a checkout; rows of the same checkout share
/// `order_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub order_id: String,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub order_date: DateTimeWithTimeZone,
    pub delivery_date: String,
    pub delivery_time: DeliveryTime,
    pub delivery_status: DeliveryStatus,
    pub delivery_person_id: i32,
    pub delivery_assigned: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "domain_catalog::entity::product::Entity",
        from = "Column::ProductId",
        to = "domain_catalog::entity::product::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Product,
    #[sea_orm(
        belongs_to = "domain_users::entity::Entity",
        from = "Column::UserId",
        to = "domain_users::entity::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Customer,
}

impl Related<domain_catalog::entity::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<domain_users::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Order {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            user_id: model.user_id,
            product_id: model.product_id,
            quantity: model.quantity,
            order_date: model.order_date.into(),
            delivery_date: model.delivery_date,
            delivery_time: model.delivery_time,
            delivery_status: model.delivery_status,
            delivery_person_id: model.delivery_person_id,
            delivery_assigned: model.delivery_assigned,
        }
    }
}

impl From<crate::models::NewOrder> for ActiveModel {
    fn from(input: crate::models::NewOrder) -> Self {
        ActiveModel {
            id: NotSet,
            order_id: Set(input.order_id),
            user_id: Set(input.user_id),
            product_id: Set(input.product_id),
            quantity: Set(input.quantity),
            order_date: Set(input.order_date.into()),
            delivery_date: Set(crate::models::PENDING.to_string()),
            delivery_time: Set(DeliveryTime::Default),
            delivery_status: Set(DeliveryStatus::Pending),
            delivery_person_id: Set(0),
            delivery_assigned: Set(false),
        }
    }
}
