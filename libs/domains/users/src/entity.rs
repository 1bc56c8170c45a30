use crate::models::UserRole;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

/// Sea-ORM entity for the `users` table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email_id: String,
    pub phone_no: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub role: UserRole,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email_id: model.email_id,
            phone_no: model.phone_no,
            address: model.address,
            role: model.role,
            created_at: model.created_at.into(),
        }
    }
}

impl From<crate::models::CreateUser> for ActiveModel {
    fn from(input: crate::models::CreateUser) -> Self {
        ActiveModel {
            id: NotSet,
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email_id: Set(input.email_id),
            phone_no: Set(input.phone_no),
            address: Set(input.address),
            role: Set(input.role),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
