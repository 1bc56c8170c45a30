use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250601_000000_create_users::Users;
use crate::m20250601_000001_create_catalog::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Carts::Table)
                    .if_not_exists()
                    .col(pk_auto(Carts::Id))
                    .col(integer(Carts::UserId))
                    .col(integer(Carts::ProductId))
                    .col(integer(Carts::Quantity))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_carts_user")
                            .from(Carts::Table, Carts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_carts_product")
                            .from(Carts::Table, Carts::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_carts_user_id")
                    .table(Carts::Table)
                    .col(Carts::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(pk_auto(Orders::Id))
                    .col(string_len(Orders::OrderId, 32))
                    .col(integer(Orders::UserId))
                    .col(integer(Orders::ProductId))
                    .col(integer(Orders::Quantity))
                    .col(
                        timestamp_with_time_zone(Orders::OrderDate)
                            .default(Expr::current_timestamp()),
                    )
                    .col(string(Orders::DeliveryDate).default("Pending"))
                    .col(string_len(Orders::DeliveryTime, 16).default("Default"))
                    .col(string_len(Orders::DeliveryStatus, 16).default("Pending"))
                    // 0 until a delivery person is assigned, so no foreign key
                    .col(integer(Orders::DeliveryPersonId).default(0))
                    .col(boolean(Orders::DeliveryAssigned).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_user")
                            .from(Orders::Table, Orders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_product")
                            .from(Orders::Table, Orders::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_orders_order_id", Orders::OrderId),
            ("idx_orders_user_id", Orders::UserId),
            ("idx_orders_delivery_person_id", Orders::DeliveryPersonId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Orders::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Carts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Carts {
    Table,
    Id,
    UserId,
    ProductId,
    Quantity,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    OrderId,
    UserId,
    ProductId,
    Quantity,
    OrderDate,
    DeliveryDate,
    DeliveryTime,
    DeliveryStatus,
    DeliveryPersonId,
    DeliveryAssigned,
}
