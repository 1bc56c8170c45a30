use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r#"
            INSERT INTO users (first_name, last_name, email_id, phone_no, address, role)
            VALUES
                ('Shop', 'Admin', 'admin@shop.local', '9000000001', 'Head Office', 'admin'),
                ('Asha', 'Customer', 'customer@shop.local', '9000000002', '12 Market Road, Pune 411001', 'customer'),
                ('Ravi', 'Courier', 'delivery@shop.local', '9000000003', 'Depot 4, Pune 411014', 'delivery')
            ON CONFLICT (email_id) DO NOTHING
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            INSERT INTO categories (name)
            VALUES ('Electronics'), ('Clothing'), ('Books'), ('Groceries')
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            "DELETE FROM categories WHERE name IN ('Electronics', 'Clothing', 'Books', 'Groceries')",
        )
        .await?;
        db.execute_unprepared(
            "DELETE FROM users WHERE email_id IN ('admin@shop.local', 'customer@shop.local', 'delivery@shop.local')",
        )
        .await?;

        Ok(())
    }
}
