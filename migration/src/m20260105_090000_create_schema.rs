use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("CREATE SCHEMA IF NOT EXISTS dealflow;")
            .await?;

        db.execute_unprepared("SET search_path TO dealflow, public;")
            .await?;

        // gen_random_uuid() lives in pgcrypto before Postgres 13
        db.execute_unprepared("CREATE EXTENSION IF NOT EXISTS pgcrypto;")
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP SCHEMA IF EXISTS dealflow CASCADE;")
            .await?;

        Ok(())
    }
}
