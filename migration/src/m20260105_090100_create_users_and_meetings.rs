use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("CREATE TYPE dealflow.role AS ENUM ('client', 'seller')")
            .await?;
        db.execute_unprepared("CREATE TYPE dealflow.fcm_platform AS ENUM ('ios', 'android')")
            .await?;
        db.execute_unprepared(
            "CREATE TYPE dealflow.meeting_type AS ENUM ('instant', 'scheduled')",
        )
        .await?;
        db.execute_unprepared(
            "CREATE TYPE dealflow.meeting_status AS ENUM (
                'created',
                'started',
                'ended',
                'cancelled'
            )",
        )
        .await?;

        // Rows are normally provisioned by the auth provider using the same ids as its JWT `sub`.
        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS dealflow.users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                email VARCHAR(255) NOT NULL UNIQUE,
                name VARCHAR(255),
                role dealflow.role NOT NULL DEFAULT 'client',
                fcm_token TEXT,
                fcm_platform dealflow.fcm_platform,
                fcm_updated_at TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS dealflow.meetings (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                zoom_meeting_id VARCHAR(64) NOT NULL,
                host_user_id UUID NOT NULL REFERENCES dealflow.users(id) ON DELETE CASCADE,
                title VARCHAR(300) NOT NULL,
                password VARCHAR(64),
                join_url TEXT,
                start_time TIMESTAMPTZ,
                duration INTEGER NOT NULL CHECK (duration BETWEEN 1 AND 480),
                type dealflow.meeting_type NOT NULL DEFAULT 'instant',
                status dealflow.meeting_status NOT NULL DEFAULT 'created',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
        )
        .await?;

        // Webhook lookups
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS meetings_zoom_meeting_id_idx
                ON dealflow.meetings (zoom_meeting_id)",
        )
        .await?;

        // Host listing, newest first
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS meetings_host_user_id_created_at_idx
                ON dealflow.meetings (host_user_id, created_at DESC)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("DROP TABLE IF EXISTS dealflow.meetings")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS dealflow.users")
            .await?;

        for enum_type in ["meeting_status", "meeting_type", "fcm_platform", "role"] {
            db.execute_unprepared(&format!("DROP TYPE IF EXISTS dealflow.{enum_type}"))
                .await?;
        }

        Ok(())
    }
}
