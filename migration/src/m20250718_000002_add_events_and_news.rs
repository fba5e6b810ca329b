//! 添加运营活动与游戏资讯表
//!
//! 此迁移添加两张表：
//! 1. events — 限时活动（打折 / 赠送 / 免费周末），要求 end_date 严格晚于 start_date
//! 2. game_news — 游戏资讯，按 published_at 倒序展示

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend, Statement, TransactionTrait};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        let txn = conn.begin().await?;

        // 1. 活动表，日期序由仓库层在写入前校验
        txn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            r#"CREATE TABLE "events" (
                "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                "game_id" INTEGER NOT NULL,
                "event_type" TEXT NOT NULL,
                "start_date" INTEGER NOT NULL,
                "end_date" INTEGER NOT NULL,
                "created_at" INTEGER DEFAULT (strftime('%s', 'now')),
                FOREIGN KEY("game_id") REFERENCES "games"("id") ON DELETE CASCADE
            )"#,
        ))
        .await?;

        // 2. 资讯表
        txn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            r#"CREATE TABLE "game_news" (
                "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                "game_id" INTEGER NOT NULL,
                "title" TEXT NOT NULL,
                "content" TEXT NOT NULL,
                "published_at" INTEGER NOT NULL,
                FOREIGN KEY("game_id") REFERENCES "games"("id") ON DELETE CASCADE
            )"#,
        ))
        .await?;

        // 3. 索引
        let indexes = [
            ("idx_events_game_id", "events", "game_id"),
            ("idx_events_start_date", "events", "start_date"),
            ("idx_events_end_date", "events", "end_date"),
            ("idx_game_news_game_id", "game_news", "game_id"),
            ("idx_game_news_published_at", "game_news", "published_at"),
        ];

        for (index_name, table_name, column_name) in &indexes {
            txn.execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                format!(
                    r#"CREATE INDEX IF NOT EXISTS "{}" ON "{}" ("{}")"#,
                    index_name, table_name, column_name
                ),
            ))
            .await?;
        }

        txn.commit().await?;

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        Err(DbErr::Custom(
            "此迁移无法回滚，请从备份恢复数据库".to_string(),
        ))
    }
}
