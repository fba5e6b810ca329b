//! 基线表结构
//!
//! 创建商店后端的核心表：目录（games / tags / devs / achievements）、
//! 用户（users / friendships）、玩家数据（library_entries / reviews / saves）
//! 以及多对多关联表。
//!
//! 所有外键均声明 ON DELETE CASCADE，父行删除时由存储层级联清理；
//! 所有"成对"表都带复合唯一约束，与仓库层的预检查一一对应。

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend, Statement, TransactionTrait};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // 开启事务，保证所有建表操作的原子性
        let txn = conn.begin().await?;

        create_catalog_tables(&txn).await?;
        create_user_tables(&txn).await?;
        create_player_tables(&txn).await?;
        create_link_tables(&txn).await?;
        create_indexes(&txn).await?;

        txn.commit().await?;

        Ok(())
    }
}

/// 创建目录相关表（games / tags / devs / achievements）
async fn create_catalog_tables<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    // 1. 核心 games 表，title 全局唯一，base_game_id 自引用（DLC / 资料片）
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE "games" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "title" TEXT NOT NULL UNIQUE,
            "description" TEXT,
            "price" REAL NOT NULL DEFAULT 0,
            "release_date" TEXT,
            "base_game_id" INTEGER,
            "created_at" INTEGER DEFAULT (strftime('%s', 'now')),
            "updated_at" INTEGER DEFAULT (strftime('%s', 'now')),
            FOREIGN KEY("base_game_id") REFERENCES "games"("id") ON DELETE CASCADE
        )"#,
    ))
    .await?;

    // 2. 标签表
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE "tags" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "tag_name" TEXT NOT NULL UNIQUE,
            "created_at" INTEGER DEFAULT (strftime('%s', 'now'))
        )"#,
    ))
    .await?;

    // 3. 厂商表，dev_type 取值 developer / publisher / both
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE "devs" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "dev_name" TEXT NOT NULL UNIQUE,
            "dev_type" TEXT NOT NULL,
            "created_at" INTEGER DEFAULT (strftime('%s', 'now'))
        )"#,
    ))
    .await?;

    // 4. 成就定义表，隶属于某个游戏
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE "achievements" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "game_id" INTEGER NOT NULL,
            "title" TEXT NOT NULL,
            "icon" TEXT,
            "created_at" INTEGER DEFAULT (strftime('%s', 'now')),
            FOREIGN KEY("game_id") REFERENCES "games"("id") ON DELETE CASCADE
        )"#,
    ))
    .await?;

    Ok(())
}

/// 创建用户相关表（users / friendships）
async fn create_user_tables<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    // 用户表，username 与 email 各自全局唯一；密码已在上游完成哈希
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE "users" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "username" TEXT NOT NULL UNIQUE,
            "email" TEXT NOT NULL UNIQUE,
            "password_hash" TEXT NOT NULL,
            "age" INTEGER,
            "region" TEXT,
            "created_at" INTEGER DEFAULT (strftime('%s', 'now')),
            "updated_at" INTEGER DEFAULT (strftime('%s', 'now'))
        )"#,
    ))
    .await?;

    // 好友关系表，有向：(A, B) 与 (B, A) 是两行
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE "friendships" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "user_id" INTEGER NOT NULL,
            "friend_id" INTEGER NOT NULL,
            "status" TEXT NOT NULL DEFAULT 'pending',
            "created_at" INTEGER DEFAULT (strftime('%s', 'now')),
            UNIQUE("user_id", "friend_id"),
            FOREIGN KEY("user_id") REFERENCES "users"("id") ON DELETE CASCADE,
            FOREIGN KEY("friend_id") REFERENCES "users"("id") ON DELETE CASCADE
        )"#,
    ))
    .await?;

    Ok(())
}

/// 创建玩家数据表（library_entries / reviews / saves）
async fn create_player_tables<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    // 游戏库表，每个 (user, game) 至多一条
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE "library_entries" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "user_id" INTEGER NOT NULL,
            "game_id" INTEGER NOT NULL,
            "hours_played" REAL NOT NULL DEFAULT 0,
            "ownership" TEXT NOT NULL,
            "download_status" TEXT NOT NULL DEFAULT 'none',
            "added_at" INTEGER DEFAULT (strftime('%s', 'now')),
            UNIQUE("user_id", "game_id"),
            FOREIGN KEY("user_id") REFERENCES "users"("id") ON DELETE CASCADE,
            FOREIGN KEY("game_id") REFERENCES "games"("id") ON DELETE CASCADE
        )"#,
    ))
    .await?;

    // 评测表，每个 (user, game) 至多一条
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE "reviews" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "user_id" INTEGER NOT NULL,
            "game_id" INTEGER NOT NULL,
            "rating" INTEGER NOT NULL,
            "body" TEXT,
            "created_at" INTEGER DEFAULT (strftime('%s', 'now')),
            "updated_at" INTEGER DEFAULT (strftime('%s', 'now')),
            UNIQUE("user_id", "game_id"),
            FOREIGN KEY("user_id") REFERENCES "users"("id") ON DELETE CASCADE,
            FOREIGN KEY("game_id") REFERENCES "games"("id") ON DELETE CASCADE
        )"#,
    ))
    .await?;

    // 云存档表，每个 (user, game) 至多一条，数据变更时刷新 last_updated
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE "saves" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "user_id" INTEGER NOT NULL,
            "game_id" INTEGER NOT NULL,
            "data" BLOB NOT NULL,
            "last_updated" INTEGER NOT NULL,
            UNIQUE("user_id", "game_id"),
            FOREIGN KEY("user_id") REFERENCES "users"("id") ON DELETE CASCADE,
            FOREIGN KEY("game_id") REFERENCES "games"("id") ON DELETE CASCADE
        )"#,
    ))
    .await?;

    Ok(())
}

/// 创建多对多关联表（game↔tag / game↔dev / user↔achievement）
async fn create_link_tables<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE "game_tag_link" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "game_id" INTEGER NOT NULL,
            "tag_id" INTEGER NOT NULL,
            "created_at" INTEGER DEFAULT (strftime('%s', 'now')),
            UNIQUE("game_id", "tag_id"),
            FOREIGN KEY("game_id") REFERENCES "games"("id") ON DELETE CASCADE,
            FOREIGN KEY("tag_id") REFERENCES "tags"("id") ON DELETE CASCADE
        )"#,
    ))
    .await?;

    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE "game_dev_link" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "game_id" INTEGER NOT NULL,
            "dev_id" INTEGER NOT NULL,
            "created_at" INTEGER DEFAULT (strftime('%s', 'now')),
            UNIQUE("game_id", "dev_id"),
            FOREIGN KEY("game_id") REFERENCES "games"("id") ON DELETE CASCADE,
            FOREIGN KEY("dev_id") REFERENCES "devs"("id") ON DELETE CASCADE
        )"#,
    ))
    .await?;

    conn.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"CREATE TABLE "user_achievement_link" (
            "id" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
            "user_id" INTEGER NOT NULL,
            "achievement_id" INTEGER NOT NULL,
            "unlocked_at" INTEGER DEFAULT (strftime('%s', 'now')),
            UNIQUE("user_id", "achievement_id"),
            FOREIGN KEY("user_id") REFERENCES "users"("id") ON DELETE CASCADE,
            FOREIGN KEY("achievement_id") REFERENCES "achievements"("id") ON DELETE CASCADE
        )"#,
    ))
    .await?;

    Ok(())
}

/// 创建基线索引
async fn create_indexes<C>(conn: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let indexes = [
        // games 表索引
        ("idx_games_base_game_id", "games", "base_game_id"),
        // 目录关联索引
        ("idx_achievements_game_id", "achievements", "game_id"),
        ("idx_game_tag_link_tag_id", "game_tag_link", "tag_id"),
        ("idx_game_dev_link_dev_id", "game_dev_link", "dev_id"),
        (
            "idx_user_achievement_link_achievement_id",
            "user_achievement_link",
            "achievement_id",
        ),
        // 玩家数据索引
        ("idx_library_entries_game_id", "library_entries", "game_id"),
        ("idx_reviews_game_id", "reviews", "game_id"),
        ("idx_saves_game_id", "saves", "game_id"),
        ("idx_friendships_friend_id", "friendships", "friend_id"),
    ];

    for (index_name, table_name, column_name) in &indexes {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!(
                r#"CREATE INDEX IF NOT EXISTS "{}" ON "{}" ("{}")"#,
                index_name, table_name, column_name
            ),
        ))
        .await?;
    }

    Ok(())
}
