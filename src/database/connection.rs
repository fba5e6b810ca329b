//! 数据库连接管理
//!
//! 连接句柄由调用方显式创建、显式关闭，库内不持有任何全局状态。

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, RuntimeErr};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::database::txn::LOCK_WAIT;

/// 数据库文件名
pub const DB_FILE_NAME: &str = "arcadia_store.db";

/// Establish a SeaORM database connection.
pub async fn establish_connection(db_path: &Path) -> Result<DatabaseConnection, DbErr> {
    // 1. 确保数据库所在的目录存在
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| DbErr::Conn(RuntimeErr::Internal(format!("无法创建数据库目录: {}", e))))?;
    }

    // 2. 使用 `url` crate 安全地构建连接字符串
    let db_url = Url::from_file_path(db_path).map_err(|_| {
        DbErr::Conn(RuntimeErr::Internal(format!(
            "Invalid database path: {}",
            db_path.display()
        )))
    })?;

    let connection_string = format!("sqlite:{}?mode=rwc", db_url.path());

    connect(connection_string).await
}

/// 建立内存数据库连接（测试用）
pub async fn establish_in_memory() -> Result<DatabaseConnection, DbErr> {
    connect("sqlite::memory:".to_string()).await
}

async fn connect(connection_string: String) -> Result<DatabaseConnection, DbErr> {
    // 对于本地 SQLite，连接池大小固定为 1；
    // 获取连接的等待时间以 LOCK_WAIT 为上限，超出即报错而不是无限排队
    let mut options = ConnectOptions::new(connection_string);
    options
        .max_connections(1)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(LOCK_WAIT)
        .sqlx_logging(false);

    let conn = Database::connect(options).await?;

    // SQLite 外键约束默认关闭，需要逐连接开启；
    // 级联删除（父行删除清理所有引用行）依赖这一开关
    conn.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

    log::info!("数据库连接建立成功");
    Ok(conn)
}

/// 关闭数据库连接
pub async fn close_connection(conn: DatabaseConnection) -> Result<(), DbErr> {
    conn.close().await?;
    log::info!("数据库连接已关闭");
    Ok(())
}
