//! 事务上下文
//!
//! `run_atomically` 把一个工作单元包进单个本地事务：
//! 单元内所有读写经由同一个事务句柄，观察同一快照；
//! 单元返回 Err 时所有写入被丢弃，错误原样向上传递；
//! 总执行时间超过 `TXN_TIMEOUT` 时事务被丢弃（drop 即回滚），
//! 以 Internal 错误上报，不留下任何部分写入。
//!
//! 连接池获取的等待上限 `LOCK_WAIT` 在 connection.rs 中配置。

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionError, TransactionTrait};

use crate::database::error::StoreError;

/// 获取连接/锁的等待上限
pub const LOCK_WAIT: Duration = Duration::from_secs(5);

/// 单个事务的总执行时间上限
pub const TXN_TIMEOUT: Duration = Duration::from_secs(10);

/// 在单个事务内执行工作单元，整体提交或整体回滚
///
/// 每次调用都会开启一个全新事务，调用之间不共享任何状态。
pub async fn run_atomically<T, F>(db: &DatabaseConnection, unit: F) -> Result<T, StoreError>
where
    T: Send,
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'c>>
        + Send,
{
    match tokio::time::timeout(TXN_TIMEOUT, db.transaction(unit)).await {
        Ok(Ok(value)) => Ok(value),
        // 工作单元自身的错误原样传出，不做二次包装
        Ok(Err(TransactionError::Transaction(err))) => Err(err),
        Ok(Err(TransactionError::Connection(err))) => Err(StoreError::from(err)),
        // 超时：事务 future 被丢弃，未提交的写入随之回滚
        Err(_elapsed) => Err(StoreError::internal(format!(
            "transaction aborted after exceeding {}s limit",
            TXN_TIMEOUT.as_secs()
        ))),
    }
}
