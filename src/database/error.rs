//! 存储层错误分类
//!
//! 校验器与事务上下文只会抛出四类错误，一经抛出不再改写：
//! - NotFound   引用的行不存在
//! - Conflict   候选键（自然键或复合键）已被占用
//! - BadRequest 业务规则校验失败（日期序、自引用等）
//! - Internal   基础设施失败（超时、锁等待、底层异常），总是伴随完整回滚
//!
//! 对外的错误信息只描述实体种类与出错的值，不暴露底层存储消息。

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: String },

    #[error("{entity} already taken: {key}")]
    Conflict { entity: String, key: String },

    #[error("{0}")]
    BadRequest(String),

    #[error("storage failure: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn not_found(entity: &str, key: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            key: key.to_string(),
        }
    }

    pub fn conflict(entity: &str, key: impl std::fmt::Display) -> Self {
        Self::Conflict {
            entity: entity.to_string(),
            key: key.to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        // 并发写入下，预检查可能同时通过；存储层唯一约束才是冲突判定的
        // 最终依据，这里统一翻译为 Conflict
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::Conflict {
                entity: "unique key".to_string(),
                key: detail,
            },
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => Self::NotFound {
                entity: "referenced row".to_string(),
                key: detail,
            },
            _ => match err {
                DbErr::RecordNotFound(detail) => Self::NotFound {
                    entity: "record".to_string(),
                    key: detail,
                },
                other => Self::Internal(other.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_not_found_maps_to_not_found() {
        let err = StoreError::from(DbErr::RecordNotFound("games".to_string()));
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn unknown_db_err_maps_to_internal() {
        let err = StoreError::from(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, StoreError::Internal(_)));
    }

    #[test]
    fn messages_name_entity_and_key() {
        let err = StoreError::not_found("game", 999);
        assert_eq!(err.to_string(), "game not found: 999");

        let err = StoreError::conflict("game title", "Aurora");
        assert_eq!(err.to_string(), "game title already taken: Aurora");
    }
}
