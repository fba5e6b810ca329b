//! 厂商数据仓库
//!
//! 厂商本体的 CRUD 以及 game↔dev 关联的增删。

use sea_orm::*;

use crate::database::error::StoreError;
use crate::database::txn::run_atomically;
use crate::database::validate;
use crate::entity::devs::DevType;
use crate::entity::prelude::*;
use crate::entity::{devs, game_dev_link};

/// 厂商数据仓库
pub struct DevsRepository;

impl DevsRepository {
    // ==================== 厂商 CRUD ====================

    /// 创建厂商，名称全局唯一
    pub async fn create(
        db: &DatabaseConnection,
        dev_name: String,
        dev_type: DevType,
    ) -> Result<devs::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                validate::ensure_dev_name_free(txn, &dev_name, None).await?;

                let row = devs::ActiveModel {
                    id: NotSet,
                    dev_name: Set(dev_name),
                    dev_type: Set(dev_type),
                    created_at: Set(Some(chrono::Utc::now().timestamp() as i32)),
                }
                .insert(txn)
                .await?;

                Ok(row)
            })
        })
        .await
    }

    /// 部分更新厂商，改名时排除自身行
    pub async fn update(
        db: &DatabaseConnection,
        dev_id: i32,
        dev_name: Option<String>,
        dev_type: Option<DevType>,
    ) -> Result<devs::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                let existing = Devs::find_by_id(dev_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| StoreError::not_found("dev", dev_id))?;

                if let Some(name) = &dev_name {
                    validate::ensure_dev_name_free(txn, name, Some(dev_id)).await?;
                }

                let mut active: devs::ActiveModel = existing.into();
                if let Some(name) = dev_name {
                    active.dev_name = Set(name);
                }
                if let Some(kind) = dev_type {
                    active.dev_type = Set(kind);
                }

                Ok(active.update(txn).await?)
            })
        })
        .await
    }

    /// 根据 ID 查询厂商
    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<devs::Model>, StoreError> {
        Ok(Devs::find_by_id(id).one(db).await?)
    }

    /// 按名称（自然键）查询厂商
    pub async fn find_by_name(
        db: &DatabaseConnection,
        dev_name: &str,
    ) -> Result<Option<devs::Model>, StoreError> {
        Ok(Devs::find()
            .filter(devs::Column::DevName.eq(dev_name))
            .one(db)
            .await?)
    }

    /// 获取所有厂商，按名称排序
    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<devs::Model>, StoreError> {
        Ok(Devs::find()
            .order_by_asc(devs::Column::DevName)
            .all(db)
            .await?)
    }

    /// 删除厂商，关联行由存储层级联清理
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<u64, StoreError> {
        let result = Devs::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }

    // ==================== game↔dev 关联 ====================

    /// 把厂商挂到游戏上
    pub async fn add_game_to_dev(
        db: &DatabaseConnection,
        game_id: i32,
        dev_id: i32,
    ) -> Result<game_dev_link::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                if Self::link_exists(txn, game_id, dev_id).await? {
                    return Err(StoreError::conflict(
                        "game dev link",
                        format!("game={}, dev={}", game_id, dev_id),
                    ));
                }
                validate::ensure_game_exists(txn, game_id).await?;
                validate::ensure_dev_exists(txn, dev_id).await?;

                let row = game_dev_link::ActiveModel {
                    id: NotSet,
                    game_id: Set(game_id),
                    dev_id: Set(dev_id),
                    created_at: Set(Some(chrono::Utc::now().timestamp() as i32)),
                }
                .insert(txn)
                .await?;

                Ok(row)
            })
        })
        .await
    }

    /// 移除游戏上的厂商，关联不存在时报 NotFound
    pub async fn remove_game_from_dev(
        db: &DatabaseConnection,
        game_id: i32,
        dev_id: i32,
    ) -> Result<(), StoreError> {
        let result = GameDevLink::delete_many()
            .filter(
                game_dev_link::Column::GameId
                    .eq(game_id)
                    .and(game_dev_link::Column::DevId.eq(dev_id)),
            )
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found(
                "game dev link",
                format!("game={}, dev={}", game_id, dev_id),
            ));
        }
        Ok(())
    }

    /// 获取某厂商参与的所有游戏 ID
    pub async fn games_with_dev(
        db: &DatabaseConnection,
        dev_id: i32,
    ) -> Result<Vec<i32>, StoreError> {
        let links = GameDevLink::find()
            .filter(game_dev_link::Column::DevId.eq(dev_id))
            .order_by_asc(game_dev_link::Column::GameId)
            .all(db)
            .await?;

        Ok(links.into_iter().map(|link| link.game_id).collect())
    }

    // ==================== 私有方法 ====================

    /// 检查关联是否已存在
    async fn link_exists<C: ConnectionTrait>(
        conn: &C,
        game_id: i32,
        dev_id: i32,
    ) -> Result<bool, StoreError> {
        let count = GameDevLink::find()
            .filter(
                game_dev_link::Column::GameId
                    .eq(game_id)
                    .and(game_dev_link::Column::DevId.eq(dev_id)),
            )
            .count(conn)
            .await?;
        Ok(count > 0)
    }
}
