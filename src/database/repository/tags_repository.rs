//! 标签数据仓库
//!
//! 标签本体的 CRUD 以及 game↔tag 关联的增删。

use sea_orm::*;

use crate::database::error::StoreError;
use crate::database::txn::run_atomically;
use crate::database::validate;
use crate::entity::prelude::*;
use crate::entity::{game_tag_link, tags};

/// 标签数据仓库
pub struct TagsRepository;

impl TagsRepository {
    // ==================== 标签 CRUD ====================

    /// 创建标签，名称全局唯一
    pub async fn create(
        db: &DatabaseConnection,
        tag_name: String,
    ) -> Result<tags::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                validate::ensure_tag_name_free(txn, &tag_name, None).await?;

                let row = tags::ActiveModel {
                    id: NotSet,
                    tag_name: Set(tag_name),
                    created_at: Set(Some(chrono::Utc::now().timestamp() as i32)),
                }
                .insert(txn)
                .await?;

                Ok(row)
            })
        })
        .await
    }

    /// 标签改名，排除自身行，改回当前名称不会误报冲突
    pub async fn rename(
        db: &DatabaseConnection,
        tag_id: i32,
        tag_name: String,
    ) -> Result<tags::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                let existing = Tags::find_by_id(tag_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| StoreError::not_found("tag", tag_id))?;

                validate::ensure_tag_name_free(txn, &tag_name, Some(tag_id)).await?;

                let mut active: tags::ActiveModel = existing.into();
                active.tag_name = Set(tag_name);

                Ok(active.update(txn).await?)
            })
        })
        .await
    }

    /// 根据 ID 查询标签
    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<tags::Model>, StoreError> {
        Ok(Tags::find_by_id(id).one(db).await?)
    }

    /// 按名称（自然键）查询标签
    pub async fn find_by_name(
        db: &DatabaseConnection,
        tag_name: &str,
    ) -> Result<Option<tags::Model>, StoreError> {
        Ok(Tags::find()
            .filter(tags::Column::TagName.eq(tag_name))
            .one(db)
            .await?)
    }

    /// 获取所有标签，按名称排序
    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<tags::Model>, StoreError> {
        Ok(Tags::find()
            .order_by_asc(tags::Column::TagName)
            .all(db)
            .await?)
    }

    /// 删除标签，关联行由存储层级联清理
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<u64, StoreError> {
        let result = Tags::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }

    // ==================== game↔tag 关联 ====================

    /// 给游戏打标签
    pub async fn add_game_to_tag(
        db: &DatabaseConnection,
        game_id: i32,
        tag_id: i32,
    ) -> Result<game_tag_link::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                if Self::link_exists(txn, game_id, tag_id).await? {
                    return Err(StoreError::conflict(
                        "game tag link",
                        format!("game={}, tag={}", game_id, tag_id),
                    ));
                }
                validate::ensure_game_exists(txn, game_id).await?;
                validate::ensure_tag_exists(txn, tag_id).await?;

                let row = game_tag_link::ActiveModel {
                    id: NotSet,
                    game_id: Set(game_id),
                    tag_id: Set(tag_id),
                    created_at: Set(Some(chrono::Utc::now().timestamp() as i32)),
                }
                .insert(txn)
                .await?;

                Ok(row)
            })
        })
        .await
    }

    /// 移除游戏上的标签，关联不存在时报 NotFound
    pub async fn remove_game_from_tag(
        db: &DatabaseConnection,
        game_id: i32,
        tag_id: i32,
    ) -> Result<(), StoreError> {
        let result = GameTagLink::delete_many()
            .filter(
                game_tag_link::Column::GameId
                    .eq(game_id)
                    .and(game_tag_link::Column::TagId.eq(tag_id)),
            )
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found(
                "game tag link",
                format!("game={}, tag={}", game_id, tag_id),
            ));
        }
        Ok(())
    }

    /// 获取拥有某标签的所有游戏 ID
    pub async fn games_with_tag(
        db: &DatabaseConnection,
        tag_id: i32,
    ) -> Result<Vec<i32>, StoreError> {
        let links = GameTagLink::find()
            .filter(game_tag_link::Column::TagId.eq(tag_id))
            .order_by_asc(game_tag_link::Column::GameId)
            .all(db)
            .await?;

        Ok(links.into_iter().map(|link| link.game_id).collect())
    }

    // ==================== 私有方法 ====================

    /// 检查关联是否已存在
    async fn link_exists<C: ConnectionTrait>(
        conn: &C,
        game_id: i32,
        tag_id: i32,
    ) -> Result<bool, StoreError> {
        let count = GameTagLink::find()
            .filter(
                game_tag_link::Column::GameId
                    .eq(game_id)
                    .and(game_tag_link::Column::TagId.eq(tag_id)),
            )
            .count(conn)
            .await?;
        Ok(count > 0)
    }
}
