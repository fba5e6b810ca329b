//! 成就定义仓库

use sea_orm::*;

use crate::database::dto::UpdateAchievementData;
use crate::database::error::StoreError;
use crate::database::txn::run_atomically;
use crate::database::validate;
use crate::entity::achievements;
use crate::entity::prelude::*;

/// 成就定义仓库
pub struct AchievementsRepository;

impl AchievementsRepository {
    /// 创建成就，所属游戏必须存在
    pub async fn create(
        db: &DatabaseConnection,
        game_id: i32,
        title: String,
        icon: Option<String>,
    ) -> Result<achievements::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                validate::ensure_game_exists(txn, game_id).await?;

                let row = achievements::ActiveModel {
                    id: NotSet,
                    game_id: Set(game_id),
                    title: Set(title),
                    icon: Set(icon),
                    created_at: Set(Some(chrono::Utc::now().timestamp() as i32)),
                }
                .insert(txn)
                .await?;

                Ok(row)
            })
        })
        .await
    }

    /// 部分更新成就；只有触碰到 game_id 时才重新校验目标游戏存在
    pub async fn update(
        db: &DatabaseConnection,
        achievement_id: i32,
        updates: UpdateAchievementData,
    ) -> Result<achievements::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                let existing = Achievements::find_by_id(achievement_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| StoreError::not_found("achievement", achievement_id))?;

                if let Some(game_id) = updates.game_id {
                    validate::ensure_game_exists(txn, game_id).await?;
                }

                let mut active: achievements::ActiveModel = existing.into();
                if let Some(game_id) = updates.game_id {
                    active.game_id = Set(game_id);
                }
                if let Some(title) = updates.title {
                    active.title = Set(title);
                }
                if let Some(icon) = updates.icon {
                    active.icon = Set(icon);
                }

                Ok(active.update(txn).await?)
            })
        })
        .await
    }

    /// 根据 ID 查询成就
    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<achievements::Model>, StoreError> {
        Ok(Achievements::find_by_id(id).one(db).await?)
    }

    /// 获取某游戏的所有成就
    pub async fn find_for_game(
        db: &DatabaseConnection,
        game_id: i32,
    ) -> Result<Vec<achievements::Model>, StoreError> {
        Ok(Achievements::find()
            .filter(achievements::Column::GameId.eq(game_id))
            .order_by_asc(achievements::Column::Id)
            .all(db)
            .await?)
    }

    /// 删除成就，解锁记录由存储层级联清理
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<u64, StoreError> {
        let result = Achievements::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }
}
