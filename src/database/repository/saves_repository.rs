//! 云存档仓库
//!
//! 每个 (user, game) 至多一份存档；存档数据每次变更都刷新 last_updated。

use sea_orm::*;

use crate::database::error::StoreError;
use crate::database::txn::run_atomically;
use crate::database::validate;
use crate::entity::prelude::*;
use crate::entity::saves;

/// 云存档仓库
pub struct SavesRepository;

impl SavesRepository {
    /// 创建存档
    pub async fn create(
        db: &DatabaseConnection,
        user_id: i32,
        game_id: i32,
        data: Vec<u8>,
    ) -> Result<saves::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                if Self::save_exists(txn, user_id, game_id).await? {
                    return Err(StoreError::conflict(
                        "save",
                        format!("user={}, game={}", user_id, game_id),
                    ));
                }
                validate::ensure_user_exists(txn, user_id).await?;
                validate::ensure_game_exists(txn, game_id).await?;

                let row = saves::ActiveModel {
                    id: NotSet,
                    user_id: Set(user_id),
                    game_id: Set(game_id),
                    data: Set(data),
                    last_updated: Set(chrono::Utc::now().timestamp() as i32),
                }
                .insert(txn)
                .await?;

                Ok(row)
            })
        })
        .await
    }

    /// 覆写存档数据并刷新 last_updated
    pub async fn update_data(
        db: &DatabaseConnection,
        user_id: i32,
        game_id: i32,
        data: Vec<u8>,
    ) -> Result<saves::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                let existing = Self::find_pair(txn, user_id, game_id)
                    .await?
                    .ok_or_else(|| {
                        StoreError::not_found(
                            "save",
                            format!("user={}, game={}", user_id, game_id),
                        )
                    })?;

                let mut active: saves::ActiveModel = existing.into();
                active.data = Set(data);
                active.last_updated = Set(chrono::Utc::now().timestamp() as i32);

                Ok(active.update(txn).await?)
            })
        })
        .await
    }

    /// 读取某用户对某游戏的存档
    pub async fn find_entry(
        db: &DatabaseConnection,
        user_id: i32,
        game_id: i32,
    ) -> Result<Option<saves::Model>, StoreError> {
        Self::find_pair(db, user_id, game_id).await
    }

    /// 获取某用户的全部存档
    pub async fn find_for_user(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<saves::Model>, StoreError> {
        Ok(Saves::find()
            .filter(saves::Column::UserId.eq(user_id))
            .order_by_asc(saves::Column::Id)
            .all(db)
            .await?)
    }

    /// 删除存档
    pub async fn delete(
        db: &DatabaseConnection,
        user_id: i32,
        game_id: i32,
    ) -> Result<u64, StoreError> {
        let result = Saves::delete_many()
            .filter(
                saves::Column::UserId
                    .eq(user_id)
                    .and(saves::Column::GameId.eq(game_id)),
            )
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    // ==================== 私有方法 ====================

    async fn find_pair<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        game_id: i32,
    ) -> Result<Option<saves::Model>, StoreError> {
        Ok(Saves::find()
            .filter(
                saves::Column::UserId
                    .eq(user_id)
                    .and(saves::Column::GameId.eq(game_id)),
            )
            .one(conn)
            .await?)
    }

    async fn save_exists<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        game_id: i32,
    ) -> Result<bool, StoreError> {
        Ok(Self::find_pair(conn, user_id, game_id).await?.is_some())
    }
}
