//! 游戏库仓库
//!
//! (user, game) 对全局唯一。创建时先查对唯一（更便宜、也更常见的
//! 失败），再查两侧存在；部分更新只改被触碰的字段。

use sea_orm::*;

use crate::database::dto::UpdateLibraryData;
use crate::database::error::StoreError;
use crate::database::txn::run_atomically;
use crate::database::validate;
use crate::entity::library_entries::{self, DownloadStatus, Ownership};
use crate::entity::prelude::*;

/// 游戏库仓库
pub struct LibraryRepository;

impl LibraryRepository {
    /// 为用户添加游戏库条目
    pub async fn create(
        db: &DatabaseConnection,
        user_id: i32,
        game_id: i32,
        ownership: Ownership,
    ) -> Result<library_entries::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                if Self::entry_exists(txn, user_id, game_id).await? {
                    return Err(StoreError::conflict(
                        "library entry",
                        format!("user={}, game={}", user_id, game_id),
                    ));
                }
                validate::ensure_user_exists(txn, user_id).await?;
                validate::ensure_game_exists(txn, game_id).await?;

                let row = library_entries::ActiveModel {
                    id: NotSet,
                    user_id: Set(user_id),
                    game_id: Set(game_id),
                    hours_played: Set(0.0),
                    ownership: Set(ownership),
                    download_status: Set(DownloadStatus::None),
                    added_at: Set(Some(chrono::Utc::now().timestamp() as i32)),
                }
                .insert(txn)
                .await?;

                Ok(row)
            })
        })
        .await
    }

    /// 部分更新游戏库条目
    ///
    /// 只更新游玩时长不会重新校验用户/游戏存在 —— 未触碰的字段不校验。
    pub async fn update(
        db: &DatabaseConnection,
        user_id: i32,
        game_id: i32,
        updates: UpdateLibraryData,
    ) -> Result<library_entries::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                let existing = Self::find_pair(txn, user_id, game_id)
                    .await?
                    .ok_or_else(|| {
                        StoreError::not_found(
                            "library entry",
                            format!("user={}, game={}", user_id, game_id),
                        )
                    })?;

                let mut active: library_entries::ActiveModel = existing.into();
                if let Some(hours_played) = updates.hours_played {
                    active.hours_played = Set(hours_played);
                }
                if let Some(ownership) = updates.ownership {
                    active.ownership = Set(ownership);
                }
                if let Some(download_status) = updates.download_status {
                    active.download_status = Set(download_status);
                }

                Ok(active.update(txn).await?)
            })
        })
        .await
    }

    /// 查询某用户的某个条目
    pub async fn find_entry(
        db: &DatabaseConnection,
        user_id: i32,
        game_id: i32,
    ) -> Result<Option<library_entries::Model>, StoreError> {
        Self::find_pair(db, user_id, game_id).await
    }

    /// 获取某用户的全部条目
    pub async fn find_for_user(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<library_entries::Model>, StoreError> {
        Ok(LibraryEntries::find()
            .filter(library_entries::Column::UserId.eq(user_id))
            .order_by_asc(library_entries::Column::Id)
            .all(db)
            .await?)
    }

    /// 删除条目
    pub async fn delete(
        db: &DatabaseConnection,
        user_id: i32,
        game_id: i32,
    ) -> Result<u64, StoreError> {
        let result = LibraryEntries::delete_many()
            .filter(
                library_entries::Column::UserId
                    .eq(user_id)
                    .and(library_entries::Column::GameId.eq(game_id)),
            )
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    /// 统计某游戏被多少用户收入库中
    pub async fn count_for_game(db: &DatabaseConnection, game_id: i32) -> Result<u64, StoreError> {
        Ok(LibraryEntries::find()
            .filter(library_entries::Column::GameId.eq(game_id))
            .count(db)
            .await?)
    }

    // ==================== 私有方法 ====================

    async fn find_pair<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        game_id: i32,
    ) -> Result<Option<library_entries::Model>, StoreError> {
        Ok(LibraryEntries::find()
            .filter(
                library_entries::Column::UserId
                    .eq(user_id)
                    .and(library_entries::Column::GameId.eq(game_id)),
            )
            .one(conn)
            .await?)
    }

    async fn entry_exists<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        game_id: i32,
    ) -> Result<bool, StoreError> {
        Ok(Self::find_pair(conn, user_id, game_id).await?.is_some())
    }
}
