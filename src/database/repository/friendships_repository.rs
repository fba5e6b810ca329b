//! 好友关系仓库
//!
//! 关系有向：(A, B) 与 (B, A) 是两行。创建时的校验顺序是固定的：
//! 自引用（BadRequest）在任何查询之前判掉，其次查有序对唯一
//! （Conflict），最后才查两个用户存在（NotFound）。

use sea_orm::*;

use crate::database::error::StoreError;
use crate::database::txn::run_atomically;
use crate::database::validate;
use crate::entity::friendships::{self, FriendshipStatus};
use crate::entity::prelude::*;

/// 好友关系仓库
pub struct FriendshipsRepository;

impl FriendshipsRepository {
    /// 建立好友关系，status 缺省为 pending
    pub async fn create(
        db: &DatabaseConnection,
        user_id: i32,
        friend_id: i32,
        status: Option<FriendshipStatus>,
    ) -> Result<friendships::Model, StoreError> {
        // 自引用无需访问存储即可判定，无论两个 id 是否有效
        if !validate::not_self_reference(user_id, friend_id) {
            return Err(StoreError::bad_request(format!(
                "user {} cannot befriend themselves",
                user_id
            )));
        }

        run_atomically(db, move |txn| {
            Box::pin(async move {
                if Self::pair_exists(txn, user_id, friend_id).await? {
                    return Err(StoreError::conflict(
                        "friendship",
                        format!("user={}, friend={}", user_id, friend_id),
                    ));
                }
                validate::ensure_user_exists(txn, user_id).await?;
                validate::ensure_user_exists(txn, friend_id).await?;

                let row = friendships::ActiveModel {
                    id: NotSet,
                    user_id: Set(user_id),
                    friend_id: Set(friend_id),
                    status: Set(status.unwrap_or(FriendshipStatus::Pending)),
                    created_at: Set(Some(chrono::Utc::now().timestamp() as i32)),
                }
                .insert(txn)
                .await?;

                Ok(row)
            })
        })
        .await
    }

    /// 更新关系状态（接受 / 拉黑）
    pub async fn update_status(
        db: &DatabaseConnection,
        user_id: i32,
        friend_id: i32,
        status: FriendshipStatus,
    ) -> Result<friendships::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                let existing = Self::find_pair(txn, user_id, friend_id)
                    .await?
                    .ok_or_else(|| {
                        StoreError::not_found(
                            "friendship",
                            format!("user={}, friend={}", user_id, friend_id),
                        )
                    })?;

                let mut active: friendships::ActiveModel = existing.into();
                active.status = Set(status);

                Ok(active.update(txn).await?)
            })
        })
        .await
    }

    /// 查询某个有序对的关系
    pub async fn find_entry(
        db: &DatabaseConnection,
        user_id: i32,
        friend_id: i32,
    ) -> Result<Option<friendships::Model>, StoreError> {
        Self::find_pair(db, user_id, friend_id).await
    }

    /// 获取某用户发起的全部关系
    pub async fn find_for_user(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<friendships::Model>, StoreError> {
        Ok(Friendships::find()
            .filter(friendships::Column::UserId.eq(user_id))
            .order_by_asc(friendships::Column::Id)
            .all(db)
            .await?)
    }

    /// 解除好友关系
    pub async fn delete(
        db: &DatabaseConnection,
        user_id: i32,
        friend_id: i32,
    ) -> Result<u64, StoreError> {
        let result = Friendships::delete_many()
            .filter(
                friendships::Column::UserId
                    .eq(user_id)
                    .and(friendships::Column::FriendId.eq(friend_id)),
            )
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    /// 统计表内自引用行数（理应恒为 0，测试用）
    pub async fn count_self_rows(db: &DatabaseConnection, user_id: i32) -> Result<u64, StoreError> {
        Ok(Friendships::find()
            .filter(
                friendships::Column::UserId
                    .eq(user_id)
                    .and(friendships::Column::FriendId.eq(user_id)),
            )
            .count(db)
            .await?)
    }

    // ==================== 私有方法 ====================

    async fn find_pair<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        friend_id: i32,
    ) -> Result<Option<friendships::Model>, StoreError> {
        Ok(Friendships::find()
            .filter(
                friendships::Column::UserId
                    .eq(user_id)
                    .and(friendships::Column::FriendId.eq(friend_id)),
            )
            .one(conn)
            .await?)
    }

    async fn pair_exists<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        friend_id: i32,
    ) -> Result<bool, StoreError> {
        Ok(Self::find_pair(conn, user_id, friend_id).await?.is_some())
    }
}
