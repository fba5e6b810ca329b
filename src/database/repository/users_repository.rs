//! 用户数据仓库
//!
//! 承载第二个聚合写入 `insert_with_setup`：在一个事务内创建用户、
//! 初始愿望单、待确认好友关系与成就解锁，整体提交或整体回滚。

use sea_orm::*;
use serde::{Deserialize, Serialize};

use crate::database::dto::{InsertUserData, UpdateUserData};
use crate::database::error::StoreError;
use crate::database::txn::run_atomically;
use crate::database::validate;
use crate::entity::friendships::FriendshipStatus;
use crate::entity::library_entries::{DownloadStatus, Ownership};
use crate::entity::prelude::*;
use crate::entity::{
    achievements, friendships, library_entries, user_achievement_link, users,
};

/// 用户初始聚合：用户 + 游戏库 + 好友关系 + 成就解锁
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSetupData {
    pub user: users::Model,
    pub library: Vec<library_entries::Model>,
    pub friendships: Vec<friendships::Model>,
    pub unlocks: Vec<user_achievement_link::Model>,
}

/// 用户数据仓库
pub struct UsersRepository;

impl UsersRepository {
    // ==================== 聚合创建 ====================

    /// 创建用户并完成初始配置
    ///
    /// 校验用户名/邮箱唯一，再校验每个引用的游戏/好友/成就 ID 存在；
    /// 随后插入用户、每个游戏一条愿望单条目、每个好友一条 pending
    /// 关系、每个成就一条解锁记录。任何一步失败整体回滚。
    pub async fn insert_with_setup(
        db: &DatabaseConnection,
        user: InsertUserData,
        initial_game_ids: Option<Vec<i32>>,
        friend_ids: Option<Vec<i32>>,
        achievement_ids: Option<Vec<i32>>,
    ) -> Result<UserSetupData, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                validate::ensure_username_free(txn, &user.username, None).await?;
                validate::ensure_email_free(txn, &user.email, None).await?;

                let game_ids = initial_game_ids.unwrap_or_default();
                let friend_ids = friend_ids.unwrap_or_default();
                let achievement_ids = achievement_ids.unwrap_or_default();

                validate::ensure_games_exist(txn, &game_ids).await?;
                validate::ensure_users_exist(txn, &friend_ids).await?;
                validate::ensure_achievements_exist(txn, &achievement_ids).await?;

                let now = chrono::Utc::now().timestamp() as i32;

                let user_row = users::ActiveModel {
                    id: NotSet,
                    username: Set(user.username),
                    email: Set(user.email),
                    password_hash: Set(user.password_hash),
                    age: Set(user.age),
                    region: Set(user.region),
                    created_at: Set(Some(now)),
                    updated_at: Set(Some(now)),
                }
                .insert(txn)
                .await?;

                if !game_ids.is_empty() {
                    let rows: Vec<library_entries::ActiveModel> = game_ids
                        .into_iter()
                        .map(|game_id| library_entries::ActiveModel {
                            id: NotSet,
                            user_id: Set(user_row.id),
                            game_id: Set(game_id),
                            hours_played: Set(0.0),
                            ownership: Set(Ownership::Wishlist),
                            download_status: Set(DownloadStatus::None),
                            added_at: Set(Some(now)),
                        })
                        .collect();
                    LibraryEntries::insert_many(rows).exec(txn).await?;
                }

                if !friend_ids.is_empty() {
                    let rows: Vec<friendships::ActiveModel> = friend_ids
                        .into_iter()
                        .map(|friend_id| friendships::ActiveModel {
                            id: NotSet,
                            user_id: Set(user_row.id),
                            friend_id: Set(friend_id),
                            status: Set(FriendshipStatus::Pending),
                            created_at: Set(Some(now)),
                        })
                        .collect();
                    Friendships::insert_many(rows).exec(txn).await?;
                }

                if !achievement_ids.is_empty() {
                    let rows: Vec<user_achievement_link::ActiveModel> = achievement_ids
                        .into_iter()
                        .map(|achievement_id| user_achievement_link::ActiveModel {
                            id: NotSet,
                            user_id: Set(user_row.id),
                            achievement_id: Set(achievement_id),
                            unlocked_at: Set(Some(now)),
                        })
                        .collect();
                    UserAchievementLink::insert_many(rows).exec(txn).await?;
                }

                log::info!("创建用户并完成初始配置: id={}", user_row.id);

                // 事务内回读，返回组合好的聚合
                let library = LibraryEntries::find()
                    .filter(library_entries::Column::UserId.eq(user_row.id))
                    .order_by_asc(library_entries::Column::Id)
                    .all(txn)
                    .await?;
                let friendships = Friendships::find()
                    .filter(friendships::Column::UserId.eq(user_row.id))
                    .order_by_asc(friendships::Column::Id)
                    .all(txn)
                    .await?;
                let unlocks = UserAchievementLink::find()
                    .filter(user_achievement_link::Column::UserId.eq(user_row.id))
                    .order_by_asc(user_achievement_link::Column::Id)
                    .all(txn)
                    .await?;

                Ok(UserSetupData {
                    user: user_row,
                    library,
                    friendships,
                    unlocks,
                })
            })
        })
        .await
    }

    // ==================== 单行 CRUD ====================

    /// 插入用户，校验用户名与邮箱唯一
    pub async fn insert(
        db: &DatabaseConnection,
        user: InsertUserData,
    ) -> Result<users::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                validate::ensure_username_free(txn, &user.username, None).await?;
                validate::ensure_email_free(txn, &user.email, None).await?;

                let now = chrono::Utc::now().timestamp() as i32;
                let row = users::ActiveModel {
                    id: NotSet,
                    username: Set(user.username),
                    email: Set(user.email),
                    password_hash: Set(user.password_hash),
                    age: Set(user.age),
                    region: Set(user.region),
                    created_at: Set(Some(now)),
                    updated_at: Set(Some(now)),
                }
                .insert(txn)
                .await?;

                Ok(row)
            })
        })
        .await
    }

    /// 部分更新用户，改用户名/邮箱时排除自身行
    pub async fn update(
        db: &DatabaseConnection,
        user_id: i32,
        updates: UpdateUserData,
    ) -> Result<users::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                let existing = Users::find_by_id(user_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| StoreError::not_found("user", user_id))?;

                if let Some(username) = &updates.username {
                    validate::ensure_username_free(txn, username, Some(user_id)).await?;
                }
                if let Some(email) = &updates.email {
                    validate::ensure_email_free(txn, email, Some(user_id)).await?;
                }

                let mut active: users::ActiveModel = existing.into();
                if let Some(username) = updates.username {
                    active.username = Set(username);
                }
                if let Some(email) = updates.email {
                    active.email = Set(email);
                }
                if let Some(password_hash) = updates.password_hash {
                    active.password_hash = Set(password_hash);
                }
                if let Some(age) = updates.age {
                    active.age = Set(age);
                }
                if let Some(region) = updates.region {
                    active.region = Set(region);
                }
                active.updated_at = Set(Some(chrono::Utc::now().timestamp() as i32));

                Ok(active.update(txn).await?)
            })
        })
        .await
    }

    /// 根据 ID 查询用户
    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<users::Model>, StoreError> {
        Ok(Users::find_by_id(id).one(db).await?)
    }

    /// 按自然键（用户名或邮箱）查询用户
    pub async fn find_by_key(
        db: &DatabaseConnection,
        key: &str,
    ) -> Result<Option<users::Model>, StoreError> {
        validate::find_user_by_key(db, key).await
    }

    /// 获取用户总数
    pub async fn count(db: &DatabaseConnection) -> Result<u64, StoreError> {
        Ok(Users::find().count(db).await?)
    }

    /// 删除用户，引用行由存储层级联清理
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<u64, StoreError> {
        let result = Users::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }

    // ==================== 成就解锁 ====================

    /// 为用户解锁成就
    pub async fn unlock_achievement(
        db: &DatabaseConnection,
        user_id: i32,
        achievement_id: i32,
    ) -> Result<user_achievement_link::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                if Self::unlock_exists(txn, user_id, achievement_id).await? {
                    return Err(StoreError::conflict(
                        "achievement unlock",
                        format!("user={}, achievement={}", user_id, achievement_id),
                    ));
                }
                validate::ensure_user_exists(txn, user_id).await?;
                validate::ensure_achievement_exists(txn, achievement_id).await?;

                let row = user_achievement_link::ActiveModel {
                    id: NotSet,
                    user_id: Set(user_id),
                    achievement_id: Set(achievement_id),
                    unlocked_at: Set(Some(chrono::Utc::now().timestamp() as i32)),
                }
                .insert(txn)
                .await?;

                Ok(row)
            })
        })
        .await
    }

    /// 撤销用户的成就解锁
    pub async fn revoke_achievement(
        db: &DatabaseConnection,
        user_id: i32,
        achievement_id: i32,
    ) -> Result<(), StoreError> {
        let result = UserAchievementLink::delete_many()
            .filter(
                user_achievement_link::Column::UserId
                    .eq(user_id)
                    .and(user_achievement_link::Column::AchievementId.eq(achievement_id)),
            )
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::not_found(
                "achievement unlock",
                format!("user={}, achievement={}", user_id, achievement_id),
            ));
        }
        Ok(())
    }

    /// 获取用户已解锁的所有成就
    pub async fn achievements_of_user(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<achievements::Model>, StoreError> {
        let achievement_ids: Vec<i32> = UserAchievementLink::find()
            .filter(user_achievement_link::Column::UserId.eq(user_id))
            .all(db)
            .await?
            .into_iter()
            .map(|link| link.achievement_id)
            .collect();

        if achievement_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(Achievements::find()
            .filter(achievements::Column::Id.is_in(achievement_ids))
            .order_by_asc(achievements::Column::Id)
            .all(db)
            .await?)
    }

    // ==================== 私有方法 ====================

    /// 检查解锁记录是否已存在
    async fn unlock_exists<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        achievement_id: i32,
    ) -> Result<bool, StoreError> {
        let count = UserAchievementLink::find()
            .filter(
                user_achievement_link::Column::UserId
                    .eq(user_id)
                    .and(user_achievement_link::Column::AchievementId.eq(achievement_id)),
            )
            .count(conn)
            .await?;
        Ok(count > 0)
    }
}
