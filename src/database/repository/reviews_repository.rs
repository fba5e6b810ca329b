//! 评测仓库

use sea_orm::*;

use crate::database::dto::UpdateReviewData;
use crate::database::error::StoreError;
use crate::database::txn::run_atomically;
use crate::database::validate;
use crate::entity::prelude::*;
use crate::entity::reviews;

/// 评测仓库
pub struct ReviewsRepository;

impl ReviewsRepository {
    /// 创建评测，每个 (user, game) 至多一条
    pub async fn create(
        db: &DatabaseConnection,
        user_id: i32,
        game_id: i32,
        rating: i32,
        body: Option<String>,
    ) -> Result<reviews::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                if Self::review_exists(txn, user_id, game_id).await? {
                    return Err(StoreError::conflict(
                        "review",
                        format!("user={}, game={}", user_id, game_id),
                    ));
                }
                validate::ensure_user_exists(txn, user_id).await?;
                validate::ensure_game_exists(txn, game_id).await?;

                let now = chrono::Utc::now().timestamp() as i32;
                let row = reviews::ActiveModel {
                    id: NotSet,
                    user_id: Set(user_id),
                    game_id: Set(game_id),
                    rating: Set(rating),
                    body: Set(body),
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

    /// 部分更新评测
    pub async fn update(
        db: &DatabaseConnection,
        user_id: i32,
        game_id: i32,
        updates: UpdateReviewData,
    ) -> Result<reviews::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                let existing = Self::find_pair(txn, user_id, game_id)
                    .await?
                    .ok_or_else(|| {
                        StoreError::not_found(
                            "review",
                            format!("user={}, game={}", user_id, game_id),
                        )
                    })?;

                let mut active: reviews::ActiveModel = existing.into();
                if let Some(rating) = updates.rating {
                    active.rating = Set(rating);
                }
                if let Some(body) = updates.body {
                    active.body = Set(body);
                }
                active.updated_at = Set(Some(chrono::Utc::now().timestamp() as i32));

                Ok(active.update(txn).await?)
            })
        })
        .await
    }

    /// 查询某用户对某游戏的评测
    pub async fn find_entry(
        db: &DatabaseConnection,
        user_id: i32,
        game_id: i32,
    ) -> Result<Option<reviews::Model>, StoreError> {
        Self::find_pair(db, user_id, game_id).await
    }

    /// 获取某游戏的所有评测
    pub async fn find_for_game(
        db: &DatabaseConnection,
        game_id: i32,
    ) -> Result<Vec<reviews::Model>, StoreError> {
        Ok(Reviews::find()
            .filter(reviews::Column::GameId.eq(game_id))
            .order_by_asc(reviews::Column::Id)
            .all(db)
            .await?)
    }

    /// 某游戏的平均评分，无评测时返回 None
    pub async fn average_rating_for_game(
        db: &DatabaseConnection,
        game_id: i32,
    ) -> Result<Option<f64>, StoreError> {
        let rows = Self::find_for_game(db, game_id).await?;
        if rows.is_empty() {
            return Ok(None);
        }
        let total: i64 = rows.iter().map(|r| i64::from(r.rating)).sum();
        Ok(Some(total as f64 / rows.len() as f64))
    }

    /// 删除评测
    pub async fn delete(
        db: &DatabaseConnection,
        user_id: i32,
        game_id: i32,
    ) -> Result<u64, StoreError> {
        let result = Reviews::delete_many()
            .filter(
                reviews::Column::UserId
                    .eq(user_id)
                    .and(reviews::Column::GameId.eq(game_id)),
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
    ) -> Result<Option<reviews::Model>, StoreError> {
        Ok(Reviews::find()
            .filter(
                reviews::Column::UserId
                    .eq(user_id)
                    .and(reviews::Column::GameId.eq(game_id)),
            )
            .one(conn)
            .await?)
    }

    async fn review_exists<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        game_id: i32,
    ) -> Result<bool, StoreError> {
        Ok(Self::find_pair(conn, user_id, game_id).await?.is_some())
    }
}
