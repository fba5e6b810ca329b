//! 游戏资讯仓库

use sea_orm::*;

use crate::database::dto::{NewsInput, UpdateNewsData};
use crate::database::error::StoreError;
use crate::database::txn::run_atomically;
use crate::database::validate;
use crate::entity::game_news;
use crate::entity::prelude::*;

/// 游戏资讯仓库
pub struct NewsRepository;

impl NewsRepository {
    /// 发布资讯，游戏必须存在；published_at 缺省为当前时间
    pub async fn create(
        db: &DatabaseConnection,
        game_id: i32,
        news: NewsInput,
    ) -> Result<game_news::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                validate::ensure_game_exists(txn, game_id).await?;

                let now = chrono::Utc::now().timestamp() as i32;
                let row = game_news::ActiveModel {
                    id: NotSet,
                    game_id: Set(game_id),
                    title: Set(news.title),
                    content: Set(news.content),
                    published_at: Set(news.published_at.unwrap_or(now)),
                }
                .insert(txn)
                .await?;

                Ok(row)
            })
        })
        .await
    }

    /// 部分更新资讯
    pub async fn update(
        db: &DatabaseConnection,
        news_id: i32,
        updates: UpdateNewsData,
    ) -> Result<game_news::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                let existing = GameNews::find_by_id(news_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| StoreError::not_found("news", news_id))?;

                let mut active: game_news::ActiveModel = existing.into();
                if let Some(title) = updates.title {
                    active.title = Set(title);
                }
                if let Some(content) = updates.content {
                    active.content = Set(content);
                }
                if let Some(published_at) = updates.published_at {
                    active.published_at = Set(published_at);
                }

                Ok(active.update(txn).await?)
            })
        })
        .await
    }

    /// 根据 ID 查询资讯
    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<game_news::Model>, StoreError> {
        Ok(GameNews::find_by_id(id).one(db).await?)
    }

    /// 获取某游戏的资讯，按发布时间倒序
    pub async fn find_for_game(
        db: &DatabaseConnection,
        game_id: i32,
    ) -> Result<Vec<game_news::Model>, StoreError> {
        Ok(GameNews::find()
            .filter(game_news::Column::GameId.eq(game_id))
            .order_by_desc(game_news::Column::PublishedAt)
            .all(db)
            .await?)
    }

    /// 删除资讯
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<u64, StoreError> {
        let result = GameNews::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }
}
