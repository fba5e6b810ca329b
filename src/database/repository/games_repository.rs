//! 游戏数据仓库
//!
//! 除单行 CRUD 外，这里承载最重的聚合写入 `insert_complete`：
//! 在一个事务内创建游戏本体、成就、标签/厂商关联和首条资讯，
//! 任何一步失败则整体回滚，不留下任何部分写入。

use sea_orm::*;
use serde::{Deserialize, Serialize};

use crate::database::dto::{AchievementInput, InsertGameData, NewsInput, UpdateGameData};
use crate::database::error::StoreError;
use crate::database::txn::run_atomically;
use crate::database::validate;
use crate::entity::prelude::*;
use crate::entity::{
    achievements, devs, game_dev_link, game_news, game_tag_link, games, tags,
};

/// 完整游戏聚合：本体 + 成就 + 标签 + 厂商 + 资讯
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullGameData {
    pub game: games::Model,
    pub achievements: Vec<achievements::Model>,
    pub tags: Vec<tags::Model>,
    pub devs: Vec<devs::Model>,
    pub news: Vec<game_news::Model>,
}

/// 游戏数据仓库
pub struct GamesRepository;

impl GamesRepository {
    // ==================== 聚合创建 ====================

    /// 一次性创建完整游戏（本体 + 成就 + 标签/厂商关联 + 首条资讯）
    ///
    /// 校验顺序：标题唯一 → 标签存在 → 厂商存在 → 本体游戏存在，
    /// 全部通过后才开始写入；失败时整个聚合回滚。
    /// 返回事务内回读的完整聚合。
    pub async fn insert_complete(
        db: &DatabaseConnection,
        game: InsertGameData,
        tag_ids: Vec<i32>,
        dev_ids: Vec<i32>,
        achievements: Vec<AchievementInput>,
        initial_news: NewsInput,
    ) -> Result<FullGameData, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                validate::ensure_title_free(txn, &game.title, None).await?;
                validate::ensure_tags_exist(txn, &tag_ids).await?;
                validate::ensure_devs_exist(txn, &dev_ids).await?;
                if let Some(base_id) = game.base_game_id {
                    validate::ensure_game_exists(txn, base_id).await?;
                }

                let now = chrono::Utc::now().timestamp() as i32;

                let game_row = games::ActiveModel {
                    id: NotSet,
                    title: Set(game.title),
                    description: Set(game.description),
                    price: Set(game.price),
                    release_date: Set(game.release_date),
                    base_game_id: Set(game.base_game_id),
                    created_at: Set(Some(now)),
                    updated_at: Set(Some(now)),
                }
                .insert(txn)
                .await?;

                if !achievements.is_empty() {
                    let rows: Vec<achievements::ActiveModel> = achievements
                        .into_iter()
                        .map(|a| achievements::ActiveModel {
                            id: NotSet,
                            game_id: Set(game_row.id),
                            title: Set(a.title),
                            icon: Set(a.icon),
                            created_at: Set(Some(now)),
                        })
                        .collect();
                    Achievements::insert_many(rows).exec(txn).await?;
                }

                if !tag_ids.is_empty() {
                    let rows: Vec<game_tag_link::ActiveModel> = tag_ids
                        .into_iter()
                        .map(|tag_id| game_tag_link::ActiveModel {
                            id: NotSet,
                            game_id: Set(game_row.id),
                            tag_id: Set(tag_id),
                            created_at: Set(Some(now)),
                        })
                        .collect();
                    GameTagLink::insert_many(rows).exec(txn).await?;
                }

                if !dev_ids.is_empty() {
                    let rows: Vec<game_dev_link::ActiveModel> = dev_ids
                        .into_iter()
                        .map(|dev_id| game_dev_link::ActiveModel {
                            id: NotSet,
                            game_id: Set(game_row.id),
                            dev_id: Set(dev_id),
                            created_at: Set(Some(now)),
                        })
                        .collect();
                    GameDevLink::insert_many(rows).exec(txn).await?;
                }

                game_news::ActiveModel {
                    id: NotSet,
                    game_id: Set(game_row.id),
                    title: Set(initial_news.title),
                    content: Set(initial_news.content),
                    published_at: Set(initial_news.published_at.unwrap_or(now)),
                }
                .insert(txn)
                .await?;

                log::info!("创建完整游戏成功: id={}", game_row.id);

                // 事务内回读，返回组合好的聚合
                Self::compose_full(txn, game_row).await
            })
        })
        .await
    }

    // ==================== 单行 CRUD ====================

    /// 插入游戏，校验标题唯一与本体游戏存在
    pub async fn insert(
        db: &DatabaseConnection,
        game: InsertGameData,
    ) -> Result<games::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                validate::ensure_title_free(txn, &game.title, None).await?;
                if let Some(base_id) = game.base_game_id {
                    validate::ensure_game_exists(txn, base_id).await?;
                }

                let now = chrono::Utc::now().timestamp() as i32;
                let row = games::ActiveModel {
                    id: NotSet,
                    title: Set(game.title),
                    description: Set(game.description),
                    price: Set(game.price),
                    release_date: Set(game.release_date),
                    base_game_id: Set(game.base_game_id),
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

    /// 部分更新游戏，未提供的字段保持不变、也不触发校验
    ///
    /// 改名时排除自身行，改回当前标题不会误报冲突；
    /// `base_game_id` 指向自身直接拒绝，之后才校验目标存在。
    pub async fn update(
        db: &DatabaseConnection,
        game_id: i32,
        updates: UpdateGameData,
    ) -> Result<games::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                let existing = Games::find_by_id(game_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| StoreError::not_found("game", game_id))?;

                if let Some(title) = &updates.title {
                    validate::ensure_title_free(txn, title, Some(game_id)).await?;
                }
                if let Some(Some(base_id)) = updates.base_game_id {
                    if !validate::not_self_reference(base_id, game_id) {
                        return Err(StoreError::bad_request(format!(
                            "game {} cannot be its own base game",
                            game_id
                        )));
                    }
                    validate::ensure_game_exists(txn, base_id).await?;
                }

                let mut active: games::ActiveModel = existing.into();
                if let Some(title) = updates.title {
                    active.title = Set(title);
                }
                if let Some(description) = updates.description {
                    active.description = Set(description);
                }
                if let Some(price) = updates.price {
                    active.price = Set(price);
                }
                if let Some(release_date) = updates.release_date {
                    active.release_date = Set(release_date);
                }
                if let Some(base_game_id) = updates.base_game_id {
                    active.base_game_id = Set(base_game_id);
                }
                active.updated_at = Set(Some(chrono::Utc::now().timestamp() as i32));

                Ok(active.update(txn).await?)
            })
        })
        .await
    }

    /// 根据 ID 查询游戏
    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<games::Model>, StoreError> {
        Ok(Games::find_by_id(id).one(db).await?)
    }

    /// 按标题（自然键）查询游戏
    pub async fn find_by_title(
        db: &DatabaseConnection,
        title: &str,
    ) -> Result<Option<games::Model>, StoreError> {
        Ok(Games::find()
            .filter(games::Column::Title.eq(title))
            .one(db)
            .await?)
    }

    /// 根据 ID 查询完整游戏聚合（包含成就、标签、厂商、资讯）
    pub async fn find_full_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<FullGameData>, StoreError> {
        let Some(game) = Games::find_by_id(id).one(db).await? else {
            return Ok(None);
        };
        Ok(Some(Self::compose_full(db, game).await?))
    }

    /// 获取所有游戏，按标题排序
    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<games::Model>, StoreError> {
        Ok(Games::find()
            .order_by_asc(games::Column::Title)
            .all(db)
            .await?)
    }

    /// 获取游戏总数
    pub async fn count(db: &DatabaseConnection) -> Result<u64, StoreError> {
        Ok(Games::find().count(db).await?)
    }

    /// 按标题统计（验证"全有或全无"时使用）
    pub async fn count_by_title(db: &DatabaseConnection, title: &str) -> Result<u64, StoreError> {
        Ok(Games::find()
            .filter(games::Column::Title.eq(title))
            .count(db)
            .await?)
    }

    /// 删除游戏，引用行由存储层级联清理
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<u64, StoreError> {
        let result = Games::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }

    /// 批量删除游戏
    pub async fn delete_many(db: &DatabaseConnection, ids: Vec<i32>) -> Result<u64, StoreError> {
        let result = Games::delete_many()
            .filter(games::Column::Id.is_in(ids))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }

    // ==================== 私有方法 ====================

    /// 以给定游戏为根组合完整聚合
    async fn compose_full<C: ConnectionTrait>(
        conn: &C,
        game: games::Model,
    ) -> Result<FullGameData, StoreError> {
        let achievement_rows = Achievements::find()
            .filter(achievements::Column::GameId.eq(game.id))
            .order_by_asc(achievements::Column::Id)
            .all(conn)
            .await?;

        let tag_ids: Vec<i32> = GameTagLink::find()
            .filter(game_tag_link::Column::GameId.eq(game.id))
            .all(conn)
            .await?
            .into_iter()
            .map(|link| link.tag_id)
            .collect();
        let tag_rows = if tag_ids.is_empty() {
            Vec::new()
        } else {
            Tags::find()
                .filter(tags::Column::Id.is_in(tag_ids))
                .order_by_asc(tags::Column::Id)
                .all(conn)
                .await?
        };

        let dev_ids: Vec<i32> = GameDevLink::find()
            .filter(game_dev_link::Column::GameId.eq(game.id))
            .all(conn)
            .await?
            .into_iter()
            .map(|link| link.dev_id)
            .collect();
        let dev_rows = if dev_ids.is_empty() {
            Vec::new()
        } else {
            Devs::find()
                .filter(devs::Column::Id.is_in(dev_ids))
                .order_by_asc(devs::Column::Id)
                .all(conn)
                .await?
        };

        let news_rows = GameNews::find()
            .filter(game_news::Column::GameId.eq(game.id))
            .order_by_desc(game_news::Column::PublishedAt)
            .all(conn)
            .await?;

        Ok(FullGameData {
            game,
            achievements: achievement_rows,
            tags: tag_rows,
            devs: dev_rows,
            news: news_rows,
        })
    }
}
