//! 限时活动仓库
//!
//! 日期不变量：end_date 必须严格晚于 start_date。更新时只提供一端
//! 日期的话，另一端取库里已存的值参与校验。

use sea_orm::*;

use crate::database::dto::UpdateEventData;
use crate::database::error::StoreError;
use crate::database::txn::run_atomically;
use crate::database::validate;
use crate::entity::events::{self, EventKind};
use crate::entity::prelude::*;

/// 限时活动仓库
pub struct EventsRepository;

impl EventsRepository {
    /// 创建活动，游戏必须存在且日期序合法
    pub async fn create(
        db: &DatabaseConnection,
        game_id: i32,
        event_type: EventKind,
        start_date: i32,
        end_date: i32,
    ) -> Result<events::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                validate::ensure_game_exists(txn, game_id).await?;
                if !validate::date_range_valid(start_date, end_date) {
                    return Err(StoreError::bad_request(format!(
                        "event dates out of order: start={}, end={}",
                        start_date, end_date
                    )));
                }

                let row = events::ActiveModel {
                    id: NotSet,
                    game_id: Set(game_id),
                    event_type: Set(event_type),
                    start_date: Set(start_date),
                    end_date: Set(end_date),
                    created_at: Set(Some(chrono::Utc::now().timestamp() as i32)),
                }
                .insert(txn)
                .await?;

                Ok(row)
            })
        })
        .await
    }

    /// 部分更新活动
    ///
    /// 触碰任一端日期时，未提供的一端取已存值重新校验日期序；
    /// 触碰 game_id 时重新校验目标游戏存在。
    pub async fn update(
        db: &DatabaseConnection,
        event_id: i32,
        updates: UpdateEventData,
    ) -> Result<events::Model, StoreError> {
        run_atomically(db, move |txn| {
            Box::pin(async move {
                let existing = Events::find_by_id(event_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| StoreError::not_found("event", event_id))?;

                if let Some(game_id) = updates.game_id {
                    validate::ensure_game_exists(txn, game_id).await?;
                }
                if updates.start_date.is_some() || updates.end_date.is_some() {
                    let start = updates.start_date.unwrap_or(existing.start_date);
                    let end = updates.end_date.unwrap_or(existing.end_date);
                    if !validate::date_range_valid(start, end) {
                        return Err(StoreError::bad_request(format!(
                            "event dates out of order: start={}, end={}",
                            start, end
                        )));
                    }
                }

                let mut active: events::ActiveModel = existing.into();
                if let Some(game_id) = updates.game_id {
                    active.game_id = Set(game_id);
                }
                if let Some(event_type) = updates.event_type {
                    active.event_type = Set(event_type);
                }
                if let Some(start_date) = updates.start_date {
                    active.start_date = Set(start_date);
                }
                if let Some(end_date) = updates.end_date {
                    active.end_date = Set(end_date);
                }

                Ok(active.update(txn).await?)
            })
        })
        .await
    }

    /// 根据 ID 查询活动
    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<events::Model>, StoreError> {
        Ok(Events::find_by_id(id).one(db).await?)
    }

    /// 获取某游戏的所有活动
    pub async fn find_for_game(
        db: &DatabaseConnection,
        game_id: i32,
    ) -> Result<Vec<events::Model>, StoreError> {
        Ok(Events::find()
            .filter(events::Column::GameId.eq(game_id))
            .order_by_asc(events::Column::StartDate)
            .all(db)
            .await?)
    }

    /// 获取某时刻正在进行的活动
    pub async fn find_active(
        db: &DatabaseConnection,
        at: i32,
    ) -> Result<Vec<events::Model>, StoreError> {
        Ok(Events::find()
            .filter(
                events::Column::StartDate
                    .lte(at)
                    .and(events::Column::EndDate.gt(at)),
            )
            .order_by_asc(events::Column::EndDate)
            .all(db)
            .await?)
    }

    /// 删除活动
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<u64, StoreError> {
        let result = Events::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }
}
