//! 校验器原语
//!
//! 所有校验都经由"当前事务句柄"执行（对 `ConnectionTrait` 泛型），
//! 保证校验与随后的写入观察同一快照。校验失败即中止整个工作单元，
//! 错误里点名出错的实体种类与具体值。
//!
//! 注意：唯一性预检查在并发写入下不是正确性保证。两个事务可能同时
//! 通过预检查再同时写入，此时以存储层唯一约束为准（见 error.rs 的统一
//! 翻译）；预检查的价值在于给出可读的错误信息。

use sea_orm::*;
use std::collections::HashSet;

use crate::database::error::StoreError;
use crate::entity::prelude::*;
use crate::entity::{achievements, devs, games, tags, users};

// ==================== 按主键的存在性校验 ====================

pub async fn ensure_game_exists<C: ConnectionTrait>(conn: &C, id: i32) -> Result<(), StoreError> {
    if Games::find_by_id(id).count(conn).await? > 0 {
        Ok(())
    } else {
        Err(StoreError::not_found("game", id))
    }
}

pub async fn ensure_user_exists<C: ConnectionTrait>(conn: &C, id: i32) -> Result<(), StoreError> {
    if Users::find_by_id(id).count(conn).await? > 0 {
        Ok(())
    } else {
        Err(StoreError::not_found("user", id))
    }
}

pub async fn ensure_tag_exists<C: ConnectionTrait>(conn: &C, id: i32) -> Result<(), StoreError> {
    if Tags::find_by_id(id).count(conn).await? > 0 {
        Ok(())
    } else {
        Err(StoreError::not_found("tag", id))
    }
}

pub async fn ensure_dev_exists<C: ConnectionTrait>(conn: &C, id: i32) -> Result<(), StoreError> {
    if Devs::find_by_id(id).count(conn).await? > 0 {
        Ok(())
    } else {
        Err(StoreError::not_found("dev", id))
    }
}

pub async fn ensure_achievement_exists<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<(), StoreError> {
    if Achievements::find_by_id(id).count(conn).await? > 0 {
        Ok(())
    } else {
        Err(StoreError::not_found("achievement", id))
    }
}

// ==================== 批量存在性校验（基数检查） ====================
//
// 一次取回所有命中行；只要有 id 未命中，就以第一个缺失的 id 报 NotFound。
// 返回取回的行，供调用方复用，避免二次查询。

pub async fn ensure_tags_exist<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
) -> Result<Vec<tags::Model>, StoreError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found = Tags::find()
        .filter(tags::Column::Id.is_in(ids.iter().copied()))
        .all(conn)
        .await?;
    check_cardinality("tag", ids, found.iter().map(|m| m.id))?;
    Ok(found)
}

pub async fn ensure_devs_exist<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
) -> Result<Vec<devs::Model>, StoreError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found = Devs::find()
        .filter(devs::Column::Id.is_in(ids.iter().copied()))
        .all(conn)
        .await?;
    check_cardinality("dev", ids, found.iter().map(|m| m.id))?;
    Ok(found)
}

pub async fn ensure_games_exist<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
) -> Result<Vec<games::Model>, StoreError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found = Games::find()
        .filter(games::Column::Id.is_in(ids.iter().copied()))
        .all(conn)
        .await?;
    check_cardinality("game", ids, found.iter().map(|m| m.id))?;
    Ok(found)
}

pub async fn ensure_users_exist<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
) -> Result<Vec<users::Model>, StoreError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found = Users::find()
        .filter(users::Column::Id.is_in(ids.iter().copied()))
        .all(conn)
        .await?;
    check_cardinality("user", ids, found.iter().map(|m| m.id))?;
    Ok(found)
}

pub async fn ensure_achievements_exist<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
) -> Result<Vec<achievements::Model>, StoreError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found = Achievements::find()
        .filter(achievements::Column::Id.is_in(ids.iter().copied()))
        .all(conn)
        .await?;
    check_cardinality("achievement", ids, found.iter().map(|m| m.id))?;
    Ok(found)
}

fn check_cardinality(
    entity: &str,
    requested: &[i32],
    found: impl Iterator<Item = i32>,
) -> Result<(), StoreError> {
    let present: HashSet<i32> = found.collect();
    match requested.iter().find(|id| !present.contains(*id)) {
        Some(missing) => Err(StoreError::not_found(entity, missing)),
        None => Ok(()),
    }
}

// ==================== 按自然键的查找与唯一性校验 ====================

/// 按自然键（用户名或邮箱）查找用户
pub async fn find_user_by_key<C: ConnectionTrait>(
    conn: &C,
    key: &str,
) -> Result<Option<users::Model>, StoreError> {
    Ok(Users::find()
        .filter(
            users::Column::Username
                .eq(key)
                .or(users::Column::Email.eq(key)),
        )
        .one(conn)
        .await?)
}

/// 校验游戏标题未被占用；`excluding` 排除正在更新的行自身，
/// 这样"改名为当前值"不会误报冲突
pub async fn ensure_title_free<C: ConnectionTrait>(
    conn: &C,
    title: &str,
    excluding: Option<i32>,
) -> Result<(), StoreError> {
    let mut query = Games::find().filter(games::Column::Title.eq(title));
    if let Some(id) = excluding {
        query = query.filter(games::Column::Id.ne(id));
    }
    if query.count(conn).await? > 0 {
        return Err(StoreError::conflict("game title", title));
    }
    Ok(())
}

pub async fn ensure_tag_name_free<C: ConnectionTrait>(
    conn: &C,
    tag_name: &str,
    excluding: Option<i32>,
) -> Result<(), StoreError> {
    let mut query = Tags::find().filter(tags::Column::TagName.eq(tag_name));
    if let Some(id) = excluding {
        query = query.filter(tags::Column::Id.ne(id));
    }
    if query.count(conn).await? > 0 {
        return Err(StoreError::conflict("tag name", tag_name));
    }
    Ok(())
}

pub async fn ensure_dev_name_free<C: ConnectionTrait>(
    conn: &C,
    dev_name: &str,
    excluding: Option<i32>,
) -> Result<(), StoreError> {
    let mut query = Devs::find().filter(devs::Column::DevName.eq(dev_name));
    if let Some(id) = excluding {
        query = query.filter(devs::Column::Id.ne(id));
    }
    if query.count(conn).await? > 0 {
        return Err(StoreError::conflict("dev name", dev_name));
    }
    Ok(())
}

pub async fn ensure_username_free<C: ConnectionTrait>(
    conn: &C,
    username: &str,
    excluding: Option<i32>,
) -> Result<(), StoreError> {
    let mut query = Users::find().filter(users::Column::Username.eq(username));
    if let Some(id) = excluding {
        query = query.filter(users::Column::Id.ne(id));
    }
    if query.count(conn).await? > 0 {
        return Err(StoreError::conflict("username", username));
    }
    Ok(())
}

pub async fn ensure_email_free<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    excluding: Option<i32>,
) -> Result<(), StoreError> {
    let mut query = Users::find().filter(users::Column::Email.eq(email));
    if let Some(id) = excluding {
        query = query.filter(users::Column::Id.ne(id));
    }
    if query.count(conn).await? > 0 {
        return Err(StoreError::conflict("email", email));
    }
    Ok(())
}

// ==================== 纯业务规则判定 ====================

/// 活动日期序：结束必须严格晚于开始
pub fn date_range_valid(start: i32, end: i32) -> bool {
    end > start
}

/// 禁止自引用（好友关系、本体游戏）
pub fn not_self_reference(a: i32, b: i32) -> bool {
    a != b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_must_be_strict() {
        assert!(date_range_valid(1, 2));
        assert!(!date_range_valid(2, 2));
        assert!(!date_range_valid(3, 2));
    }

    #[test]
    fn self_reference_is_rejected() {
        assert!(not_self_reference(1, 2));
        assert!(!not_self_reference(7, 7));
    }

    #[test]
    fn cardinality_names_first_missing_id() {
        let err = check_cardinality("tag", &[1, 2, 999], [1, 2].into_iter()).unwrap_err();
        assert_eq!(err.to_string(), "tag not found: 999");

        assert!(check_cardinality("tag", &[1, 2], [2, 1].into_iter()).is_ok());
    }
}
