//! 数据实体模块
//!
//! 包含所有 SeaORM 实体定义，与 migration 中的表结构一一对应。

pub mod prelude;

// === 目录实体 ===
pub mod achievements;
pub mod devs;
pub mod games;
pub mod tags;

// === 用户与玩家数据实体 ===
pub mod friendships;
pub mod library_entries;
pub mod reviews;
pub mod saves;
pub mod users;

// === 运营实体 ===
pub mod events;
pub mod game_news;

// === 多对多关联实体 ===
pub mod game_dev_link;
pub mod game_tag_link;
pub mod user_achievement_link;
