//! 游戏数据实体
//!
//! games 表是目录的核心表。title 全局唯一；base_game_id 自引用，
//! 指向本体游戏（DLC / 资料片场景），不得指向自身。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "Text", unique)]
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub price: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub release_date: Option<String>,

    /// 本体游戏 ID，NULL 表示独立作品
    pub base_game_id: Option<i32>,

    pub created_at: Option<i32>,
    pub updated_at: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::BaseGameId",
        to = "Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    BaseGame,
    #[sea_orm(has_many = "super::achievements::Entity")]
    Achievements,
    #[sea_orm(has_many = "super::events::Entity")]
    Events,
    #[sea_orm(has_many = "super::game_news::Entity")]
    GameNews,
    #[sea_orm(has_many = "super::game_tag_link::Entity")]
    GameTagLink,
    #[sea_orm(has_many = "super::game_dev_link::Entity")]
    GameDevLink,
    #[sea_orm(has_many = "super::library_entries::Entity")]
    LibraryEntries,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
    #[sea_orm(has_many = "super::saves::Entity")]
    Saves,
}

impl Related<super::achievements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Achievements.def()
    }
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl Related<super::game_news::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameNews.def()
    }
}

impl Related<super::game_tag_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameTagLink.def()
    }
}

impl Related<super::game_dev_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameDevLink.def()
    }
}

impl Related<super::library_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryEntries.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::saves::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Saves.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
