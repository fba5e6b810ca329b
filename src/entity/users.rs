//! 用户数据实体
//!
//! username 与 email 各自全局唯一。password_hash 由上游完成哈希后传入，
//! 本层只负责存取。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "Text", unique)]
    pub username: String,
    #[sea_orm(column_type = "Text", unique)]
    pub email: String,
    #[sea_orm(column_type = "Text")]
    pub password_hash: String,

    pub age: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub region: Option<String>,

    pub created_at: Option<i32>,
    pub updated_at: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::library_entries::Entity")]
    LibraryEntries,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
    #[sea_orm(has_many = "super::saves::Entity")]
    Saves,
    #[sea_orm(has_many = "super::user_achievement_link::Entity")]
    UserAchievementLink,
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

impl Related<super::user_achievement_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAchievementLink.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
