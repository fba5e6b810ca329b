use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 厂商角色：开发、发行或两者兼任
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum DevType {
    #[sea_orm(string_value = "developer")]
    Developer,
    #[sea_orm(string_value = "publisher")]
    Publisher,
    #[sea_orm(string_value = "both")]
    Both,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "devs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text", unique)]
    pub dev_name: String,
    pub dev_type: DevType,
    pub created_at: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game_dev_link::Entity")]
    GameDevLink,
}

impl Related<super::game_dev_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameDevLink.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
