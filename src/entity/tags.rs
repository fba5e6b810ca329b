use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text", unique)]
    pub tag_name: String,
    pub created_at: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game_tag_link::Entity")]
    GameTagLink,
}

impl Related<super::game_tag_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameTagLink.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
