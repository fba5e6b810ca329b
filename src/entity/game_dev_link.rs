use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_dev_link")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub game_id: i32,
    pub dev_id: i32,
    pub created_at: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::games::Entity",
        from = "Column::GameId",
        to = "super::games::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Games,
    #[sea_orm(
        belongs_to = "super::devs::Entity",
        from = "Column::DevId",
        to = "super::devs::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Devs,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Games.def()
    }
}

impl Related<super::devs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Devs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
