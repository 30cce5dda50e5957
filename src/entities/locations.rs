use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 可投票地点 (场地 + 艺术家)
/// - weight: 权重系数 (>= 0)，是否参与计分由配置决定
/// - event_id: 所属投票轮次，可为空 (未分配轮次)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub artist: String,
    #[sea_orm(column_type = "Double")]
    pub weight: f64,
    pub event_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Event,
    #[sea_orm(has_many = "super::votes::Entity")]
    Votes,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::votes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
