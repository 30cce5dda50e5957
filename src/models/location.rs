use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::location_entity;

/// 地点列表项 (字段名沿用前端约定)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct LocationResponse {
    pub id: i32,
    /// 场地名称
    #[schema(example = "De Oude Kerk")]
    pub locatie: String,
    /// 艺术家
    #[schema(example = "Anna Jansen")]
    pub artiest: String,
    /// 权重系数
    #[schema(example = 1.0)]
    pub wegingsfactor: f64,
}

impl From<location_entity::Model> for LocationResponse {
    fn from(m: location_entity::Model) -> Self {
        LocationResponse {
            id: m.id,
            locatie: m.name,
            artiest: m.artist,
            wegingsfactor: m.weight,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationListResponse {
    pub ok: bool,
    pub locations: Vec<LocationResponse>,
}
