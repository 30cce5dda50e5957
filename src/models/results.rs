use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 按地点汇总的结果行
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ResultRow {
    /// 排名 (从 1 开始连续)
    pub positie: u32,
    pub locatie_id: i32,
    pub locatie: String,
    pub artiest: String,
    pub wegingsfactor: f64,
    /// 得票数
    pub stemmen_aantal: u32,
    /// 总分 (是否乘以权重由配置决定)
    pub punten_totaal: f64,
    pub aantal_3: u32,
    pub aantal_2: u32,
    pub aantal_1: u32,
    /// 所有非空评论的拼接，没有评论时为 null
    pub toelichting_bundel: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ResultsResponse {
    pub ok: bool,
    pub rows: Vec<ResultRow>,
}

/// 结果查询参数
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResultsQuery {
    pub key: Option<String>,
}
