use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 单个选择 (客户端提交)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectionInput {
    #[schema(example = 5)]
    pub location_id: i32,
    #[schema(example = 3)]
    pub points: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// 提交投票请求
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitVoteRequest {
    #[serde(default)]
    pub selections: Vec<SelectionInput>,
}

/// 通过校验的选择，comment 已规整 (去空白，空串为 None)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSelection {
    pub location_id: i32,
    pub points: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitVoteResponse {
    pub ok: bool,
}
