use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 统一错误响应体
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub ok: bool,
    #[schema(example = "access denied")]
    pub error: String,
}
