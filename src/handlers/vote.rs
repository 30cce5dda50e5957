use crate::models::*;
use crate::services::VoteService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/submit",
    tag = "voting",
    request_body = SubmitVoteRequest,
    responses(
        (status = 200, description = "投票已保存", body = SubmitVoteResponse),
        (status = 400, description = "选择数量、重复地点、分值分配或请求体错误", body = ApiError),
        (status = 500, description = "无活动轮次或写入失败", body = ApiError)
    )
)]
/// 提交投票:
/// 1. 校验数量 (1-3)、地点唯一、分值集合 (3 / 3,2 / 3,2,1)
/// 2. 写入一条 submission 和对应的 vote
pub async fn submit_vote(
    service: web::Data<VoteService>,
    request: web::Json<SubmitVoteRequest>,
) -> Result<HttpResponse> {
    match service.submit(&request.selections).await {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "ok": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn vote_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/submit", web::post().to(submit_vote));
}
