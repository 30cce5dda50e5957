use crate::models::*;
use crate::services::LocationService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/locations",
    tag = "voting",
    responses(
        (status = 200, description = "可投票地点列表 (按 id 升序)", body = LocationListResponse),
        (status = 500, description = "读取失败", body = ApiError)
    )
)]
/// 获取可投票地点；启用轮次限定时只返回当前活动轮次的地点
pub async fn get_locations(service: web::Data<LocationService>) -> Result<HttpResponse> {
    match service.list_locations().await {
        Ok(locations) => Ok(HttpResponse::Ok().json(json!({ "ok": true, "locations": locations }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn location_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/locations", web::get().to(get_locations));
}
