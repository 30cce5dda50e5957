use crate::middlewares::ResultsKeyGuard;
use crate::models::*;
use crate::services::ResultsService;
use crate::utils::results_to_csv;
use actix_web::http::header::{
    CacheControl, CacheDirective, ContentDisposition, DispositionParam, DispositionType,
};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/results",
    tag = "results",
    params(
        ("key" = String, Query, description = "结果查看密钥")
    ),
    responses(
        (status = 200, description = "按排名升序的汇总结果", body = ResultsResponse),
        (status = 401, description = "密钥错误或缺失", body = ApiError),
        (status = 500, description = "读取失败", body = ApiError)
    )
)]
pub async fn get_results(service: web::Data<ResultsService>) -> Result<HttpResponse> {
    match service.results().await {
        Ok(rows) => Ok(HttpResponse::Ok()
            .insert_header(CacheControl(vec![CacheDirective::NoStore]))
            .json(json!({ "ok": true, "rows": rows }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/results.csv",
    tag = "results",
    params(
        ("key" = String, Query, description = "结果查看密钥")
    ),
    responses(
        (status = 200, description = "CSV 文件 (uitslag.csv)", body = String, content_type = "text/csv"),
        (status = 401, description = "密钥错误或缺失", body = ApiError),
        (status = 500, description = "读取失败", body = ApiError)
    )
)]
/// 以 CSV 附件形式导出结果，所有字段均用双引号包裹
pub async fn export_results_csv(service: web::Data<ResultsService>) -> Result<HttpResponse> {
    match service.results().await {
        Ok(rows) => Ok(HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename("uitslag.csv".to_string())],
            })
            .insert_header(CacheControl(vec![CacheDirective::NoStore]))
            .body(results_to_csv(&rows))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 两个结果接口都需要共享密钥
pub fn results_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/results")
            .wrap(ResultsKeyGuard)
            .route(web::get().to(get_results)),
    )
    .service(
        web::resource("/results.csv")
            .wrap(ResultsKeyGuard)
            .route(web::get().to(export_results_csv)),
    );
}
