pub mod location;
pub mod results;
pub mod vote;

pub use location::location_config;
pub use results::results_config;
pub use vote::vote_config;

use crate::error::AppError;
use actix_web::web;

/// 请求体无法解析时返回 400 `{ok:false,error}`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| AppError::MalformedRequest(err.to_string()).into())
}

/// 所有 /api 下的路由
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .configure(location_config)
            .configure(vote_config)
            .configure(results_config),
    );
}
