use actix_cors::Cors;

/// 投票页面与结果页面可能部署在不同域名下
pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_any_header()
        .expose_headers(vec!["Content-Disposition"])
        .max_age(3600)
}
