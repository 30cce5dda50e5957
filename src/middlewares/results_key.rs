use crate::config::VotingConfig;
use crate::error::AppError;
use crate::models::ResultsQuery;
use actix_web::body::EitherBody;
use actix_web::{
    Error, ResponseError,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web,
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

/// 结果接口的共享密钥校验
///
/// 从 `?key=` 读取密钥，与 app data 中 `VotingConfig::results_key` 比较。
/// 不匹配或缺失返回 401；服务端未配置密钥返回 500。
pub struct ResultsKeyGuard;

impl<S, B> Transform<S, ServiceRequest> for ResultsKeyGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ResultsKeyGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ResultsKeyGuardService { service }))
    }
}

pub struct ResultsKeyGuardService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ResultsKeyGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let verdict = match req.app_data::<web::Data<VotingConfig>>() {
            Some(voting) => check_key(&voting.results_key, req.query_string()),
            None => Err(AppError::ConfigError(
                "voting config is not registered".to_string(),
            )),
        };

        match verdict {
            Ok(()) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(error) => {
                let response = req.into_response(error.error_response());
                Box::pin(async move { Ok(response.map_into_right_body()) })
            }
        }
    }
}

/// 校验 query string 中的 key
pub fn check_key(expected: &str, query_string: &str) -> Result<(), AppError> {
    if expected.is_empty() {
        return Err(AppError::ConfigError(
            "results key is not configured".to_string(),
        ));
    }

    let provided = web::Query::<ResultsQuery>::from_query(query_string)
        .ok()
        .and_then(|q| q.into_inner().key)
        .unwrap_or_default();

    if provided == expected {
        Ok(())
    } else {
        Err(AppError::AccessDenied)
    }
}
