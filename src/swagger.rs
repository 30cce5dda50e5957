use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::location::get_locations,
        handlers::vote::submit_vote,
        handlers::results::get_results,
        handlers::results::export_results_csv,
    ),
    components(
        schemas(
            LocationResponse,
            LocationListResponse,
            SelectionInput,
            SubmitVoteRequest,
            SubmitVoteResponse,
            ResultRow,
            ResultsResponse,
            ApiError,
        )
    ),
    tags(
        (name = "voting", description = "Location catalog and vote submission API"),
        (name = "results", description = "Aggregated results API (shared key required)"),
    ),
    info(
        title = "Stembus Backend API",
        version = "1.0.0",
        description = "Top-3 location voting REST API documentation"
    ),
    servers(
        (url = "/api", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
