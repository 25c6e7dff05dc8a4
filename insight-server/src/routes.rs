//! HTTP handlers for the Insight server.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, error, get, post, web};
use insight_core::{InsightError, InsightReport};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::openapi::ApiDoc;
use crate::service::AnalysisService;

/// Header carrying the per-invocation analysis identifier.
pub const ANALYSIS_ID_HEADER: &str = "x-analysis-id";

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Analysis orchestration service.
    pub analysis: AnalysisService,
}

/// Request payload for an analysis run.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Repository identifiers, typically URLs.
    pub repos: Vec<String>,
    /// Optional free-text question guiding the summary.
    #[serde(default)]
    pub query: Option<String>,
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub detail: String,
}

/// HTTP status for an analysis error.
pub fn error_status(err: &InsightError) -> StatusCode {
    match err {
        InsightError::Input(_) => StatusCode::BAD_REQUEST,
        InsightError::InsufficientInsight { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        InsightError::UpstreamFetch(_) | InsightError::Generation(_) => StatusCode::BAD_GATEWAY,
        InsightError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_detail(err: &InsightError) -> String {
    match err {
        InsightError::InsufficientInsight { .. } => {
            "Failed to generate sufficient insights".to_string()
        }
        other => other.to_string(),
    }
}

/// JSON extractor settings that report malformed bodies as `{"detail": ...}`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        let response = HttpResponse::BadRequest().json(ErrorResponse {
            detail: format!("invalid request body: {err}"),
        });
        error::InternalError::from_response(err, response).into()
    })
}

#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis result", body = InsightReport),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 422, description = "Insufficient insights", body = ErrorResponse),
        (status = 502, description = "Upstream failure", body = ErrorResponse),
        (status = 500, description = "Analysis failed", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/analyze")]
/// Run the analysis pipeline over the submitted repositories.
pub async fn analyze(
    state: web::Data<AppState>,
    payload: web::Json<AnalyzeRequest>,
) -> impl Responder {
    let request = payload.into_inner();
    let analysis_id = Uuid::new_v4();
    let header = (ANALYSIS_ID_HEADER, analysis_id.to_string());
    let analysis = state.analysis.clone();
    let result = web::block(move || {
        analysis.analyze(analysis_id, &request.repos, request.query.as_deref())
    })
    .await;

    match result {
        Ok(Ok(report)) => HttpResponse::Ok().insert_header(header).json(report),
        Ok(Err(err)) => {
            let status = error_status(&err);
            if err.is_client_error() {
                log::warn!("analysis {analysis_id} rejected: {err}");
            }
            HttpResponse::build(status)
                .insert_header(header)
                .json(ErrorResponse {
                    detail: error_detail(&err),
                })
        }
        Err(err) => HttpResponse::InternalServerError()
            .insert_header(header)
            .json(ErrorResponse {
                detail: format!("analysis task failed: {err}"),
            }),
    }
}

#[utoipa::path(
    get,
    path = "/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
