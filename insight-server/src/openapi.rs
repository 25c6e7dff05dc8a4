//! OpenAPI specification for the Insight server.

use utoipa::OpenApi;

use insight_core::{InsightReport, TrendEntry};

use crate::routes::{AnalyzeRequest, ErrorResponse};

#[derive(OpenApi)]
#[openapi(
    paths(crate::routes::analyze, crate::routes::openapi_json),
    components(schemas(AnalyzeRequest, ErrorResponse, InsightReport, TrendEntry)),
    tags(
        (name = "analysis", description = "Repository analysis"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI specification for the Insight server.
pub struct ApiDoc;
