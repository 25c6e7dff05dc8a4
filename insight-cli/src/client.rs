//! HTTP client for the Insight server's analysis endpoint.

use crate::CliResult;
use insight_core::InsightReport;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Default base URL of the Insight server.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Request payload for `POST /analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyzeRequest {
    /// Repository identifiers.
    pub repos: Vec<String>,
    /// Optional question guiding the summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: String,
}

/// Submits analysis requests to a server.
pub trait AnalyzeClient {
    /// Send the request and decode the report.
    fn analyze<'a>(
        &'a self,
        server_url: &'a str,
        request: &'a AnalyzeRequest,
    ) -> Pin<Box<dyn Future<Output = CliResult<InsightReport>> + Send + 'a>>;
}

/// Reqwest-backed analysis client.
#[cfg_attr(test, allow(dead_code))]
pub struct ReqwestAnalyzeClient {
    client: Client,
}

impl ReqwestAnalyzeClient {
    /// Build a new reqwest analysis client.
    #[cfg_attr(test, allow(dead_code))]
    pub fn new() -> CliResult<Self> {
        let client = Client::builder().user_agent("insight-cli").build()?;
        Ok(Self { client })
    }
}

impl AnalyzeClient for ReqwestAnalyzeClient {
    fn analyze<'a>(
        &'a self,
        server_url: &'a str,
        request: &'a AnalyzeRequest,
    ) -> Pin<Box<dyn Future<Output = CliResult<InsightReport>> + Send + 'a>> {
        Box::pin(post_analyze(&self.client, server_url, request))
    }
}

async fn post_analyze(
    client: &Client,
    server_url: &str,
    request: &AnalyzeRequest,
) -> CliResult<InsightReport> {
    let url = format!("{server_url}/analyze");
    let response = client.post(url).json(request).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(format!("analysis failed ({status}): {}", error_detail(&body)).into());
    }
    let report = response.json::<InsightReport>().await?;
    Ok(report)
}

/// Extract the `detail` message from an error body, falling back to the raw text.
pub fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|error| error.detail)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Normalize the server URL for consistent API requests.
pub fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Validate inputs and submit an analysis request through `client`.
pub async fn request_analysis<C: AnalyzeClient>(
    client: &C,
    server_url: &str,
    repos: Vec<String>,
    query: Option<String>,
) -> CliResult<InsightReport> {
    if repos.is_empty() {
        return Err("no repositories provided".into());
    }
    let server_url = normalize_server_url(server_url)?;
    let query = query
        .map(|query| query.trim().to_string())
        .filter(|query| !query.is_empty());
    let request = AnalyzeRequest { repos, query };
    client.analyze(&server_url, &request).await
}
