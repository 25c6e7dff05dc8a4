//! Gemini text-generation client.

use insight_core::{DEFAULT_MODEL, InsightError, Result, TextGenerator};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key sent in the `x-goog-api-key` header.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// API base URL.
    pub base_url: String,
}

impl GeminiConfig {
    /// Read `GOOGLE_API_KEY`, `GEMINI_MODEL`, and `GEMINI_API_URL`.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self {
            api_key,
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Blocking Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    /// Build a client from explicit settings.
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Build a client from environment variables.
    pub fn from_env() -> Self {
        Self::new(GeminiConfig::from_env())
    }

    /// Configured model identifier.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(model)
        )
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| InsightError::Generation("GOOGLE_API_KEY is required".to_string()))?;
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .map_err(|err| InsightError::Generation(format!("gemini request failed: {err}")))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(InsightError::Generation(format!(
                "gemini api error ({status}): {body}"
            )));
        }
        let payload: GenerateResponse = response.json().map_err(|err| {
            InsightError::Generation(format!("gemini response decode failed: {err}"))
        })?;
        extract_text(payload)
    }
}

fn extract_text(payload: GenerateResponse) -> Result<String> {
    let candidate = payload
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| InsightError::Generation("gemini response has no candidates".to_string()))?;
    let texts: Vec<String> = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    if texts.is_empty() {
        return Err(InsightError::Generation(
            "gemini response has no text".to_string(),
        ));
    }
    Ok(texts.concat())
}
