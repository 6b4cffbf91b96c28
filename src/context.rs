//! Written commentary on a simulation result from a hosted text-generation model.
//!
//! The commentary is optional. A missing key or a failed request turns into
//! a short notice for the user; the result it describes is never touched.

use crate::engine::SimulationResult;
use crate::error::ContextError;
use crate::indicators::Indicator;
use serde::Deserialize;
use std::env;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Env vars checked for an API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

pub const DISABLED_NOTICE: &str =
    "AI analysis is disabled. Set GEMINI_API_KEY to get AI-powered context.";
pub const ERROR_NOTICE: &str = "There was an error generating the analysis. This could be due to \
     a configuration issue or network problem. Run with -v for details.";

/// Something that can describe a simulation result in prose.
pub trait ContextService {
    fn describe(&self, result: &SimulationResult) -> Result<String, ContextError>;
}

/// Prompt sent to the model for `result`.
pub fn build_prompt(result: &SimulationResult) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "Analyze the following economic scenario based on a Monte Carlo simulation \
         and provide a qualitative context.\n",
    );
    prompt.push_str("The simulation produced the following results:\n");
    prompt.push_str(&format!(
        "- Estimated Recession Probability: {:.1}%\n\n",
        result.recession_probability * 100.0
    ));

    prompt.push_str("Average Simulated Indicators:\n");
    for indicator in Indicator::ALL {
        prompt.push_str(&format!(
            "- {}: {}\n",
            indicator.label(),
            indicator.format_value(result.average_indicators.get(indicator))
        ));
    }

    prompt.push_str(
        "\nBased on these indicators, please provide a brief analysis covering the \
         following points in markdown format:\n\
         1. **Scenario Analysis:** Briefly describe the overall economic picture these \
         numbers paint. Is it a healthy economy, one on the brink, or one in a clear downturn?\n\
         2. **Primary Drivers:** Identify which indicator(s) are most likely contributing \
         to the recession risk, such as an inverted yield curve, labor market weakness, \
         monetary policy tightening, or weak leading indicators.\n\
         3. **Potential Characteristics:** Describe what a recession with these \
         characteristics might feel like for the average person (jobs, cost of living, \
         borrowing costs).\n\n\
         Keep the analysis concise, clear, and easy for a non-economist to understand.\n",
    );
    prompt
}

/// First non-empty API key from [`API_KEY_VARS`].
pub fn api_key_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
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
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: Option<String>,
}

/// Join the text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String, ContextError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ContextError::EmptyResponse);
    }
    Ok(text)
}

/// Blocking client for the Generative Language `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: API_BASE.to_string(),
        }
    }

    /// Client keyed from the environment. Unconfigured clients answer
    /// every request with [`ContextError::MissingApiKey`].
    pub fn from_env() -> Self {
        Self {
            api_key: api_key_from_env(),
            model: DEFAULT_MODEL.to_string(),
            base_url: API_BASE.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn request_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl ContextService for GeminiClient {
    fn describe(&self, result: &SimulationResult) -> Result<String, ContextError> {
        let api_key = self.api_key.as_deref().ok_or(ContextError::MissingApiKey)?;

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": build_prompt(result) }] }]
        });

        tracing::debug!(model = %self.model, "requesting commentary");
        let response: GenerateResponse = ureq::post(&self.request_url())
            .set("x-goog-api-key", api_key)
            .set("User-Agent", "recession-sim")
            .timeout(REQUEST_TIMEOUT)
            .send_json(body)
            .map_err(|e| ContextError::Http(e.to_string()))?
            .into_json()
            .map_err(|e| ContextError::Decode(e.to_string()))?;

        extract_text(response)
    }
}

/// Commentary text, or a notice explaining why there is none.
pub fn describe_or_notice<C: ContextService + ?Sized>(
    service: &C,
    result: &SimulationResult,
) -> String {
    match service.describe(result) {
        Ok(text) => text,
        Err(ContextError::MissingApiKey) => DISABLED_NOTICE.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "commentary request failed");
            ERROR_NOTICE.to_string()
        }
    }
}
