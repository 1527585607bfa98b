//! Natural-language explanations from a hosted generative model.
//!
//! The calculation never depends on this module: any failure here is
//! reported next to a successful numeric result, not instead of it.

use std::time::Duration;

use async_trait::async_trait;
use rfcalc_core::config::ExplainerConfig;
use rfcalc_core::Scenario;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest slice of an upstream error body kept in messages.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExplainError {
    #[error("explanation service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("malformed explanation response: {0}")]
    MalformedResponse(String),
}

/// A prompt plus the scenario it describes, when there is one.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainRequest {
    pub scenario: Option<Scenario>,
    pub prompt: String,
}

impl ExplainRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            scenario: None,
            prompt: prompt.into(),
        }
    }

    pub fn for_scenario(scenario: Scenario, prompt: impl Into<String>) -> Self {
        Self {
            scenario: Some(scenario),
            prompt: prompt.into(),
        }
    }
}

/// Turns a prompt into explanatory text.
#[async_trait]
pub trait Explainer: Send + Sync {
    async fn explain(&self, request: &ExplainRequest) -> Result<String, ExplainError>;

    fn name(&self) -> &str;
}

/// Used when explanations are switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledExplainer;

#[async_trait]
impl Explainer for DisabledExplainer {
    async fn explain(&self, _request: &ExplainRequest) -> Result<String, ExplainError> {
        Err(ExplainError::ServiceUnavailable(
            "explanations are disabled".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Client for a `generateContent`-style endpoint.
///
/// Posts `{"contents":[{"parts":[{"text": prompt}]}]}` with the key as the
/// `key` query parameter and returns `candidates[0].content.parts[0].text`.
#[derive(Debug, Clone)]
pub struct GeminiExplainer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl GeminiExplainer {
    pub fn new(config: &ExplainerConfig) -> Result<Self, ExplainError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| {
                ExplainError::ServiceUnavailable(format!("failed to create HTTP client: {e}"))
            })?;

        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl Explainer for GeminiExplainer {
    async fn explain(&self, request: &ExplainRequest) -> Result<String, ExplainError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ExplainError::ServiceUnavailable("API key is missing".to_string()))?;

        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart {
                    text: &request.prompt,
                }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| ExplainError::ServiceUnavailable(format!("request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ExplainError::ServiceUnavailable(format!("read failed: {e}")))?;

        if !status.is_success() {
            return Err(ExplainError::ServiceUnavailable(format!(
                "HTTP {status}: {}",
                truncate(&text, MAX_ERROR_BODY)
            )));
        }

        parse_generated_text(&text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Pull the first candidate's first text part out of a response body.
pub fn parse_generated_text(body: &str) -> Result<String, ExplainError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| ExplainError::MalformedResponse(e.to_string()))?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| {
            ExplainError::MalformedResponse(format!(
                "no candidate text in {}",
                truncate(body, MAX_ERROR_BODY)
            ))
        })
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: "hello" }],
            }],
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v, serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]}));
    }

    #[test]
    fn test_parse_generated_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"OFDM splits..."}],"role":"model"}}]}"#;
        assert_eq!(parse_generated_text(body).unwrap(), "OFDM splits...");
    }

    #[test]
    fn test_parse_rejects_missing_candidates() {
        for body in [
            r#"{"candidates":[]}"#,
            r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#,
            r#"{"candidates":[{"content":{"parts":[]}}]}"#,
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
        ] {
            assert!(matches!(
                parse_generated_text(body),
                Err(ExplainError::MalformedResponse(_))
            ));
        }
        assert!(matches!(
            parse_generated_text("<html>"),
            Err(ExplainError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("km²km²", 3), "km²");
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let config = ExplainerConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        let explainer = GeminiExplainer::new(&config).unwrap();
        assert!(!explainer.has_key());
        let err = explainer.explain(&ExplainRequest::new("hi")).await.unwrap_err();
        assert_eq!(
            err,
            ExplainError::ServiceUnavailable("API key is missing".to_string())
        );
    }

    #[tokio::test]
    async fn test_disabled_explainer() {
        let err = DisabledExplainer
            .explain(&ExplainRequest::for_scenario(Scenario::Ofdm, "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExplainError::ServiceUnavailable(_)));
        assert_eq!(DisabledExplainer.name(), "disabled");
    }
}
