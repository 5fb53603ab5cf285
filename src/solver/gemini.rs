//! Gemini `generateContent` client.
//!
//! Thin HTTP wrapper. The answer schema is sent as a structured-output
//! `responseSchema`, so the model replies with a JSON object as text.
//! Request building and response parsing are pure for testability.

use log::debug;
use serde::{Deserialize, Serialize};

use super::VisionModel;
use super::config::SolverConfig;
use super::types::SolveError;
use crate::encoded_image::EncodedImage;

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiModel {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiModel {
    /// Build the HTTP client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::HttpClientBuild`] if the client cannot be constructed.
    pub fn new(config: SolverConfig) -> Result<Self, SolveError> {
        let http = build_http(&config)?;
        Ok(Self {
            http,
            api_key: config.api_key,
            model: config.model,
            base_url: config.base_url,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http(config: &SolverConfig) -> Result<reqwest::Client, SolveError> {
    use std::time::Duration;

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeouts.request_secs))
        .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
        .build()
        .map_err(|e| SolveError::HttpClientBuild(e.to_string()))
}

// The browser owns timeouts on the web
#[cfg(target_arch = "wasm32")]
fn build_http(_config: &SolverConfig) -> Result<reqwest::Client, SolveError> {
    reqwest::Client::builder()
        .build()
        .map_err(|e| SolveError::HttpClientBuild(e.to_string()))
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
impl VisionModel for GeminiModel {
    async fn generate(&self, instruction: &str, image: &EncodedImage) -> Result<String, SolveError> {
        let body = build_request(instruction, image);
        debug!("POST {} ({} bytes of image data)", self.endpoint(), image.base64_data().len());

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SolveError::ApiRequest(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SolveError::ApiRequest(e.to_string()))?;

        parse_response(&ensure_success(status, text)?)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
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

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

// =============================================================================
// BUILDING / PARSING
// =============================================================================

fn answer_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "result": {
                "type": "STRING",
                "description": "The solved result of the math expression or the answer to the question."
            }
        },
        "required": ["result"]
    })
}

fn build_request<'a>(instruction: &'a str, image: &'a EncodedImage) -> ApiRequest<'a> {
    ApiRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![
                Part { text: Some(instruction), inline_data: None },
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: image.mime_type(),
                        data: image.base64_data(),
                    }),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: answer_schema(),
        },
    }
}

/// Any 2xx passes the body through; everything else is an API error
fn ensure_success(status: reqwest::StatusCode, body: String) -> Result<String, SolveError> {
    if !status.is_success() {
        return Err(SolveError::ApiResponse {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

/// Extract the text of the first candidate.
fn parse_response(json: &str) -> Result<String, SolveError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| SolveError::ApiParse(e.to_string()))?;

    let Some(candidate) = api.candidates.into_iter().next() else {
        let reason = api
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "unspecified".into());
        return Err(SolveError::ApiParse(format!("no candidates returned (block reason: {reason})")));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unspecified".into());
        return Err(SolveError::ApiParse(format!("candidate has no text (finish reason: {reason})")));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_2xx_status_is_success() {
        for status in [reqwest::StatusCode::OK, reqwest::StatusCode::CREATED, reqwest::StatusCode::ACCEPTED] {
            assert_eq!(ensure_success(status, "{}".into()).unwrap(), "{}");
        }
    }

    #[test]
    fn test_non_2xx_status_keeps_body() {
        let err = ensure_success(reqwest::StatusCode::TOO_MANY_REQUESTS, "slow down".into()).unwrap_err();
        match err {
            SolveError::ApiResponse { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn request_carries_instruction_image_and_schema() {
        let image = EncodedImage::parse("data:image/png;base64,AAAA").unwrap();
        let body = serde_json::to_value(build_request("solve it", &image)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0], serde_json::json!({ "text": "solve it" }));
        assert_eq!(
            body["contents"][0]["parts"][1],
            serde_json::json!({ "inlineData": { "mimeType": "image/png", "data": "AAAA" } })
        );
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["required"][0], "result");
    }

    #[test]
    fn endpoint_includes_model() {
        let config = SolverConfig {
            api_key: "k".into(),
            model: "gemini-test".into(),
            base_url: "https://example.test/v1beta".into(),
            timeouts: Default::default(),
        };
        let model = GeminiModel::new(config).unwrap();
        assert_eq!(model.endpoint(), "https://example.test/v1beta/models/gemini-test:generateContent");
        assert_eq!(model.model(), "gemini-test");
    }

    #[test]
    fn parse_concatenates_text_parts() {
        let json = serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "{\"result\":" }, { "text": " \"42\"}" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 10 }
        })
        .to_string();
        assert_eq!(parse_response(&json).unwrap(), "{\"result\": \"42\"}");
    }

    #[test]
    fn parse_blocked_prompt() {
        let json = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } }).to_string();
        let err = parse_response(&json).unwrap_err();
        assert!(matches!(err, SolveError::ApiParse(ref msg) if msg.contains("SAFETY")));
    }

    #[test]
    fn parse_candidate_without_text() {
        let json = serde_json::json!({ "candidates": [{ "finishReason": "MAX_TOKENS" }] }).to_string();
        let err = parse_response(&json).unwrap_err();
        assert!(matches!(err, SolveError::ApiParse(ref msg) if msg.contains("MAX_TOKENS")));
    }

    #[test]
    fn parse_invalid_json() {
        assert!(matches!(parse_response("not json"), Err(SolveError::ApiParse(_))));
    }
}
