//! Request/response schemas and errors for the answer client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoded_image::{DataUriError, EncodedImage};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by the answer client.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The request was rejected before anything was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] DataUriError),

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request failed or timed out.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider response envelope could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The model's output did not match the answer schema.
    #[error("model output does not match the answer schema: {0}")]
    Schema(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// SCHEMAS
// =============================================================================

/// Input to a solve call: one drawing as a data URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    /// A drawing of a math expression or question, as a data URI that must
    /// include a MIME type and use base64 encoding:
    /// `data:<mimetype>;base64,<encoded_data>`.
    pub photo_data_uri: String,
}

impl SolveRequest {
    pub fn new(photo_data_uri: impl Into<String>) -> Self {
        Self {
            photo_data_uri: photo_data_uri.into(),
        }
    }

    /// Check the payload shape and that it carries an image.
    ///
    /// # Errors
    ///
    /// Returns a [`DataUriError`] for empty, malformed or non-image payloads.
    pub fn validate(&self) -> Result<EncodedImage, DataUriError> {
        let image = EncodedImage::parse(&self.photo_data_uri)?;
        if !image.is_image() {
            return Err(DataUriError::NotAnImage(image.mime_type().to_owned()));
        }
        Ok(image)
    }
}

impl From<&EncodedImage> for SolveRequest {
    fn from(image: &EncodedImage) -> Self {
        Self::new(image.to_data_uri())
    }
}

/// Output of a solve call: the model's answer as opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolveResponse {
    /// The solved result of the expression or answer to the question.
    pub result: String,
}

impl SolveResponse {
    /// Parse model output against the answer schema.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Schema`] unless the text is a JSON object with
    /// exactly one string field `result`.
    pub fn from_model_output(text: &str) -> Result<Self, SolveError> {
        serde_json::from_str(text.trim()).map_err(|e| SolveError::Schema(e.to_string()))
    }
}
