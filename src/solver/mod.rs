//! Answer client: sends a drawing to a vision model and returns its answer.
//!
//! The model is reached through the [`VisionModel`] trait so tests can stub
//! it. [`GeminiModel`] is the production implementation.

pub mod config;
pub mod gemini;
pub mod types;

use log::{info, warn};

use crate::encoded_image::EncodedImage;
use config::SolverConfig;
pub use gemini::GeminiModel;
pub use types::{SolveError, SolveRequest, SolveResponse};

/// Fixed instruction sent with every drawing.
pub const SOLVE_INSTRUCTION: &str = "You are an expert problem solver. You will be given an image of a \
handwritten math expression or question. Interpret the handwritten content, solve it or answer it, \
and return the final result as text in the `result` field.";

// =============================================================================
// MODEL TRAIT
// =============================================================================

/// A vision-capable completion service. Enables mocking in tests.
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait VisionModel: Send + Sync {
    /// Send one instruction plus one image and return the model's raw text.
    ///
    /// # Errors
    ///
    /// Returns a [`SolveError`] on transport failure, a non-success status or
    /// an unreadable response envelope.
    async fn generate(&self, instruction: &str, image: &EncodedImage) -> Result<String, SolveError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct SolverClient<M> {
    model: M,
}

impl SolverClient<GeminiModel> {
    /// Build a Gemini-backed client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, SolveError> {
        Self::from_config(SolverConfig::from_env()?)
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: SolverConfig) -> Result<Self, SolveError> {
        info!("Answer client configured: {:?}", config);
        Ok(Self::new(GeminiModel::new(config)?))
    }
}

impl<M: VisionModel> SolverClient<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run one request/response cycle.
    ///
    /// The payload is validated before anything is sent. No retries: the
    /// first failure is returned as is.
    ///
    /// # Errors
    ///
    /// [`SolveError::InvalidRequest`] for a malformed payload, the model's
    /// error for a failed call, [`SolveError::Schema`] when the model's output
    /// is not `{"result": "<text>"}`.
    pub async fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, SolveError> {
        let image = request.validate().inspect_err(|e| warn!("Rejected solve request: {}", e))?;

        let text = self.model.generate(SOLVE_INSTRUCTION, &image).await?;
        let response = SolveResponse::from_model_output(&text)?;
        info!("Model answered ({} chars)", response.result.len());
        Ok(response)
    }
}
