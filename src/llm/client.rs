//! The completion service seam between the pipeline and the network.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::PipelineError;

/// A single schema-constrained completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub schema_name: &'static str,
    pub schema: Value,
}

/// Trait for sending completion requests.
///
/// This abstraction allows replacing the HTTP client in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Send `request` and return the content of the model's answer.
    async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<String, PipelineError>;
}
