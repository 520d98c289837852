//! Prompt pipeline: diff in, typed result out, one round trip.

use tracing::debug;

use crate::config::Config;
use crate::error::PipelineError;
use crate::git::Diff;

use super::client::{CompletionRequest, CompletionService};
use super::prompt::render_prompt;
use super::task::Task;
use super::types::{
    ChangeDetails, ChangeTitle, CommitMessage, ReviewResult, TaskOutput, TaskResult,
};

/// Sampling temperature for every request. Kept low for repeatable output.
pub const TEMPERATURE: f32 = 0.3;

/// Renders prompts, calls the completion service and decodes its answers.
pub struct PromptPipeline<S> {
    service: S,
    api_key: Option<String>,
    api_key_env: String,
    model: Option<String>,
}

impl<S: CompletionService> PromptPipeline<S> {
    pub fn new(service: S, config: &Config) -> Self {
        Self {
            service,
            api_key: config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            api_key_env: config.api_key_env.clone(),
            model: config.model.clone(),
        }
    }

    /// Model used for `task`: the configured override, else the task default.
    pub fn model_for(&self, task: Task) -> &str {
        self.model.as_deref().unwrap_or(task.default_model())
    }

    /// Build the request for `task` without sending it.
    pub fn request_for(&self, task: Task, diff: &Diff) -> CompletionRequest {
        CompletionRequest {
            model: self.model_for(task).to_string(),
            prompt: render_prompt(task, diff),
            temperature: TEMPERATURE,
            schema_name: task.schema_name(),
            schema: task.schema(),
        }
    }

    /// Generate the result type `T` for `diff`.
    ///
    /// Fails with [`PipelineError::EmptyDiff`] or
    /// [`PipelineError::MissingCredentials`] before any request is made.
    pub async fn generate<T: TaskResult>(&self, diff: &Diff) -> Result<T, PipelineError> {
        let task = T::TASK;

        if diff.is_empty() {
            return Err(PipelineError::EmptyDiff);
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PipelineError::MissingCredentials(self.api_key_env.clone()))?;

        let request = self.request_for(task, diff);

        debug!(
            task = %task,
            model = %request.model,
            schema = request.schema_name,
            "Prompt length: {} chars",
            request.prompt.len()
        );

        let content = self.service.complete(api_key, &request).await?;

        decode::<T>(&content)
    }

    /// Run a task chosen at runtime.
    pub async fn run(&self, task: Task, diff: &Diff) -> Result<TaskOutput, PipelineError> {
        let output = match task {
            Task::GenerateCommitMessage => self.generate::<CommitMessage>(diff).await?.into_output(),
            Task::GenerateChangeTitle => self.generate::<ChangeTitle>(diff).await?.into_output(),
            Task::GenerateChangeDetails => self.generate::<ChangeDetails>(diff).await?.into_output(),
            Task::ReviewChanges => self.generate::<ReviewResult>(diff).await?.into_output(),
        };
        Ok(output)
    }
}

/// Decode a model answer into `T`, with no recovery for missing fields.
pub fn decode<T: TaskResult>(content: &str) -> Result<T, PipelineError> {
    serde_json::from_str(content).map_err(|e| {
        debug!("Failed to parse response as {}: {}", T::TASK.schema_name(), e);
        debug!("Raw response: {}", content);
        PipelineError::SchemaViolation {
            schema: T::TASK.schema_name(),
            detail: e.to_string(),
        }
    })
}
