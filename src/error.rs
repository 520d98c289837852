//! Error types for gitai modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from git subprocess operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository: {0}. Run gitai from within a git working tree.")]
    NotARepository(PathBuf),

    #[error("git executable not found (needed to {operation}). Install git and make sure it is on PATH.")]
    NotInstalled { operation: String },

    #[error("Failed to run git to {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git failed to {operation} ({}): {stderr}",
            code.map_or("terminated by signal".to_string(), |c| format!("exit code {c}")))]
    NonZeroExit {
        operation: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl GitError {
    /// The operation that was being attempted, if this is a process failure.
    pub fn operation(&self) -> Option<&str> {
        match self {
            GitError::NotARepository(_) => None,
            GitError::NotInstalled { operation }
            | GitError::SpawnFailed { operation, .. }
            | GitError::NonZeroExit { operation, .. } => Some(operation),
        }
    }
}

/// Errors from the prompt pipeline and the completion service.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No changes found (diff is empty)")]
    EmptyDiff,

    #[error("API key not found. Set the {0} environment variable")]
    MissingCredentials(String),

    #[error("Request to completion service failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Completion service returned HTTP {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Completion service returned a malformed response: {0}")]
    MalformedResponse(String),

    #[error("Model refused to answer: {0}")]
    Refused(String),

    #[error("Response did not match the {schema} schema: {detail}")]
    SchemaViolation { schema: &'static str, detail: String },
}

impl PipelineError {
    /// Whether this error came from the network round trip rather than from
    /// local validation or decoding.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            PipelineError::Request(_)
                | PipelineError::Service { .. }
                | PipelineError::MalformedResponse(_)
                | PipelineError::Refused(_)
        )
    }
}

/// Errors from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid completion service URL '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

/// Errors from the assistant workflows, joining git and pipeline failures.
#[derive(Error, Debug)]
pub enum AssistError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl AssistError {
    /// Whether the workflow stopped because there was nothing to describe.
    pub fn is_empty_diff(&self) -> bool {
        matches!(self, AssistError::Pipeline(PipelineError::EmptyDiff))
    }
}
