//! gitai - A CLI tool that turns git diffs into commit messages, merge request text and reviews.
//!
//! # Overview
//!
//! gitai reads a diff from the local repository, renders it into a task-specific
//! prompt, sends one schema-constrained request to an OpenAI-compatible chat
//! completions endpoint and decodes the answer into a typed result. Commit
//! messages can then be applied with `git commit`.

pub mod assistant;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;
pub mod render;

// Re-export commonly used types
pub use assistant::Assistant;
pub use config::Config;
pub use error::{AssistError, ConfigError, GitError, PipelineError};
pub use git::{Diff, DiffMode, GitCli, VersionControl};
pub use llm::{
    ChangeDetails, ChangeTitle, CommitMessage, OpenAiClient, PromptPipeline, ReviewCategory,
    ReviewComment, ReviewResult, Task, TaskOutput,
};
