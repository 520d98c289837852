//! Prompt construction, the completion service and typed result decoding.

pub mod client;
pub mod openai;
pub mod pipeline;
pub mod prompt;
pub mod task;
pub mod types;

pub use client::{CompletionRequest, CompletionService};
pub use openai::OpenAiClient;
pub use pipeline::{PromptPipeline, TEMPERATURE, decode};
pub use prompt::render_prompt;
pub use task::Task;
pub use types::{
    ChangeDetails, ChangeTitle, CommitMessage, FileSummary, ReviewCategory, ReviewComment,
    ReviewResult, TaskOutput, TaskResult,
};
