//! Typed results decoded from the model's JSON answers.

use std::fmt;
use std::num::NonZeroU32;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::task::Task;

/// A result type produced by exactly one [`Task`].
pub trait TaskResult: DeserializeOwned + Send {
    const TASK: Task;

    fn into_output(self) -> TaskOutput;
}

/// A generated commit message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessage {
    pub message: String,
}

/// A generated merge request title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeTitle {
    pub title: String,
}

/// A generated merge request title, description and per-file summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDetails {
    pub title: String,
    pub description: String,
    pub file_summaries: Vec<FileSummary>,
}

/// One-sentence summary of the changes to a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub file: String,
    pub description: String,
}

/// Review feedback for a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    #[serde(rename = "review")]
    pub comments: Vec<ReviewComment>,
}

/// A single review comment anchored to a file and line of the diff.
///
/// `line` refers to the diff that produced it and is not checked against
/// the file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewComment {
    pub file: String,
    pub line: NonZeroU32,
    pub category: ReviewCategory,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
}

impl ReviewComment {
    /// The code snippet, if one was given and is not blank.
    pub fn snippet(&self) -> Option<&str> {
        self.code_snippet
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

/// Kind of issue a review comment raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewCategory {
    #[serde(alias = "security")]
    Security,
    #[serde(alias = "bug")]
    Bug,
    #[serde(alias = "optimization")]
    Optimization,
    #[serde(alias = "improvement")]
    Improvement,
}

impl ReviewCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewCategory::Security => "Security",
            ReviewCategory::Bug => "Bug",
            ReviewCategory::Optimization => "Optimization",
            ReviewCategory::Improvement => "Improvement",
        }
    }
}

impl fmt::Display for ReviewCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running a task selected at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutput {
    CommitMessage(CommitMessage),
    ChangeTitle(ChangeTitle),
    ChangeDetails(ChangeDetails),
    Review(ReviewResult),
}

impl TaskOutput {
    pub fn task(&self) -> Task {
        match self {
            TaskOutput::CommitMessage(_) => Task::GenerateCommitMessage,
            TaskOutput::ChangeTitle(_) => Task::GenerateChangeTitle,
            TaskOutput::ChangeDetails(_) => Task::GenerateChangeDetails,
            TaskOutput::Review(_) => Task::ReviewChanges,
        }
    }
}

impl TaskResult for CommitMessage {
    const TASK: Task = Task::GenerateCommitMessage;

    fn into_output(self) -> TaskOutput {
        TaskOutput::CommitMessage(self)
    }
}

impl TaskResult for ChangeTitle {
    const TASK: Task = Task::GenerateChangeTitle;

    fn into_output(self) -> TaskOutput {
        TaskOutput::ChangeTitle(self)
    }
}

impl TaskResult for ChangeDetails {
    const TASK: Task = Task::GenerateChangeDetails;

    fn into_output(self) -> TaskOutput {
        TaskOutput::ChangeDetails(self)
    }
}

impl TaskResult for ReviewResult {
    const TASK: Task = Task::ReviewChanges;

    fn into_output(self) -> TaskOutput {
        TaskOutput::Review(self)
    }
}
