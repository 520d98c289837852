//! Task registry: each task pairs a prompt template with its response schema.

use std::fmt;

use serde_json::{Value, json};

use super::prompt::{
    CHANGE_DETAILS_TEMPLATE, CHANGE_TITLE_TEMPLATE, COMMIT_MESSAGE_TEMPLATE, REVIEW_TEMPLATE,
};

/// The kind of generation requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    GenerateCommitMessage,
    GenerateChangeTitle,
    GenerateChangeDetails,
    ReviewChanges,
}

impl Task {
    pub const ALL: [Task; 4] = [
        Task::GenerateCommitMessage,
        Task::GenerateChangeTitle,
        Task::GenerateChangeDetails,
        Task::ReviewChanges,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Task::GenerateCommitMessage => "commit message",
            Task::GenerateChangeTitle => "change title",
            Task::GenerateChangeDetails => "change details",
            Task::ReviewChanges => "review",
        }
    }

    /// Name the response schema is registered under with the service.
    pub fn schema_name(&self) -> &'static str {
        match self {
            Task::GenerateCommitMessage => "CommitMessage",
            Task::GenerateChangeTitle => "ChangeTitle",
            Task::GenerateChangeDetails => "ChangeDetails",
            Task::ReviewChanges => "ReviewResult",
        }
    }

    /// Prompt template; contains the diff placeholder exactly once.
    pub fn template(&self) -> &'static str {
        match self {
            Task::GenerateCommitMessage => COMMIT_MESSAGE_TEMPLATE,
            Task::GenerateChangeTitle => CHANGE_TITLE_TEMPLATE,
            Task::GenerateChangeDetails => CHANGE_DETAILS_TEMPLATE,
            Task::ReviewChanges => REVIEW_TEMPLATE,
        }
    }

    /// Model used when no override is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            Task::GenerateCommitMessage
            | Task::GenerateChangeTitle
            | Task::GenerateChangeDetails => "gpt-4o",
            Task::ReviewChanges => "gpt-4o-mini",
        }
    }

    /// JSON schema the service must conform its answer to.
    ///
    /// Written for strict mode: every object closes its properties and lists
    /// all of them as required; optional values are nullable instead.
    pub fn schema(&self) -> Value {
        match self {
            Task::GenerateCommitMessage => json!({
                "type": "object",
                "properties": {
                    "message": { "type": "string" }
                },
                "required": ["message"],
                "additionalProperties": false
            }),
            Task::GenerateChangeTitle => json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string" }
                },
                "required": ["title"],
                "additionalProperties": false
            }),
            Task::GenerateChangeDetails => json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "description": { "type": "string" },
                    "fileSummaries": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "file": { "type": "string" },
                                "description": { "type": "string" }
                            },
                            "required": ["file", "description"],
                            "additionalProperties": false
                        }
                    }
                },
                "required": ["title", "description", "fileSummaries"],
                "additionalProperties": false
            }),
            Task::ReviewChanges => json!({
                "type": "object",
                "properties": {
                    "review": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "file": { "type": "string" },
                                "line": { "type": "integer", "minimum": 1 },
                                "category": {
                                    "type": "string",
                                    "enum": ["Security", "Bug", "Optimization", "Improvement"]
                                },
                                "comment": { "type": "string" },
                                "codeSnippet": { "type": ["string", "null"] }
                            },
                            "required": ["file", "line", "category", "comment", "codeSnippet"],
                            "additionalProperties": false
                        }
                    }
                },
                "required": ["review"],
                "additionalProperties": false
            }),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
