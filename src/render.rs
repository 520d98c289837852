//! Plain-text rendering of task results for the terminal.

use crate::llm::{ChangeDetails, ChangeTitle, CommitMessage, ReviewResult, TaskOutput};

const SEPARATOR: &str = "--------------------------------";

/// Render a commit message exactly as generated, with a heading.
pub fn render_commit_message(message: &CommitMessage) -> String {
    format!("Generated commit message:\n{}\n", message.message)
}

pub fn render_title(title: &ChangeTitle) -> String {
    format!("Generated title: {}\n", title.title)
}

/// Render the title, description and one block per file summary.
pub fn render_details(details: &ChangeDetails) -> String {
    let mut out = String::new();
    out.push_str(&format!("Generated title: {}\n", details.title));
    out.push_str(&format!("Generated description:\n{}\n", details.description));
    out.push_str(SEPARATOR);
    out.push('\n');

    for summary in &details.file_summaries {
        out.push_str(&format!("File: {}\n", summary.file));
        out.push_str(&format!("Description: {}\n", summary.description));
        out.push_str(SEPARATOR);
        out.push('\n');
    }

    out
}

/// Render review comments in the order the model returned them.
pub fn render_review(review: &ReviewResult) -> String {
    if review.comments.is_empty() {
        return "No review comments.\n".to_string();
    }

    let mut out = String::from("Review:\n");
    for comment in &review.comments {
        out.push_str(&format!("\nFile: {}:{}\n", comment.file, comment.line));
        out.push_str(&format!("Category: {}\n", comment.category));
        out.push_str(&format!("Comment: {}\n", comment.comment));
        if let Some(snippet) = comment.snippet() {
            out.push_str(&format!("Code snippet:\n```\n{}\n```\n", snippet));
        }
    }

    out
}

pub fn render_output(output: &TaskOutput) -> String {
    match output {
        TaskOutput::CommitMessage(message) => render_commit_message(message),
        TaskOutput::ChangeTitle(title) => render_title(title),
        TaskOutput::ChangeDetails(details) => render_details(details),
        TaskOutput::Review(review) => render_review(review),
    }
}
