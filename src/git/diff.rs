//! Diff text and the modes it can be collected in.

use std::fmt;

/// Lines of surrounding context requested for every diff.
pub const CONTEXT_LINES: u32 = 50;

/// A unified diff as produced by git. Empty means "no changes".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff(String);

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Diff {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Diff {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which unit of change to collect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffMode {
    /// Changes staged in the index.
    Staged,
    /// Staged and unstaged changes against HEAD.
    Full,
    /// Changes on the current branch since it diverged from the named reference.
    Against(String),
    /// Changes on the current branch since it diverged from its upstream.
    Upstream,
}

impl DiffMode {
    /// Human-readable description used in messages.
    pub fn describe(&self) -> String {
        match self {
            DiffMode::Staged => "staged changes".to_string(),
            DiffMode::Full => "working tree changes".to_string(),
            DiffMode::Against(reference) => format!("changes against {}", reference),
            DiffMode::Upstream => "changes against upstream".to_string(),
        }
    }
}
