//! Diff collection and commit action via the git command-line tool.

pub mod client;
pub mod diff;

pub use client::{GitCli, VersionControl, fetch_diff};
pub use diff::{CONTEXT_LINES, Diff, DiffMode};
