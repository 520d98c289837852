//! Git queries and the commit action, run through the system `git` binary.
//!
//! All operations shell out with `std::process::Command`, inheriting the
//! user's git config. Each call is bound to the working directory the
//! [`GitCli`] was created for.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::{Command, Output};

use tracing::debug;

use crate::error::GitError;

use super::diff::{CONTEXT_LINES, Diff, DiffMode};

/// Object id of the empty tree, the diff base before the first commit.
const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Version control operations the assistant depends on.
///
/// One method per diff mode plus the commit action, the current-branch
/// query and the repository check. This abstraction allows replacing git
/// with canned diffs in tests.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl {
    /// Fail with [`GitError::NotARepository`] unless inside a working tree.
    fn ensure_repository(&self) -> Result<(), GitError>;

    /// Diff of the changes staged in the index.
    fn staged_diff(&self) -> Result<Diff, GitError>;

    /// Diff of staged and unstaged changes against HEAD.
    fn full_diff(&self) -> Result<Diff, GitError>;

    /// Diff of the current branch against the merge base with `reference`.
    fn diff_against(&self, reference: &str) -> Result<Diff, GitError>;

    /// Diff of the current branch against the merge base with its upstream.
    fn diff_against_upstream(&self) -> Result<Diff, GitError>;

    /// Commit the staged changes with `message`, unmodified.
    fn commit(&self, message: &str) -> Result<(), GitError>;

    /// Name of the checked-out branch (empty when HEAD is detached).
    fn current_branch(&self) -> Result<String, GitError>;
}

/// Collect the diff for `mode`, after checking that we are inside a repository.
///
/// An empty diff is returned as-is; deciding what "no changes" means is up
/// to the caller.
pub fn fetch_diff<V>(vcs: &V, mode: &DiffMode) -> Result<Diff, GitError>
where
    V: VersionControl + ?Sized,
{
    vcs.ensure_repository()?;

    let diff = match mode {
        DiffMode::Staged => vcs.staged_diff()?,
        DiffMode::Full => vcs.full_diff()?,
        DiffMode::Against(reference) => vcs.diff_against(reference)?,
        DiffMode::Upstream => vcs.diff_against_upstream()?,
    };

    debug!(
        mode = %mode.describe(),
        bytes = diff.as_str().len(),
        "Collected diff"
    );

    Ok(diff)
}

/// [`VersionControl`] backed by the `git` command-line tool.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Check that a `git` executable is reachable on PATH.
    pub fn check_installed() -> Result<(), GitError> {
        which::which("git").map(|_| ()).map_err(|_| GitError::NotInstalled {
            operation: "locate the git executable".to_string(),
        })
    }

    /// Whether the working directory is inside a git working tree.
    ///
    /// A non-zero exit from git means "no"; only a failure to run git at all
    /// is an error.
    pub fn is_repository(&self) -> Result<bool, GitError> {
        let output = self.spawn(
            &["rev-parse", "--is-inside-work-tree"],
            "check for a git repository",
        )?;

        Ok(output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true")
    }

    /// Whether HEAD points at a commit. False on an unborn branch.
    fn has_head(&self) -> Result<bool, GitError> {
        let output = self.spawn(&["rev-parse", "--verify", "-q", "HEAD"], "resolve HEAD")?;
        Ok(output.status.success())
    }

    /// Run `git diff` with the shared context width and `extra` arguments.
    fn diff(&self, extra: &[&str], operation: &str) -> Result<Diff, GitError> {
        let context = format!("-U{}", CONTEXT_LINES);
        let mut args = vec!["diff", context.as_str(), "--no-color", "--no-ext-diff"];
        args.extend_from_slice(extra);

        self.stdout(&args, operation).map(Diff::from)
    }

    /// Run a git command and return its trimmed standard output.
    fn run_git(&self, args: &[&str], operation: &str) -> Result<String, GitError> {
        self.stdout(args, operation).map(|out| out.trim().to_string())
    }

    /// Run a git command and return its standard output untouched.
    fn stdout(&self, args: &[&str], operation: &str) -> Result<String, GitError> {
        let output = self.spawn(args, operation)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::NonZeroExit {
                operation: operation.to_string(),
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn spawn(&self, args: &[&str], operation: &str) -> Result<Output, GitError> {
        debug!(operation, ?args, workdir = %self.workdir.display(), "Running git");

        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound if self.workdir.is_dir() => GitError::NotInstalled {
                    operation: operation.to_string(),
                },
                _ => GitError::SpawnFailed {
                    operation: operation.to_string(),
                    source: e,
                },
            })
    }
}

impl VersionControl for GitCli {
    fn ensure_repository(&self) -> Result<(), GitError> {
        if self.is_repository()? {
            Ok(())
        } else {
            Err(GitError::NotARepository(self.workdir.clone()))
        }
    }

    fn staged_diff(&self) -> Result<Diff, GitError> {
        self.diff(&["--staged"], "get staged diff")
    }

    fn full_diff(&self) -> Result<Diff, GitError> {
        let base = if self.has_head()? { "HEAD" } else { EMPTY_TREE };
        self.diff(&[base], "get working tree diff")
    }

    fn diff_against(&self, reference: &str) -> Result<Diff, GitError> {
        let range = format!("{}...HEAD", reference);
        let operation = format!("get diff against {}", reference);
        self.diff(&["--end-of-options", &range, "--"], &operation)
    }

    fn diff_against_upstream(&self) -> Result<Diff, GitError> {
        self.diff(
            &["--end-of-options", "@{upstream}...HEAD", "--"],
            "get diff against upstream tracking branch",
        )
    }

    fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run_git(
            &["commit", "--cleanup=verbatim", "-m", message],
            "commit staged changes",
        )
        .map(|_| ())
    }

    fn current_branch(&self) -> Result<String, GitError> {
        self.run_git(&["branch", "--show-current"], "get current branch")
    }
}
