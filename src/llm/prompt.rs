//! Prompt templates for each task.
//!
//! Templates are plain text with a single [`DIFF_PLACEHOLDER`]. The diff is
//! substituted verbatim: it is local content produced by git, so it is not
//! escaped or truncated.

use crate::git::Diff;

use super::task::Task;

/// Marker replaced by the diff text.
pub const DIFF_PLACEHOLDER: &str = "{diff}";

/// Render the prompt for `task` with `diff` substituted in.
pub fn render_prompt(task: Task, diff: &Diff) -> String {
    task.template().replacen(DIFF_PLACEHOLDER, diff.as_str(), 1)
}

pub const COMMIT_MESSAGE_TEMPLATE: &str = r#"You are a senior software engineer writing a Git commit message that follows the Conventional Commits specification.

## Approach
- Treat the diff as one logical unit of work.
- Pick the type from the most significant effect of the change. New user-facing behaviour is `feat` even if the change also refactors code.
- The diff already shows HOW the code changed. The body explains WHY: the problem being solved, the previous behaviour, or the motivation.

## Header Rules (STRICT)
- Format: `type(scope): description`
- Type: one of feat, fix, improvement, docs, style, refactor, perf, test, build, ci, ops, chore, revert, security, deprecate
- Scope (optional): a noun naming the affected area, e.g. `(api)`, `(auth)`
- Description: imperative mood ("add", "fix", "remove"), starts lowercase, NO period at the end
- A breaking change appends `!` after the type/scope, e.g. `feat(api)!: drop v1 routes`

## Body Rules
- Separated from the header by exactly one blank line
- Wrap lines at 72 characters
- Bullet points with `-` are allowed
- Omit the body for trivial changes

## Footer Rules
- Separated from the body by exactly one blank line
- `BREAKING CHANGE: <impact and migration>` for breaking changes
- Issue references such as `Fixes: #123` or `Closes: JIRA-456`

## Constraints
- Professional, direct tone
- No emojis

## Output Format
Respond with ONLY a JSON object with a single key "message" whose value is the complete commit message (header, body and footers as applicable):
{"message": "type(scope): description\n\nWhy this change was made."}

## Diff
{diff}
"#;

pub const CHANGE_TITLE_TEMPLATE: &str = r#"You are a senior software engineer writing the title of a merge request.

## Title Rules (STRICT)
- Format: `type(scope): subject` (Conventional Commits)
- Type: one of feat, fix, improvement, refactor, perf, docs, style, test, build, ci, ops, chore, revert, security, deprecate
- Scope (optional): derive it from the file paths in the diff and name the feature or area affected (e.g. `experiments`, `auth`, `billing`). Avoid generic scopes like `server` or `client` when a more specific one fits.
- Subject: short, imperative mood, describing the most impactful change. Prefer a concrete verb over "update" or "improve".

## Constraints
- Professional, direct tone
- No emojis
- Do not write phrases like "This PR" or "This commit"

## Output Format
Respond with ONLY a JSON object with a single key "title":
{"title": "feat(auth): add two-factor login"}

## Diff
{diff}
"#;

pub const CHANGE_DETAILS_TEMPLATE: &str = r#"You are a senior software engineer preparing a merge request for review.

Analyze the diff and produce:
- "title": a Conventional Commits style title (`type(scope): subject`, imperative mood, no period)
- "description": a detailed description of what changed and why, written for reviewers
- "fileSummaries": one entry per changed file, in the order the files appear in the diff, each with
  - "file": the file path
  - "description": a one-sentence summary of the changes in that file

## Constraints
- Professional, direct tone
- No emojis

## Output Format
Respond with ONLY a JSON object:
{"title": "...", "description": "...", "fileSummaries": [{"file": "path/to/file", "description": "..."}]}

## Diff
{diff}
"#;

pub const REVIEW_TEMPLATE: &str = r#"You are an expert code reviewer. Review the diff and give constructive, actionable feedback.

## Review Focus
- Security: potential vulnerabilities or unsafe handling of input
- Bug: logic errors, missing checks, incorrect edge-case behaviour
- Optimization: performance, memory use or efficiency
- Improvement: structure, readability or maintainability

## Constraints
- No praise or positive affirmations
- Only comment where there is a clear issue or room for improvement. Skip files and sections with nothing to say.
- An empty list is a valid answer

## Output Format
Respond with ONLY a JSON object with a single key "review", a list of items, each with:
- "file": the file path
- "line": the line number in the new version of the file (a positive integer)
- "category": one of "Security", "Bug", "Optimization", "Improvement"
- "comment": what the issue is and how to fix it
- "codeSnippet": the relevant code, or null when there is none

{"review": [{"file": "src/lib.rs", "line": 42, "category": "Bug", "comment": "...", "codeSnippet": "..."}]}

## Diff
{diff}
"#;
