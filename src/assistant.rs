//! Assistant workflows: collect a diff, run a task over it, act on the result.

use tracing::{debug, info};

use crate::error::AssistError;
use crate::git::{DiffMode, VersionControl, fetch_diff};
use crate::llm::{CommitMessage, CompletionService, PromptPipeline, Task, TaskOutput, TaskResult};

/// Ties a version control backend to a prompt pipeline.
pub struct Assistant<V, S> {
    vcs: V,
    pipeline: PromptPipeline<S>,
}

impl<V, S> Assistant<V, S>
where
    V: VersionControl,
    S: CompletionService,
{
    pub fn new(vcs: V, pipeline: PromptPipeline<S>) -> Self {
        Self { vcs, pipeline }
    }

    /// Generate `T` from the diff selected by `mode`.
    pub async fn generate<T: TaskResult>(&self, mode: &DiffMode) -> Result<T, AssistError> {
        let diff = fetch_diff(&self.vcs, mode)?;
        debug!(task = %T::TASK, "Running task over {}", mode.describe());
        Ok(self.pipeline.generate::<T>(&diff).await?)
    }

    /// Run a task chosen at runtime over the diff selected by `mode`.
    pub async fn run(&self, task: Task, mode: &DiffMode) -> Result<TaskOutput, AssistError> {
        let diff = fetch_diff(&self.vcs, mode)?;
        Ok(self.pipeline.run(task, &diff).await?)
    }

    /// Commit the staged changes with a generated message, passed to git unmodified.
    pub fn apply_commit(&self, message: &CommitMessage) -> Result<(), AssistError> {
        self.vcs.commit(&message.message)?;
        info!("Committed staged changes");
        Ok(())
    }

    pub fn current_branch(&self) -> Result<String, AssistError> {
        Ok(self.vcs.current_branch()?)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::Config;
    use crate::error::{GitError, PipelineError};
    use crate::git::Diff;
    use crate::git::client::MockVersionControl;
    use crate::llm::client::MockCompletionService;
    use crate::llm::{ChangeTitle, ReviewResult};

    const SAMPLE_DIFF: &str = "diff --git a/main.go b/main.go\n+if x == nil { return }\n";

    fn config() -> Config {
        Config::from_lookup(|name| match name {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn repo_with_staged(diff: &'static str) -> MockVersionControl {
        let mut vcs = MockVersionControl::new();
        vcs.expect_ensure_repository().returning(|| Ok(()));
        vcs.expect_staged_diff().returning(move || Ok(Diff::from(diff)));
        vcs
    }

    #[tokio::test]
    async fn test_generate_commit_then_apply_passes_message_unmodified() {
        let mut vcs = repo_with_staged(SAMPLE_DIFF);
        vcs.expect_commit()
            .withf(|message| message == "fix: guard against nil")
            .times(1)
            .returning(|_| Ok(()));

        let mut service = MockCompletionService::new();
        service
            .expect_complete()
            .times(1)
            .returning(|_, _| Ok(r#"{"message":"fix: guard against nil"}"#.to_string()));

        let assistant = Assistant::new(vcs, PromptPipeline::new(service, &config()));
        let message: CommitMessage = assistant.generate(&DiffMode::Staged).await.unwrap();
        assistant.apply_commit(&message).unwrap();
    }

    #[tokio::test]
    async fn test_empty_staged_diff_stops_before_service() {
        let mut vcs = repo_with_staged("");
        vcs.expect_commit().never();

        let mut service = MockCompletionService::new();
        service.expect_complete().never();

        let assistant = Assistant::new(vcs, PromptPipeline::new(service, &config()));
        let err = assistant
            .generate::<CommitMessage>(&DiffMode::Staged)
            .await
            .unwrap_err();
        assert!(err.is_empty_diff());
    }

    #[tokio::test]
    async fn test_not_a_repository_stops_before_diff() {
        let mut vcs = MockVersionControl::new();
        vcs.expect_ensure_repository()
            .returning(|| Err(GitError::NotARepository(PathBuf::from("/tmp/nowhere"))));
        vcs.expect_staged_diff().never();
        vcs.expect_diff_against().never();

        let mut service = MockCompletionService::new();
        service.expect_complete().never();

        let assistant = Assistant::new(vcs, PromptPipeline::new(service, &config()));
        let result = assistant
            .run(Task::GenerateChangeTitle, &DiffMode::Against("master".to_string()))
            .await;
        assert!(matches!(
            result,
            Err(AssistError::Git(GitError::NotARepository(_)))
        ));
    }

    #[tokio::test]
    async fn test_title_uses_reference_diff() {
        let mut vcs = MockVersionControl::new();
        vcs.expect_ensure_repository().returning(|| Ok(()));
        vcs.expect_diff_against()
            .withf(|reference| reference == "main")
            .times(1)
            .returning(|_| Ok(Diff::from(SAMPLE_DIFF)));

        let mut service = MockCompletionService::new();
        service
            .expect_complete()
            .withf(|_, request| request.prompt.contains(SAMPLE_DIFF))
            .times(1)
            .returning(|_, _| Ok(r#"{"title":"fix(parser): guard against nil input"}"#.to_string()));

        let assistant = Assistant::new(vcs, PromptPipeline::new(service, &config()));
        let title: ChangeTitle = assistant
            .generate(&DiffMode::Against("main".to_string()))
            .await
            .unwrap();
        assert_eq!(title.title, "fix(parser): guard against nil input");
    }

    #[tokio::test]
    async fn test_review_over_upstream_diff() {
        let mut vcs = MockVersionControl::new();
        vcs.expect_ensure_repository().returning(|| Ok(()));
        vcs.expect_diff_against_upstream()
            .times(1)
            .returning(|| Ok(Diff::from(SAMPLE_DIFF)));

        let mut service = MockCompletionService::new();
        service
            .expect_complete()
            .returning(|_, _| Ok(r#"{"review":[]}"#.to_string()));

        let assistant = Assistant::new(vcs, PromptPipeline::new(service, &config()));
        let review: ReviewResult = assistant.generate(&DiffMode::Upstream).await.unwrap();
        assert!(review.comments.is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_error_is_wrapped() {
        let vcs = repo_with_staged(SAMPLE_DIFF);

        let mut service = MockCompletionService::new();
        service
            .expect_complete()
            .returning(|_, _| Ok("not json".to_string()));

        let assistant = Assistant::new(vcs, PromptPipeline::new(service, &config()));
        let result = assistant.run(Task::GenerateCommitMessage, &DiffMode::Staged).await;
        assert!(matches!(
            result,
            Err(AssistError::Pipeline(PipelineError::SchemaViolation { .. }))
        ));
    }

    #[test]
    fn test_commit_failure_is_reported() {
        let mut vcs = MockVersionControl::new();
        vcs.expect_commit().returning(|_| {
            Err(GitError::NonZeroExit {
                operation: "commit staged changes".to_string(),
                code: Some(1),
                stderr: "nothing to commit".to_string(),
            })
        });

        let assistant = Assistant::new(
            vcs,
            PromptPipeline::new(MockCompletionService::new(), &config()),
        );
        let err = assistant
            .apply_commit(&CommitMessage {
                message: "chore: x".to_string(),
            })
            .unwrap_err();
        assert!(err.to_string().contains("commit staged changes"));
    }

    #[test]
    fn test_current_branch() {
        let mut vcs = MockVersionControl::new();
        vcs.expect_current_branch()
            .returning(|| Ok("feature/login".to_string()));

        let assistant = Assistant::new(
            vcs,
            PromptPipeline::new(MockCompletionService::new(), &config()),
        );
        assert_eq!(assistant.current_branch().unwrap(), "feature/login");
    }
}
