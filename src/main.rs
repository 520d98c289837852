//! gitai - CLI entry point.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dialoguer::Confirm;
use tracing_subscriber::EnvFilter;

use gitai::assistant::Assistant;
use gitai::config::Config;
use gitai::error::AssistError;
use gitai::git::{DiffMode, GitCli};
use gitai::llm::{CommitMessage, CompletionService, OpenAiClient, PromptPipeline, Task};
use gitai::render::{render_commit_message, render_output};

/// Generate commit messages, merge request text and code reviews from git diffs.
#[derive(Parser, Debug)]
#[command(name = "gitai")]
#[command(about = "AI-powered Git CLI tool")]
#[command(version)]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Model to use for every task (overrides GITAI_MODEL and per-task defaults)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a commit message from staged changes
    Commit(CommitArgs),

    /// Generate merge request text or a review from the current branch
    #[command(subcommand, visible_alias = "pr")]
    Mr(MrCommand),

    /// Print the version
    Version,
}

#[derive(Args, Debug)]
struct CommitArgs {
    /// Commit with the generated message without asking
    #[arg(short, long, conflicts_with = "confirm")]
    auto: bool,

    /// Ask before committing with the generated message
    #[arg(short, long)]
    confirm: bool,

    /// Describe staged and unstaged changes (preview only, nothing is committed)
    #[arg(long, conflicts_with_all = ["auto", "confirm"])]
    all: bool,
}

#[derive(Subcommand, Debug)]
enum MrCommand {
    /// Generate a title
    Title(BaseArgs),
    /// Generate a title, description and per-file summaries
    Details(BaseArgs),
    /// Review the changes
    Review(BaseArgs),
}

impl MrCommand {
    fn task(&self) -> Task {
        match self {
            MrCommand::Title(_) => Task::GenerateChangeTitle,
            MrCommand::Details(_) => Task::GenerateChangeDetails,
            MrCommand::Review(_) => Task::ReviewChanges,
        }
    }

    fn base(&self) -> &BaseArgs {
        match self {
            MrCommand::Title(base) | MrCommand::Details(base) | MrCommand::Review(base) => base,
        }
    }
}

#[derive(Args, Debug)]
struct BaseArgs {
    /// Branch or commit to compare against (defaults to GITAI_BASE_BRANCH or master)
    #[arg(long, conflicts_with = "upstream")]
    base: Option<String>,

    /// Compare against the current branch's upstream
    #[arg(long)]
    upstream: bool,
}

impl BaseArgs {
    fn diff_mode(&self, config: &Config) -> DiffMode {
        if self.upstream {
            DiffMode::Upstream
        } else {
            DiffMode::Against(
                self.base
                    .clone()
                    .unwrap_or_else(|| config.base_branch.clone()),
            )
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if matches!(cli.command, Command::Version) {
        println!("gitai {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    GitCli::check_installed().context("git is required")?;

    let config = Config::from_env()
        .context("Failed to load configuration")?
        .with_model(cli.model.clone());

    let workdir = std::env::current_dir().context("Failed to read the current directory")?;
    let client = OpenAiClient::from_config(&config);
    let assistant = Assistant::new(GitCli::new(workdir), PromptPipeline::new(client, &config));

    match cli.command {
        Command::Commit(args) => run_commit(&assistant, &args).await,
        Command::Mr(command) => run_mr(&assistant, &config, command).await,
        Command::Version => Ok(()),
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins unless `--verbose` is given.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("gitai=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run_commit<S: CompletionService>(
    assistant: &Assistant<GitCli, S>,
    args: &CommitArgs,
) -> Result<()> {
    let mode = if args.all {
        DiffMode::Full
    } else {
        DiffMode::Staged
    };

    let notice = if args.all {
        "No changes found in the working tree."
    } else {
        "No staged changes found. Stage files with `git add` first."
    };

    let generated = assistant.generate::<CommitMessage>(&mode).await;
    let Some(message) =
        skip_if_empty(generated, notice).context("Failed to generate commit message")?
    else {
        return Ok(());
    };

    println!("{}", render_commit_message(&message));

    let commit = if args.auto {
        true
    } else if args.confirm {
        Confirm::new()
            .with_prompt("Commit with this message?")
            .default(true)
            .interact()
            .context("Failed to read confirmation")?
    } else {
        false
    };

    if commit {
        assistant
            .apply_commit(&message)
            .context("Failed to commit staged changes")?;
        println!("✓ Committed changes");
    } else if !args.all {
        println!("Use --auto to commit with this message, or --confirm to be asked first.");
    }

    Ok(())
}

async fn run_mr<S: CompletionService>(
    assistant: &Assistant<GitCli, S>,
    config: &Config,
    command: MrCommand,
) -> Result<()> {
    let mode = command.base().diff_mode(config);
    let task = command.task();

    print_branch_header(assistant, &mode);

    let notice = format!("No changes found ({}).", mode.describe());
    if let Some(output) = skip_if_empty(assistant.run(task, &mode).await, &notice)
        .with_context(|| format!("Failed to generate {}", task))?
    {
        print!("{}", render_output(&output));
    }

    Ok(())
}

/// Turn an empty diff into an informational message and `None`.
fn skip_if_empty<T>(result: Result<T, AssistError>, notice: &str) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_empty_diff() => {
            println!("{}", notice);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Print which branch is being compared. Branch lookup failures are not fatal.
fn print_branch_header<S: CompletionService>(assistant: &Assistant<GitCli, S>, mode: &DiffMode) {
    match assistant.current_branch() {
        Ok(branch) if !branch.is_empty() => println!("Branch: {} ({})", branch, mode.describe()),
        Ok(_) => println!("Detached HEAD ({})", mode.describe()),
        Err(e) => tracing::debug!("Could not determine current branch: {}", e),
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn mr_command(cli: Cli) -> MrCommand {
        match cli.command {
            Command::Mr(command) => command,
            other => panic!("Expected mr command, got {:?}", other),
        }
    }

    #[test]
    fn test_mr_subcommands_map_to_tasks() {
        let cases = [
            ("title", Task::GenerateChangeTitle),
            ("details", Task::GenerateChangeDetails),
            ("review", Task::ReviewChanges),
        ];
        for (name, task) in cases {
            assert_eq!(mr_command(parse(&["gitai", "mr", name])).task(), task);
            assert_eq!(mr_command(parse(&["gitai", "pr", name])).task(), task);
        }
    }

    #[test]
    fn test_base_defaults_to_configured_branch() {
        let config = Config::from_lookup(|name| match name {
            "GITAI_BASE_BRANCH" => Some("develop".to_string()),
            _ => None,
        })
        .unwrap();

        let command = mr_command(parse(&["gitai", "mr", "review"]));
        assert_eq!(
            command.base().diff_mode(&config),
            DiffMode::Against("develop".to_string())
        );

        let command = mr_command(parse(&["gitai", "mr", "title", "--base", "origin/main"]));
        assert_eq!(
            command.base().diff_mode(&config),
            DiffMode::Against("origin/main".to_string())
        );

        let command = mr_command(parse(&["gitai", "mr", "details", "--upstream"]));
        assert_eq!(command.base().diff_mode(&config), DiffMode::Upstream);
    }

    #[test]
    fn test_conflicting_flags_are_rejected() {
        assert!(Cli::try_parse_from(["gitai", "commit", "--auto", "--confirm"]).is_err());
        assert!(Cli::try_parse_from(["gitai", "commit", "--all", "--auto"]).is_err());
        assert!(Cli::try_parse_from(["gitai", "mr", "title", "--base", "x", "--upstream"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["gitai", "mr", "review", "--model", "gpt-4o", "--verbose"]);
        assert!(cli.verbose);
        assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
    }
}
