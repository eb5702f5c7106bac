#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Context;
use clap::Parser;
use kubigo_core::output::format::{result_json, result_text};
use kubigo_core::{
    run_action, ActionKind, ActionResult, GitHubContext, InputMap, OutputWriter, TracingLogger,
    WorkflowLogger,
};
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kubigo", version, about = "Kubigo release management for GitHub Actions")]
struct Cli {
    /// Output format: gha, json, text (default: auto-detect)
    #[arg(long, global = true, env = "KUBIGO_OUTPUT_FORMAT")]
    output_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create releases for a service from freshly built images
    CreateRelease(CreateReleaseArgs),
    /// Approve a release awaiting approval
    Approve(ApproveArgs),
    /// Deploy an existing release
    Deploy(DeployArgs),
    /// Roll a target back to its previous release
    Rollback(RollbackArgs),
}

/// Inputs shared by every action
///
/// Action inputs arrive as `INPUT_<NAME>` environment variables; the runner
/// keeps hyphens in the name.
#[derive(clap::Args)]
struct CommonArgs {
    /// Kubigo API key
    #[arg(long, env = "INPUT_API-KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API base URL
    #[arg(long, env = "INPUT_API-URL")]
    api_url: Option<String>,

    /// Alias for --api-url
    #[arg(long, env = "INPUT_KUBIGO-URL")]
    kubigo_url: Option<String>,
}

#[derive(clap::Args)]
struct CreateReleaseArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Service name or ID
    #[arg(long, env = "INPUT_SERVICE")]
    service: Option<String>,

    /// Image references, separated by commas or newlines
    #[arg(long, env = "INPUT_IMAGES")]
    images: Option<String>,

    /// Target environment, or "all"
    #[arg(long, env = "INPUT_TARGET")]
    target: Option<String>,

    /// Commit SHA (default: GITHUB_SHA)
    #[arg(long, env = "INPUT_COMMIT-SHA")]
    commit_sha: Option<String>,

    /// Repository URL (default: derived from the run)
    #[arg(long, env = "INPUT_REPOSITORY-URL")]
    repository_url: Option<String>,

    /// Branch (default: derived from GITHUB_REF)
    #[arg(long, env = "INPUT_BRANCH")]
    branch: Option<String>,

    /// Recorded as the release trigger
    #[arg(long, env = "INPUT_TRIGGERED-BY")]
    triggered_by: Option<String>,
}

#[derive(clap::Args)]
struct ApproveArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Release to approve
    #[arg(long, env = "INPUT_RELEASE-ID")]
    release_id: Option<String>,

    /// Approval comment
    #[arg(long, env = "INPUT_COMMENT")]
    comment: Option<String>,
}

#[derive(clap::Args)]
struct DeployArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Release to deploy
    #[arg(long, env = "INPUT_RELEASE-ID")]
    release_id: Option<String>,
}

#[derive(clap::Args)]
struct RollbackArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Target to roll back
    #[arg(long, env = "INPUT_TARGET-ID")]
    target_id: Option<String>,

    /// Reason recorded with the rollback
    #[arg(long, env = "INPUT_REASON")]
    reason: Option<String>,
}

/// Output format for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// GitHub Actions: workflow commands on stdout + outputs to $GITHUB_OUTPUT
    Gha,
    /// Full JSON result to stdout
    Json,
    /// Human-readable text to stdout
    Text,
}

impl OutputFormat {
    fn detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("gha") => OutputFormat::Gha,
            Some("json") => OutputFormat::Json,
            Some("text") => OutputFormat::Text,
            _ => {
                if std::env::var("GITHUB_ACTIONS").is_ok() {
                    OutputFormat::Gha
                } else {
                    OutputFormat::Text
                }
            }
        }
    }
}

/// Filter empty string from Option (env vars may produce "" for empty values)
fn clean_opt(v: &Option<String>) -> Option<String> {
    v.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}

impl CommonArgs {
    fn inputs(&self) -> InputMap {
        let mut inputs = InputMap::new();
        inputs.insert_opt("api-key", clean_opt(&self.api_key));
        inputs.insert_opt("api-url", clean_opt(&self.api_url));
        inputs.insert_opt("kubigo-url", clean_opt(&self.kubigo_url));
        inputs
    }
}

impl Commands {
    /// Action and the collected inputs
    fn into_action(self) -> (ActionKind, InputMap) {
        let (kind, common, extra) = match self {
            Commands::CreateRelease(args) => (
                ActionKind::CreateRelease,
                args.common,
                vec![
                    ("service", args.service),
                    ("images", args.images),
                    ("target", args.target),
                    ("commit-sha", args.commit_sha),
                    ("repository-url", args.repository_url),
                    ("branch", args.branch),
                    ("triggered-by", args.triggered_by),
                ],
            ),
            Commands::Approve(args) => (
                ActionKind::Approve,
                args.common,
                vec![("release-id", args.release_id), ("comment", args.comment)],
            ),
            Commands::Deploy(args) => (
                ActionKind::Deploy,
                args.common,
                vec![("release-id", args.release_id)],
            ),
            Commands::Rollback(args) => (
                ActionKind::Rollback,
                args.common,
                vec![("target-id", args.target_id), ("reason", args.reason)],
            ),
        };

        let mut inputs = common.inputs();
        for (name, value) in extra {
            inputs.insert_opt(name, clean_opt(&value));
        }
        (kind, inputs)
    }
}

fn main() {
    let cli = Cli::parse();
    let output_format = OutputFormat::detect(clean_opt(&cli.output_format).as_deref());
    let (kind, inputs) = cli.command.into_action();

    init_tracing(output_format);

    let code = match run(kind, &inputs, output_format) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    };
    std::process::exit(code);
}

/// Diagnostics go to stderr so stdout stays parseable
///
/// `KUBIGO_LOG` takes an `EnvFilter` directive; step debugging
/// (`RUNNER_DEBUG=1`) raises the default to debug.
fn init_tracing(format: OutputFormat) {
    let default_level = if std::env::var("RUNNER_DEBUG").as_deref() == Ok("1") {
        "debug"
    } else if format == OutputFormat::Gha {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("KUBIGO_LOG").unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(kind: ActionKind, inputs: &InputMap, format: OutputFormat) -> anyhow::Result<i32> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create runtime")?;
    let context = GitHubContext::from_env();

    let result = match format {
        OutputFormat::Gha => {
            rt.block_on(run_action(kind, inputs, &context, WorkflowLogger::stdout()))
        }
        OutputFormat::Json | OutputFormat::Text => {
            rt.block_on(run_action(kind, inputs, &context, TracingLogger))
        }
    };

    match format {
        OutputFormat::Gha => write_gha_output(kind, &result)?,
        OutputFormat::Json => write_json_output(kind, &result),
        OutputFormat::Text => write_text_output(kind, &result),
    }

    Ok(result.exit_code())
}

/// Write outputs using GitHub Actions multiline syntax to $GITHUB_OUTPUT
fn write_gha_output(kind: ActionKind, result: &ActionResult) -> anyhow::Result<()> {
    let Some(writer) = OutputWriter::from_env() else {
        tracing::warn!("GITHUB_OUTPUT not set, falling back to stdout");
        write_json_output(kind, result);
        return Ok(());
    };

    writer
        .write(result.outputs())
        .with_context(|| format!("cannot write GITHUB_OUTPUT ({})", writer.path().display()))
}

/// Write full JSON result to stdout
fn write_json_output(kind: ActionKind, result: &ActionResult) {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    let _ = serde_json::to_writer(&mut lock, &result_json(kind, result));
    let _ = writeln!(lock);
}

/// Write human-readable text to stdout
fn write_text_output(kind: ActionKind, result: &ActionResult) {
    let stdout = std::io::stdout();
    let mut w = stdout.lock();
    let _ = write!(w, "{}", result_text(kind, result));
}
