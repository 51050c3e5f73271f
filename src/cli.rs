use crate::engine::HttpAnalysisClient;
use crate::lifecycle::{FormState, LifecycleState};
use crate::logging::LogTarget;
use crate::model::RunConfig;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

pub const DEFAULT_ENDPOINT: &str = "https://plivo-backend-g3vt.onrender.com/api/process-text";

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "text-analyzer",
    version,
    about = "Send text to a remote analysis service, with optional TUI"
)]
pub struct Cli {
    /// Text to analyze in --text/--json mode (falls back to --file, then stdin)
    pub input: Option<String>,

    /// Analysis endpoint URL
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Read the text to analyze from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Print JSON report and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print text summary and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Run silently: suppress all output except errors (for cron usage)
    #[arg(long)]
    pub silent: bool,

    /// Request timeout (e.g. 30s); no timeout when omitted
    #[arg(long)]
    pub timeout: Option<humantime::Duration>,

    /// Write diagnostic logs to this file instead of the default location
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn is_tui(&self) -> bool {
        !self.json && !self.text && !self.silent
    }
}

/// Decide where diagnostic logs go for this invocation.
pub fn log_target(args: &Cli) -> LogTarget {
    if let Some(p) = args.log_file.as_ref() {
        return LogTarget::File(p.clone());
    }
    if args.silent {
        return LogTarget::Off;
    }
    if cfg!(feature = "tui") && args.is_tui() {
        return crate::logging::default_log_path()
            .map(LogTarget::File)
            .unwrap_or(LogTarget::Off);
    }
    LogTarget::Stderr
}

pub async fn run(args: Cli) -> Result<()> {
    // Validate that --silent can only be used with --json
    if args.silent && !args.json {
        return Err(anyhow::anyhow!(
            "--silent can only be used with --json. Use --silent --json together."
        ));
    }

    if args.is_tui() {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_text(args).await;
        }
    }

    if args.json {
        return run_json(args).await;
    }

    run_text(args).await
}

/// Build a `RunConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> RunConfig {
    let cfg = RunConfig {
        endpoint: args.endpoint.clone(),
        user_agent: format!("text-analyzer-cli/{}", env!("CARGO_PKG_VERSION")),
        timeout: args.timeout.map(Duration::from),
    };
    match serde_json::to_string(&cfg) {
        Ok(json) => tracing::debug!(config = %json, "run config"),
        Err(e) => tracing::debug!(error = %e, "run config not serializable"),
    }
    cfg
}

/// Resolve the one-shot input: positional text, then `--file`, then stdin.
async fn read_input(args: &Cli) -> Result<String> {
    if let Some(text) = args.input.clone() {
        return Ok(text);
    }
    if let Some(path) = args.file.as_ref() {
        return tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("read input file {}", path.display()));
    }
    tokio::task::spawn_blocking(|| std::io::read_to_string(std::io::stdin()))
        .await
        .context("stdin reader task failed")?
        .context("read input from stdin")
}

/// Run one submit through the lifecycle controller.
async fn analyze_once(args: &Cli) -> Result<FormState> {
    let cfg = build_config(args);
    let client = HttpAnalysisClient::new(&cfg)?;
    let mut form = FormState::new();
    form.update_input(read_input(args).await?);
    form.submit(&client).await;
    Ok(form)
}

async fn run_json(args: Cli) -> Result<()> {
    let form = analyze_once(&args).await?;
    let report = crate::orchestrator::build_report(&args.endpoint, &form);

    if !args.silent {
        let (out_tx, out_handle) = spawn_output_writer();
        let out = serde_json::to_string_pretty(&report)?;
        let _ = out_tx.send(OutputLine::Stdout(out));
        drop(out_tx);
        let _ = out_handle.await;
    }

    match form.lifecycle() {
        LifecycleState::Failed(msg) => Err(anyhow::anyhow!("{msg}")),
        _ => Ok(()),
    }
}

async fn run_text(args: Cli) -> Result<()> {
    let (out_tx, out_handle) = spawn_output_writer();
    let _ = out_tx.send(OutputLine::Stderr("Analyzing... please wait.".into()));

    let form = analyze_once(&args).await?;

    let res = match form.lifecycle() {
        LifecycleState::Succeeded(result) => {
            let summary = crate::text_summary::build_text_summary(result);
            for line in summary.lines {
                let _ = out_tx.send(OutputLine::Stdout(line));
            }
            Ok(())
        }
        LifecycleState::Failed(msg) => Err(anyhow::anyhow!("{msg}")),
        LifecycleState::Idle | LifecycleState::Loading => {
            Err(anyhow::anyhow!("no analysis result"))
        }
    };

    drop(out_tx);
    let _ = out_handle.await;
    res
}
