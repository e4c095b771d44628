//! loglens CLI - send logs to an analysis backend and show the report
//!
//! Usage:
//!   loglens analyze --file auth.log --mode deep
//!   journalctl -n 500 | loglens analyze --stdin --log-type syslog
//!   loglens health --backend-url http://siem-lab:8000
//!   loglens session

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use loglens::controller::{AnalysisController, AnalyzeOutcome};
use loglens::request::{AnalysisInputs, KNOWN_MODES};
use loglens::result::AnalysisResult;
use loglens::session::{read_file_input, Session};
use loglens::{AnalysisBackend, ClientConfig, HttpBackend};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "loglens", version, about = "Send logs to an analysis backend and show the report")]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: ./loglens.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a log file or pasted text
    Analyze(AnalyzeArgs),
    /// Check that the backend is reachable
    Health(BackendArgs),
    /// Interactive session
    Session(SessionArgs),
}

#[derive(Args)]
struct BackendArgs {
    /// Backend base URL
    #[arg(short = 'u', long, env = "LOGLENS_BACKEND_URL")]
    backend_url: Option<String>,
}

#[derive(Args)]
struct SessionArgs {
    #[command(flatten)]
    backend: BackendArgs,

    /// Analysis mode (quick, standard, deep)
    #[arg(short, long)]
    mode: Option<String>,

    /// Log type hint, e.g. syslog or nginx_access
    #[arg(short = 't', long)]
    log_type: Option<String>,
}

#[derive(Args)]
struct AnalyzeArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Log file to upload; takes precedence over --text and --stdin
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Log text to analyze
    #[arg(long, conflicts_with = "stdin")]
    text: Option<String>,

    /// Read log text from stdin
    #[arg(long)]
    stdin: bool,

    /// Print the detail JSON only
    #[arg(long)]
    json: bool,
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Inputs from flags, falling back to the config file
fn base_inputs(args: &SessionArgs, config: &ClientConfig) -> AnalysisInputs {
    let mode = args.mode.clone().unwrap_or_else(|| config.mode.clone());
    if !KNOWN_MODES.contains(&mode.as_str()) {
        warn!(mode = %mode, "Unknown analysis mode, sending it anyway");
    }

    AnalysisInputs {
        backend_url: args
            .backend
            .backend_url
            .clone()
            .unwrap_or_else(|| config.backend_url.clone()),
        mode,
        log_type: args
            .log_type
            .clone()
            .or_else(|| config.log_type.clone())
            .unwrap_or_default(),
        file: None,
        text: String::new(),
    }
}

fn print_header(inputs: &AnalysisInputs) {
    let source = match (&inputs.file, inputs.text.trim().len()) {
        (Some(file), _) => format!("{} ({} bytes)", file.file_name, file.bytes.len()),
        (None, chars) => format!("pasted text ({} chars)", chars),
    };
    let log_type = if inputs.log_type.trim().is_empty() {
        "auto"
    } else {
        inputs.log_type.trim()
    };

    eprintln!();
    eprintln!(
        "{}",
        "╭──────────────────────────────────────────────────────────────╮".blue()
    );
    eprintln!("{}  {}", "│".blue(), "loglens - Log Analysis".bold());
    eprintln!(
        "{}",
        "├──────────────────────────────────────────────────────────────┤".blue()
    );
    eprintln!("{}  {}  {}", "│".blue(), "Backend:".dimmed(), inputs.backend_url);
    eprintln!("{}  {}     {}", "│".blue(), "Mode:".dimmed(), inputs.mode);
    eprintln!("{}  {} {}", "│".blue(), "Log type:".dimmed(), log_type);
    eprintln!("{}  {}    {}", "│".blue(), "Input:".dimmed(), source);
    eprintln!(
        "{}",
        "╰──────────────────────────────────────────────────────────────╯".blue()
    );
    eprintln!();
}

fn print_results(result: &AnalysisResult, summary: &str, detail: &str) {
    let types = result.detected_type_names();
    let types = if types.is_empty() {
        "none".to_string()
    } else {
        types.join(", ")
    };

    eprintln!(
        "{}",
        "╭──────────────────────────────────────────────────────────────╮".green()
    );
    eprintln!("{}  {}", "│".green(), "Results".bold());
    eprintln!(
        "{}",
        "├──────────────────────────────────────────────────────────────┤".green()
    );
    eprintln!("{}  {}        {}", "│".green(), "ID:".dimmed(), result.id);
    eprintln!("{}  {} {}", "│".green(), "Detected:".dimmed(), types);
    eprintln!(
        "{}",
        "╰──────────────────────────────────────────────────────────────╯".green()
    );
    eprintln!();
    eprintln!("{}", "Report:".bold());
    eprintln!(
        "{}",
        "════════════════════════════════════════════════════════════════".green()
    );
    println!("{summary}");
    eprintln!(
        "{}",
        "════════════════════════════════════════════════════════════════".green()
    );
    eprintln!();
    eprintln!("{}", "Details:".bold());
    for line in detail.lines() {
        eprintln!("  {}", line.cyan());
    }
}

async fn run_analyze(args: AnalyzeArgs, config: &ClientConfig) -> Result<bool> {
    let mut inputs = base_inputs(&args.session, config);

    if let Some(path) = &args.file {
        let file = read_file_input(path)
            .with_context(|| format!("Failed to read log file: {}", path.display()))?;
        inputs.file = Some(file);
    }
    if let Some(text) = args.text {
        inputs.text = text;
    } else if args.stdin {
        std::io::stdin()
            .read_to_string(&mut inputs.text)
            .context("Failed to read logs from stdin")?;
    }
    if inputs.file.is_some() && !inputs.text.trim().is_empty() {
        warn!("Both a file and log text were given; only the file is sent");
    }

    if !args.json {
        print_header(&inputs);
    }

    let backend = HttpBackend::new(Duration::from_secs(config.timeout_secs))
        .context("Failed to create HTTP client")?;
    let mut controller = AnalysisController::new(Arc::new(backend)).with_inputs(inputs);

    let outcome = controller.analyze().await;
    let state = controller.state();

    match outcome {
        AnalyzeOutcome::Completed(result) if args.json => {
            println!("{}", state.detail);
            info!(id = %result.id, "Printed detail JSON");
            Ok(true)
        }
        AnalyzeOutcome::Completed(result) => {
            print_results(&result, &state.summary, &state.detail);
            eprintln!();
            eprintln!("{}", state.status);
            Ok(true)
        }
        AnalyzeOutcome::Rejected(_) | AnalyzeOutcome::Failed(_) => {
            eprintln!("{}", state.status.to_string().bold());
            Ok(false)
        }
    }
}

async fn run_health(args: BackendArgs, config: &ClientConfig) -> Result<bool> {
    let url = args.backend_url.unwrap_or_else(|| config.backend_url.clone());
    let url = url.strip_suffix('/').unwrap_or(&url);

    let backend = HttpBackend::new(Duration::from_secs(config.timeout_secs))
        .context("Failed to create HTTP client")?;
    let status = backend.health_check(url).await;

    if status.healthy {
        let latency = status
            .latency_ms
            .map(|ms| format!(" ({}ms)", ms))
            .unwrap_or_default();
        println!("{} {}{}", "healthy".green().bold(), url, latency.dimmed());
    } else {
        println!(
            "{} {}: {}",
            "unhealthy".red().bold(),
            url,
            status.error.unwrap_or_default()
        );
    }
    Ok(status.healthy)
}

async fn run_session(args: SessionArgs, config: &ClientConfig) -> Result<bool> {
    let backend = HttpBackend::new(Duration::from_secs(config.timeout_secs))
        .context("Failed to create HTTP client")?;
    let controller =
        AnalysisController::new(Arc::new(backend)).with_inputs(base_inputs(&args, config));

    let stdin = std::io::stdin();
    let mut session = Session::new(controller, stdin.lock(), std::io::stdout());
    session.run().await.context("Session I/O failed")?;
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = ClientConfig::resolve(cli.config.as_deref())?;
    info!(
        backend_url = %config.backend_url,
        mode = %config.mode,
        timeout_secs = config.timeout_secs,
        "Loaded configuration"
    );

    let ok = match cli.command {
        Command::Analyze(args) => run_analyze(args, &config).await?,
        Command::Health(args) => run_health(args, &config).await?,
        Command::Session(args) => run_session(args, &config).await?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
