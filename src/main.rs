//! CLI entry point for trainlog_stats.
//!
//! Fetches the trainlog.me leaderboards for the configured travel modes,
//! prints the configured user's distance and trip count, and saves them as
//! JSON.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use trainlog_stats::{
    category::parse_types,
    config::{Config, normalize_base_url},
    fetch::BasicClient,
    leaderboard::LeaderboardClient,
    pipeline,
};

#[derive(Parser)]
#[command(name = "trainlog_stats")]
#[command(about = "Export a user's trainlog.me leaderboard stats", long_about = None)]
struct Cli {
    /// Leaderboard username (overrides TRAINLOG_USERNAME)
    #[arg(short, long)]
    username: Option<String>,

    /// Comma-separated travel modes, e.g. "train,bus" (overrides TRAINLOG_TYPES)
    #[arg(short, long)]
    types: Option<String>,

    /// JSON file to write (overrides TRAINLOG_OUTPUT_PATH)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Leaderboard host (overrides TRAINLOG_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(username) = self.username {
            config.username = Some(username);
        }
        if let Some(types) = self.types {
            config.categories = parse_types(&types);
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = normalize_base_url(&base_url);
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Run failed");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env();
    cli.apply(&mut config);

    info!(
        username = config.username.as_deref().unwrap_or(""),
        categories = ?config.categories,
        output = %config.output_path.display(),
        "Starting"
    );

    let http = BasicClient::new(config.timeout)?;
    let client = LeaderboardClient::new(http, &config.base_url);

    let mut stdout = std::io::stdout().lock();
    pipeline::run(&config, &client, &mut stdout).await?;

    Ok(())
}

/// Colored stderr plus a JSON daily-rolling log file.
fn init_logging() -> WorkerGuard {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/trainlog_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("trainlog_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("RUST_LOG")
                .from_env_lossy(),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::DEBUG.into())
                .with_env_var("RUST_LOG_JSON")
                .from_env_lossy(),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    file_guard
}
