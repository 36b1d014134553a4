//! `blockbench serve` runs the demo service; `blockbench compare` runs the
//! benchmark harness against it.

use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use blockbench::Server;
use blockbench::app::{self, AppState, Settings};
use blockbench::harness::{Caller, Comparator, Console, HarnessConfig};

#[derive(Debug, Parser)]
#[command(name = "blockbench", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the demo service.
    Serve(ServeArgs),
    /// Compare endpoints under concurrent load.
    Compare(CompareArgs),
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: String,
}

#[derive(Debug, Args)]
struct CompareArgs {
    /// Base URL the endpoints are relative to.
    #[arg(long)]
    base_url: Option<String>,

    /// Requests per batch (N).
    #[arg(short = 'n', long)]
    requests: Option<usize>,

    /// Maximum in-flight requests (C).
    #[arg(short = 'c', long)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout: Option<f64>,

    /// Print results as JSON instead of the summary lines.
    #[arg(long)]
    json: bool,

    /// Endpoints to compare, in order.
    endpoints: Vec<String>,
}

impl CompareArgs {
    fn apply(self, mut config: HarnessConfig) -> (HarnessConfig, bool) {
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(requests) = self.requests {
            config.requests = requests;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if !self.endpoints.is_empty() {
            config.endpoints = self.endpoints;
        }
        (config, self.json)
    }
}

/// Logs go to stderr so they never interleave with the report on stdout.
/// `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("blockbench=info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Serve(args) => serve(args),
        Command::Compare(args) => compare(args),
    };

    if let Err(e) = result {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    runtime.block_on(async {
        let settings = Settings::load()?;
        let state = Arc::new(AppState::new(settings)?);
        let server = Server::bind(&args.addr).await?;
        server.serve(app::router(state)).await?;
        anyhow::Ok(())
    })
}

/// The harness runs on a single thread: the concurrency it measures is
/// interleaving, not parallelism.
fn compare(args: CompareArgs) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    let (config, json) = args.apply(HarnessConfig::load()?);

    runtime.block_on(async {
        let console = Console::stdout();
        let comparator = Comparator::new(Caller::new(&config)?, console.clone()).quiet(json);

        if !json {
            console.line(&format!(
                "Sending {} requests with concurrency={}\n",
                config.requests, config.concurrency
            ))?;
        }

        let results = comparator.compare(&config.endpoints).await?;

        if json {
            console.line(&serde_json::to_string_pretty(&results)?)?;
        }
        anyhow::Ok(())
    })
}
