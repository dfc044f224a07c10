//! Standalone MCP server binary for SchoolDigger.
//!
//! Speaks MCP over stdio by default, suitable for Claude Desktop, Cursor and
//! other MCP clients. With `--http` it serves MCP Streamable HTTP at
//! `http://<host>:<port>/mcp` instead.
//!
//! Usage:
//! ```text
//! SCHOOLDIGGER_API_ID=... SCHOOLDIGGER_API_KEY=... schooldigger_mcp
//! schooldigger_mcp --http --host localhost --port 8080
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rmcp::ServiceExt;
use schooldigger_mcp::client::config::DEFAULT_BASE_URL;
use schooldigger_mcp::mcp::{start_listener, SchoolDiggerServer};
use schooldigger_mcp::{ClientConfig, Credentials, RetryConfig, SchoolDiggerClient};
use tokio::io::{stdin, stdout};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "schooldigger_mcp")]
#[command(about = "MCP server for the SchoolDigger school and district API")]
#[command(version)]
struct Args {
    /// Serve MCP Streamable HTTP instead of stdio
    #[arg(long, alias = "listen")]
    http: bool,

    /// Host name or IP address to bind in HTTP mode
    #[arg(long, env = "SCHOOLDIGGER_MCP_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind in HTTP mode
    #[arg(long, env = "SCHOOLDIGGER_MCP_PORT", default_value = "8080")]
    port: u16,

    /// SchoolDigger API root
    #[arg(long, env = "SCHOOLDIGGER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-attempt request timeout in seconds
    #[arg(long, env = "SCHOOLDIGGER_TIMEOUT_SECS", default_value = "10")]
    timeout_secs: u64,

    /// Extra attempts after a transport failure
    #[arg(long, env = "SCHOOLDIGGER_MAX_RETRIES", default_value = "2")]
    max_retries: u32,

    /// Backoff before the first retry, in milliseconds
    #[arg(long, env = "SCHOOLDIGGER_RETRY_BACKOFF_MS", default_value = "200")]
    retry_backoff_ms: u64,

    /// Write logs to a daily rolling file in this directory instead of stderr
    #[arg(long, env = "SCHOOLDIGGER_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let config = ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            retry: RetryConfig {
                max_retries: self.max_retries,
                initial_backoff: Duration::from_millis(self.retry_backoff_ms),
                ..Default::default()
            },
            ..Default::default()
        };
        Ok(config.with_base_url(&self.base_url)?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    let _guard = init_tracing(args.log_dir.as_ref());

    if let Err(err) = run(args).await {
        tracing::error!("{err:#}");
        return Err(err);
    }
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let credentials = Credentials::from_env()?;
    let client = SchoolDiggerClient::new(credentials, args.client_config()?)?;
    tracing::info!(
        "Starting SchoolDigger MCP server v{} (base_url={})",
        schooldigger_mcp::VERSION,
        client.config().base_url
    );
    let server = SchoolDiggerServer::new(client);

    if args.http {
        let mut handle = start_listener((args.host.as_str(), args.port), server)
            .await
            .with_context(|| format!("failed to bind {}:{}", args.host, args.port))?;
        tracing::info!("Serving MCP Streamable HTTP at {}", handle.url());

        let stopped = tokio::select! {
            result = handle.stopped() => Some(result),
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to wait for ctrl-c")?;
                None
            }
        };
        match stopped {
            Some(result) => {
                result?;
                anyhow::bail!("MCP HTTP listener stopped unexpectedly");
            }
            None => handle.shutdown().await?,
        }
    } else {
        // stdout carries the MCP protocol; logs go to stderr.
        let service = server.serve((stdin(), stdout())).await?;
        service.waiting().await?;
    }

    tracing::info!("SchoolDigger MCP server stopped");
    Ok(())
}

fn init_tracing(log_dir: Option<&PathBuf>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "schooldigger_mcp");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
            None
        }
    }
}
