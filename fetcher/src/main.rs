//! impfomat-fetch — query one appointment service endpoint
//!
//! Prints the raw body on success. On failure the `{status, statusText}`
//! descriptor goes to stderr and the exit status is 1.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use impfomat_fetcher::config::{self, CONFIG_ENV};
use impfomat_fetcher::{Client, Invocation, Outcome};

#[derive(Debug, Parser)]
#[command(name = "impfomat-fetch", version, about = "Corona Impf-o-mat endpoint fetcher")]
struct Cli {
    /// get_ersttermin_json, get_vaccination_list_json or get_version.
    /// Omitted means get_ersttermin_json.
    action: Option<String>,

    /// Path to the configuration file
    #[arg(short, long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Service URL, overrides [service] base_url
    #[arg(long)]
    base_url: Option<String>,

    /// Search page path, e.g. /terminservice/suche/<code>/<plz>/<vaccine>
    #[arg(long)]
    page_path: Option<String>,

    /// Write the response body to this file instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact()
        .init();
}

async fn run(cli: Cli) -> Result<bool> {
    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.service.base_url = base_url;
    }

    let page_path = cli
        .page_path
        .unwrap_or_else(|| config.search.location().page_path());

    let client = Client::from_config(&config).context("Failed to set up fetcher")?;
    info!(
        "Fetching {} from {}",
        cli.action.as_deref().unwrap_or("get_ersttermin_json"),
        client.fetcher().base_url()
    );

    let (invocation, rx) = Invocation::channel(cli.action.as_deref());
    client.invoke(&page_path, invocation).await;
    let outcome = rx.await.context("Invocation finished without an outcome")?;

    match outcome {
        Outcome::Success(body) => {
            match cli.out {
                Some(path) => {
                    fs::write(&path, &body)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Wrote {} bytes to {}", body.len(), path.display());
                }
                None => write_body(&mut std::io::stdout().lock(), &body)
                    .context("Failed to write response body to stdout")?,
            }
            Ok(true)
        }
        Outcome::Failure(e) => {
            warn!("Request failed: {e}");
            let descriptor = serde_json::to_string(&e.descriptor())
                .context("Failed to serialize error descriptor")?;
            eprintln!("{descriptor}");
            Ok(false)
        }
    }
}

/// Relay the body byte for byte; no trailing newline is added.
fn write_body<W: Write>(out: &mut W, body: &str) -> std::io::Result<()> {
    out.write_all(body.as_bytes())?;
    out.flush()
}
