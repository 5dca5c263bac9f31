use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anchorprint_cli::{fingerprint_file, write_summary, write_tokens};
use anchorprint_fingerprint::Fingerprinter;
use anchorprint_shared_config::CommonConfig;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fingerprint audio files into anchor-pair hash tokens
#[derive(Debug, Parser)]
#[command(name = "anchorprint", version)]
struct Args {
    /// Audio files to fingerprint
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print per-file counts instead of tokens
    #[arg(long)]
    summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let log_level = CommonConfig::log_level_from_env();

    // Initialize tracing; stdout carries the token stream
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CommonConfig::from_env()
        .inspect_err(|e| tracing::error!("Invalid configuration: {}", e))?;

    tracing::info!("Fingerprinting {} file(s)", args.files.len());

    let fingerprinter = Arc::new(Fingerprinter::new(config.fingerprint)?);
    let total = args.files.len();

    let handles: Vec<_> = args
        .files
        .into_iter()
        .map(|path| {
            let fingerprinter = Arc::clone(&fingerprinter);
            tokio::task::spawn_blocking(move || fingerprint_file(&fingerprinter, &path))
        })
        .collect();

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut failures = 0usize;

    for handle in handles {
        match handle.await? {
            Ok(report) if args.summary => write_summary(&mut out, &report.summary)?,
            Ok(report) => write_tokens(&mut out, &report.tokens)?,
            Err(e) => {
                tracing::error!("{:#}", e);
                failures += 1;
            }
        }
    }
    out.flush()?;

    if failures > 0 {
        anyhow::bail!("{} of {} file(s) failed", failures, total);
    }
    Ok(())
}
