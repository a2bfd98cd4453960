use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bids_deface::summary::divider;
use bids_deface::{run_batch, Args, RunConfig, TARGETS};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bids_deface=info,deface_ds004021=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (config, defacer) = match RunConfig::from_args(&args) {
        Ok(found) => found,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return Ok(ExitCode::from(2));
        }
    };
    tracing::debug!("Using defacer at {}", defacer.program().display());

    println!("Source: {}", config.dataset_root.display());
    println!("Output: {}", config.output_root.display());
    println!("Workers: {}", config.workers);
    println!("{}", divider());

    let summary = run_batch(&config, Arc::new(defacer), TARGETS, |outcome| {
        println!("{outcome}")
    })
    .await?;

    println!("{}", divider());
    println!("{summary}");

    if let Some(report) = &config.report {
        summary.write_report(report)?;
        tracing::info!("Report written to {}", report.display());
    }

    Ok(ExitCode::from(summary.exit_code()))
}
