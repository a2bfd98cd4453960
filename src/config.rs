use clap::Parser;
use std::path::{Path, PathBuf};

use crate::defacer::{PyDeface, DEFAULT_PROGRAM};
use crate::{Error, Result};

/// Deface ds004021 flagged T1w images into a separate BIDS folder.
#[derive(Debug, Clone, Parser)]
#[clap(version, about)]
pub struct Args {
    /// Path to local ds004021 (source).
    #[clap(long)]
    pub dataset_root: PathBuf,

    /// Path to write defaced BIDS tree (destination).
    #[clap(long)]
    pub output_root: PathBuf,

    /// Also copy matching T1w sidecar .json files if present.
    #[clap(long)]
    pub copy_sidecars: bool,

    /// Skip if output NIfTI already exists.
    #[clap(long)]
    pub skip_existing: bool,

    /// Number of parallel workers. Values below 1 run a single worker.
    #[clap(short, long, default_value = "4", allow_negative_numbers = true)]
    pub workers: i64,

    /// Defacing executable, looked up on PATH unless given as a path.
    #[clap(long, default_value = DEFAULT_PROGRAM)]
    pub defacer: String,

    /// Also write a JSON summary of every file to this path.
    #[clap(long)]
    pub report: Option<PathBuf>,
}

impl Args {
    pub fn worker_count(&self) -> usize {
        usize::try_from(self.workers.max(1)).unwrap_or(usize::MAX)
    }
}

/// Validated settings for one batch run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub dataset_root: PathBuf,
    pub output_root: PathBuf,
    pub copy_sidecars: bool,
    pub skip_existing: bool,
    pub workers: usize,
    pub report: Option<PathBuf>,
}

impl RunConfig {
    /// Runs the preflight checks and creates the output root.
    ///
    /// The defacer is located first, then the dataset root is resolved, then
    /// the output root is checked for writability.
    pub fn from_args(args: &Args) -> Result<(Self, PyDeface)> {
        let defacer = PyDeface::locate(&args.defacer)?;
        let config = Self::new(
            &args.dataset_root,
            &args.output_root,
            args.copy_sidecars,
            args.skip_existing,
            args.worker_count(),
        )?
        .with_report(args.report.clone());
        Ok((config, defacer))
    }

    pub fn new<P, Q>(
        dataset_root: P,
        output_root: Q,
        copy_sidecars: bool,
        skip_existing: bool,
        workers: usize,
    ) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let dataset_root = resolve_dataset_root(dataset_root.as_ref())?;
        let output_root = prepare_output_root(output_root.as_ref())?;

        Ok(Self {
            dataset_root,
            output_root,
            copy_sidecars,
            skip_existing,
            workers: workers.max(1),
            report: None,
        })
    }

    pub fn with_report(mut self, report: Option<PathBuf>) -> Self {
        self.report = report;
        self
    }
}

fn resolve_dataset_root(root: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(root)?;
    if !absolute.is_dir() {
        return Err(Error::DatasetRootNotFound(absolute));
    }
    Ok(absolute.canonicalize()?)
}

fn prepare_output_root(root: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(root)?;
    let not_writable = || Error::OutputNotWritable(absolute.clone());

    let Some(parent) = absolute.parent() else {
        // Only the filesystem root has no parent
        return Err(not_writable());
    };
    match parent.metadata() {
        Ok(meta) if meta.is_dir() && !meta.permissions().readonly() => {}
        _ => return Err(not_writable()),
    }

    std::fs::create_dir_all(&absolute).map_err(|e| {
        tracing::debug!("Failed to create {}: {e}", absolute.display());
        not_writable()
    })?;
    Ok(absolute.canonicalize()?)
}
