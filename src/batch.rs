use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::RunConfig;
use crate::defacer::Defacer;
use crate::summary::{SidecarStatus, Status, Summary, TaskOutcome};
use crate::targets::sidecar_path;
use crate::work::{Task, WorkerPool};
use crate::Result;

pub const MSG_DEFACED: &str = "defaced";
pub const MSG_SKIPPED: &str = "Skipped (already exists)";

/// Defaces one image from the dataset tree into the output tree.
pub struct DefaceTask {
    pub rel: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub copy_sidecars: bool,
    pub skip_existing: bool,
    defacer: Arc<dyn Defacer>,
}

impl fmt::Debug for DefaceTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaceTask")
            .field("rel", &self.rel)
            .field("defacer", &self.defacer.name())
            .finish()
    }
}

impl DefaceTask {
    pub fn new(config: &RunConfig, rel: &str, defacer: Arc<dyn Defacer>) -> Self {
        Self {
            rel: rel.to_string(),
            source: config.dataset_root.join(rel),
            destination: config.output_root.join(rel),
            copy_sidecars: config.copy_sidecars,
            skip_existing: config.skip_existing,
            defacer,
        }
    }

    fn outcome(&self, status: Status, message: impl Into<String>) -> TaskOutcome {
        TaskOutcome {
            rel: self.rel.clone(),
            status,
            message: message.into(),
            sidecar: SidecarStatus::NotRequested,
        }
    }

    fn sidecar(&self) -> SidecarStatus {
        if !self.copy_sidecars {
            return SidecarStatus::NotRequested;
        }
        match copy_sidecar_if_present(&self.source, &self.destination) {
            Ok(true) => SidecarStatus::Copied,
            Ok(false) => SidecarStatus::Absent,
            Err(e) => {
                tracing::warn!("Failed to copy sidecar for {}: {e}", self.rel);
                SidecarStatus::Failed(e.to_string())
            }
        }
    }
}

impl Task for DefaceTask {
    type Output = TaskOutcome;

    fn process(&self) -> Self::Output {
        if !self.source.exists() {
            return TaskOutcome::failed(
                &self.rel,
                format!("Missing source file: {}", self.source.display()),
            );
        }

        if self.skip_existing && self.destination.exists() {
            return TaskOutcome {
                sidecar: self.sidecar(),
                ..self.outcome(Status::Skipped, MSG_SKIPPED)
            };
        }

        if let Some(parent) = self.destination.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                return TaskOutcome::failed(
                    &self.rel,
                    format!("Failed to create {}: {e}", parent.display()),
                );
            }
        }

        let result = self.defacer.deface(&self.source, &self.destination);
        if !result.success {
            return self.outcome(Status::Failed, result.output);
        }

        TaskOutcome {
            sidecar: self.sidecar(),
            ..self.outcome(Status::Defaced, MSG_DEFACED)
        }
    }
}

/// Copies the JSON sidecar of `source_image` next to `destination_image`,
/// keeping its modification time. Returns `false` when there is no sidecar.
pub fn copy_sidecar_if_present(source_image: &Path, destination_image: &Path) -> io::Result<bool> {
    let source = sidecar_path(source_image);
    if !source.exists() {
        return Ok(false);
    }

    let destination = sidecar_path(destination_image);
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(&source, &destination)?;

    let modified = fs::metadata(&source)?.modified()?;
    File::options()
        .write(true)
        .open(&destination)?
        .set_modified(modified)?;
    Ok(true)
}

/// Defaces every target on a pool of `config.workers` workers.
///
/// `on_outcome` sees each outcome as soon as its file is done, so the order
/// follows completion rather than `targets`.
pub async fn run_batch<F>(
    config: &RunConfig,
    defacer: Arc<dyn Defacer>,
    targets: &[&str],
    mut on_outcome: F,
) -> Result<Summary>
where
    F: FnMut(&TaskOutcome),
{
    let pool = WorkerPool::<DefaceTask>::new(config.workers);
    tracing::info!(
        "Defacing {} files with {} ({} workers)",
        targets.len(),
        defacer.name(),
        pool.size()
    );

    let tasks = targets
        .iter()
        .map(|rel| DefaceTask::new(config, rel, Arc::clone(&defacer)))
        .collect::<Vec<_>>();

    let mut summary = Summary::default();
    pool.run(tasks, |outcome| {
        if !outcome.is_ok() {
            tracing::warn!("{} failed: {}", outcome.rel, outcome.message);
        }
        on_outcome(&outcome);
        summary.record(outcome);
    })
    .await?;

    tracing::info!(
        "Finished {} files: {} succeeded, {} failed",
        summary.total(),
        summary.succeeded,
        summary.failed
    );
    Ok(summary)
}
