use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::Result;

pub const DIVIDER_WIDTH: usize = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Defaced,
    Skipped,
    Failed,
}

impl Status {
    pub fn is_ok(self) -> bool {
        !matches!(self, Status::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum SidecarStatus {
    NotRequested,
    Absent,
    Copied,
    Failed(String),
}

/// What happened to a single target image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOutcome {
    pub rel: String,
    pub status: Status,
    pub message: String,
    pub sidecar: SidecarStatus,
}

impl TaskOutcome {
    pub fn failed(rel: &str, message: impl Into<String>) -> Self {
        Self {
            rel: rel.to_string(),
            status: Status::Failed,
            message: message.into(),
            sidecar: SidecarStatus::NotRequested,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = if self.is_ok() { "OK" } else { "ERR" };
        write!(f, "[{tag}] {} -> {}", self.rel, self.message)
    }
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<TaskOutcome>,
}

impl Summary {
    pub fn record(&mut self, outcome: TaskOutcome) {
        if outcome.is_ok() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn exit_code(&self) -> u8 {
        if self.failed > 0 {
            1
        } else {
            0
        }
    }

    pub fn write_report<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Summary: {} succeeded, {} failed",
            self.succeeded, self.failed
        )
    }
}

pub fn divider() -> String {
    "-".repeat(DIVIDER_WIDTH)
}
