use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bids_deface::summary::{SidecarStatus, Status};
use bids_deface::targets::sidecar_path;
use bids_deface::{run_batch, DefaceResult, Defacer, RunConfig, TARGETS};

/// Copies the input and counts invocations.
#[derive(Default)]
struct CopyDefacer {
    calls: AtomicUsize,
}

impl Defacer for CopyDefacer {
    fn name(&self) -> &str {
        "copy"
    }

    fn deface(&self, input: &Path, output: &Path) -> DefaceResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match fs::copy(input, output) {
            Ok(_) => DefaceResult::success(""),
            Err(e) => DefaceResult::failure(&e.to_string()),
        }
    }
}

fn populate(root: &Path, targets: &[&str]) {
    for rel in targets {
        let image = root.join(rel);
        fs::create_dir_all(image.parent().unwrap()).unwrap();
        fs::write(&image, rel.as_bytes()).unwrap();
        fs::write(sidecar_path(&image), "{}").unwrap();
    }
}

#[tokio::test]
async fn test_full_dataset_preserves_layout() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("ds004021");
    populate(&src, TARGETS);
    let config = RunConfig::new(&src, dir.path().join("ds004021_defaced"), true, false, 4).unwrap();
    let defacer = Arc::new(CopyDefacer::default());

    let mut printed = 0;
    let summary = run_batch(&config, defacer.clone(), TARGETS, |_| printed += 1)
        .await
        .unwrap();

    assert_eq!(printed, TARGETS.len());
    assert_eq!(summary.succeeded, TARGETS.len());
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.exit_code(), 0);
    assert_eq!(defacer.calls.load(Ordering::SeqCst), TARGETS.len());

    for rel in TARGETS {
        let image = config.output_root.join(rel);
        assert_eq!(fs::read_to_string(&image).unwrap(), *rel);
        assert!(sidecar_path(&image).exists(), "{rel}");
    }
    assert!(summary
        .outcomes
        .iter()
        .all(|o| o.status == Status::Defaced && o.sidecar == SidecarStatus::Copied));
}

#[tokio::test]
async fn test_partial_dataset_counts_missing() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("ds004021");
    let present = &TARGETS[..10];
    populate(&src, present);
    let config = RunConfig::new(&src, dir.path().join("out"), false, false, 3).unwrap();
    let defacer = Arc::new(CopyDefacer::default());

    let summary = run_batch(&config, defacer.clone(), TARGETS, |_| {})
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 10);
    assert_eq!(summary.failed, TARGETS.len() - 10);
    assert_eq!(summary.exit_code(), 1);
    assert_eq!(defacer.calls.load(Ordering::SeqCst), 10);
    for outcome in summary.outcomes.iter().filter(|o| !o.is_ok()) {
        assert!(outcome.message.starts_with("Missing source file: "));
        assert!(!present.contains(&outcome.rel.as_str()));
    }
}

#[tokio::test]
async fn test_rerun_with_skip_existing() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("ds004021");
    populate(&src, TARGETS);
    let out = dir.path().join("out");

    let first = RunConfig::new(&src, &out, false, false, 4).unwrap();
    run_batch(&first, Arc::new(CopyDefacer::default()), TARGETS, |_| {})
        .await
        .unwrap();

    let second = RunConfig::new(&src, &out, true, true, 4).unwrap();
    let defacer = Arc::new(CopyDefacer::default());
    let summary = run_batch(&second, defacer.clone(), TARGETS, |_| {})
        .await
        .unwrap();

    assert_eq!(defacer.calls.load(Ordering::SeqCst), 0);
    assert_eq!(summary.succeeded, TARGETS.len());
    assert!(summary.outcomes.iter().all(|o| o.status == Status::Skipped));
    assert!(TARGETS
        .iter()
        .all(|rel| sidecar_path(out.join(rel)).exists()));
}
