//! # `bids-deface`
//!
//! Defaces the T1w images of OpenNeuro `ds004021` that were flagged as still
//! showing facial features, writing the results to a separate BIDS tree with
//! the same layout and filenames.
//!
//! The defacing itself is done by [`pydeface`](https://github.com/poldracklab/pydeface),
//! run once per image on a bounded pool of workers.
//!
//! ```no_run
//! use std::sync::Arc;
//! use bids_deface::{run_batch, PyDeface, RunConfig, TARGETS};
//!
//! # async fn run() -> bids_deface::Result<()> {
//! let config = RunConfig::new("/data/ds004021", "/data/ds004021_defaced", true, false, 8)?;
//! let defacer = Arc::new(PyDeface::locate("pydeface")?);
//! let summary = run_batch(&config, defacer, TARGETS, |outcome| println!("{outcome}")).await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod defacer;
pub mod error;
pub mod summary;
pub mod targets;
pub mod work;

pub use batch::{run_batch, DefaceTask};
pub use config::{Args, RunConfig};
pub use defacer::{DefaceResult, Defacer, PyDeface};
pub use error::{Error, Result};
pub use summary::{Summary, TaskOutcome};
pub use targets::TARGETS;
