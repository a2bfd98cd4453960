use std::fmt::Debug;

/// A unit of blocking work executed by a [`WorkerPool`](super::worker::WorkerPool).
pub trait Task: Debug + Send + 'static {
    type Output: Send + 'static;

    fn process(&self) -> Self::Output;
}
