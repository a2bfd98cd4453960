pub mod task;
pub mod worker;
pub use task::Task;
pub use worker::WorkerPool;
