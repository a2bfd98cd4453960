use crate::work::task::Task;
use crate::Result;
use flume::{Receiver, Sender};
use tokio::task::{spawn_blocking, JoinHandle};

#[derive(Debug)]
pub struct Worker {
    join_handle: JoinHandle<()>,
}

impl Worker {
    pub(crate) fn new<T: Task>(receiver: Receiver<Box<T>>, results: Sender<T::Output>) -> Self {
        let join_handle = spawn_blocking(move || {
            while let Ok(task) = receiver.recv() {
                tracing::debug!("Processing task {:?}", task);
                if results.send(task.process()).is_err() {
                    // Nobody is listening anymore
                    break;
                }
            }
        });
        Self { join_handle }
    }

    pub(crate) async fn join(self) -> std::result::Result<(), tokio::task::JoinError> {
        self.join_handle.await
    }
}

/// Fixed-size pool of blocking workers pulling from a shared task channel.
#[derive(Debug)]
pub struct WorkerPool<T: Task> {
    workers: Vec<Worker>,
    task_sender: Sender<Box<T>>,
    result_receiver: Receiver<T::Output>,
}

impl<T: Task> WorkerPool<T> {
    /// Spawns `num_workers` workers, at least one.
    pub fn new(num_workers: usize) -> Self {
        let (task_sender, task_receiver) = flume::unbounded::<Box<T>>();
        let (result_sender, result_receiver) = flume::unbounded::<T::Output>();

        let workers = (0..num_workers.max(1))
            .map(|_| Worker::new(task_receiver.clone(), result_sender.clone()))
            .collect::<Vec<_>>();

        Self {
            workers,
            task_sender,
            result_receiver,
        }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Submits every task, then hands each output to `on_result` in
    /// completion order. Returns once all workers have exited.
    pub async fn run<I, F>(self, tasks: I, mut on_result: F) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(T::Output),
    {
        let Self {
            workers,
            task_sender,
            result_receiver,
        } = self;

        for task in tasks {
            // Workers hold the receiver until the sender is dropped below.
            if task_sender.send(Box::new(task)).is_err() {
                tracing::error!("Failed to send task to worker");
                break;
            }
        }
        drop(task_sender);

        while let Ok(output) = result_receiver.recv_async().await {
            on_result(output);
        }

        for worker in workers {
            worker.join().await?;
        }
        Ok(())
    }
}
