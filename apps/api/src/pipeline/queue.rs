//! In-process job queue backed by an unbounded tokio channel.
//!
//! `push` never blocks; `pop` parks the calling worker until a job arrives
//! or shutdown is signalled. The receiver sits behind an async mutex so a
//! pool of workers can compete for jobs, each job delivered to exactly one.
//! Channel order is preserved, so jobs come out in submission order.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::pipeline::job::JobRecord;

#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::UnboundedSender<JobRecord>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<JobRecord>>>,
    shutdown: CancellationToken,
}

impl JobQueue {
    pub fn new(shutdown: CancellationToken) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
            shutdown,
        }
    }

    /// Enqueues a job. Never blocks; the only failure mode is a closed
    /// channel during shutdown, which is logged and dropped.
    pub fn push(&self, job: JobRecord) {
        if let Err(e) = self.tx.send(job) {
            warn!("Job {} dropped: queue is closed", e.0.job_id);
        }
    }

    /// Blocks until a job is available and returns it, or returns `None`
    /// once shutdown is signalled. Shutdown takes priority, so workers stop
    /// pulling new jobs even if the queue is non-empty.
    pub async fn pop(&self) -> Option<JobRecord> {
        let mut rx = self.rx.lock().await;
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => None,
            job = rx.recv() => job,
        }
    }
}
