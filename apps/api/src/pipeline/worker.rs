//! Background worker loop: pop a job, score it, record the outcome.
//!
//! Every popped job produces a result record — Completed with scores, or
//! Failed with the error description — so a polling coordinator never waits
//! on a job that silently vanished. A failing job never stops the loop.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::pipeline::job::ResultRecord;
use crate::pipeline::queue::JobQueue;
use crate::pipeline::store::ResultStore;
use crate::scoring::scorer::ResumeScorer;

pub struct Worker {
    id: usize,
    queue: JobQueue,
    store: ResultStore,
    scorer: Arc<dyn ResumeScorer>,
}

impl Worker {
    pub fn new(id: usize, queue: JobQueue, store: ResultStore, scorer: Arc<dyn ResumeScorer>) -> Self {
        Self {
            id,
            queue,
            store,
            scorer,
        }
    }

    /// Runs until the queue signals shutdown.
    pub async fn run(self) {
        info!("Scoring worker {} started", self.id);
        while let Some(job) = self.queue.pop().await {
            let record = match self.scorer.score(&job.document_text, &job.criteria).await {
                Ok(scores) => ResultRecord::completed(&job, scores),
                Err(e) => {
                    error!("Job {} ({}) failed: {e}", job.job_id, job.candidate_name);
                    ResultRecord::failed(job.job_id, job.candidate_name, e.to_string())
                }
            };
            self.store.put(record).await;
        }
        info!("Scoring worker {} stopped", self.id);
    }
}

/// Spawns a pool of `count` workers competing on the same queue. Per-job
/// failure isolation is what makes N > 1 safe without further coordination.
pub fn spawn_workers(
    count: usize,
    queue: &JobQueue,
    store: &ResultStore,
    scorer: &Arc<dyn ResumeScorer>,
) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|id| {
            let worker = Worker::new(id, queue.clone(), store.clone(), Arc::clone(scorer));
            tokio::spawn(worker.run())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::job::{JobRecord, JobStatus};
    use crate::scoring::scorer::ScoreError;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    /// Scores every criterion 1, except candidates named "broken", which
    /// fail with a service error.
    struct ScriptedScorer;

    #[async_trait]
    impl ResumeScorer for ScriptedScorer {
        async fn score(
            &self,
            document_text: &str,
            criteria: &[String],
        ) -> Result<Vec<u32>, ScoreError> {
            if document_text.contains("broken") {
                return Err(ScoreError::ServiceUnavailable("scripted outage".to_string()));
            }
            Ok(vec![1; criteria.len()])
        }
    }

    fn job(name: &str, text: &str) -> JobRecord {
        JobRecord::new(
            name.to_string(),
            text.to_string(),
            Arc::new(vec!["cert A".to_string(), "5+ yrs experience".to_string()]),
        )
    }

    async fn wait_for(store: &ResultStore, job_id: uuid::Uuid) -> ResultRecord {
        for _ in 0..100 {
            if let Some(record) = store.get(job_id).await {
                return record;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("no result for job {job_id}");
    }

    #[tokio::test]
    async fn test_worker_writes_completed_record() {
        let token = CancellationToken::new();
        let queue = JobQueue::new(token.clone());
        let store = ResultStore::new();
        let scorer: Arc<dyn ResumeScorer> = Arc::new(ScriptedScorer);
        spawn_workers(1, &queue, &store, &scorer);

        let j = job("Alice", "rust resume");
        let id = j.job_id;
        queue.push(j);

        let record = wait_for(&store, id).await;
        assert_eq!(record.status, JobStatus::Completed);
        assert_eq!(record.per_criterion_scores, vec![1, 1]);
        assert_eq!(record.total_score, 2);
        token.cancel();
    }

    #[tokio::test]
    async fn test_worker_writes_failed_record_on_scorer_error() {
        let token = CancellationToken::new();
        let queue = JobQueue::new(token.clone());
        let store = ResultStore::new();
        let scorer: Arc<dyn ResumeScorer> = Arc::new(ScriptedScorer);
        spawn_workers(1, &queue, &store, &scorer);

        let j = job("Bob", "broken resume");
        let id = j.job_id;
        queue.push(j);

        let record = wait_for(&store, id).await;
        assert!(record.is_failed());
        assert!(matches!(
            record.status,
            JobStatus::Failed(ref msg) if msg.contains("scripted outage")
        ));
        token.cancel();
    }

    #[tokio::test]
    async fn test_failing_job_does_not_stall_the_loop() {
        let token = CancellationToken::new();
        let queue = JobQueue::new(token.clone());
        let store = ResultStore::new();
        let scorer: Arc<dyn ResumeScorer> = Arc::new(ScriptedScorer);
        spawn_workers(1, &queue, &store, &scorer);

        let bad = job("Bob", "broken resume");
        let good = job("Alice", "rust resume");
        let (bad_id, good_id) = (bad.job_id, good.job_id);
        queue.push(bad);
        queue.push(good);

        // The job behind the failure still completes.
        let record = wait_for(&store, good_id).await;
        assert_eq!(record.status, JobStatus::Completed);
        assert!(wait_for(&store, bad_id).await.is_failed());
        token.cancel();
    }
}
