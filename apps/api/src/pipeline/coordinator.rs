//! Batch coordinator: turns a batch of resumes into queued jobs, waits for
//! the worker pool to resolve them, and assembles the final report.
//!
//! The coordinator owns no mutable state of its own — the queue and store
//! carry all shared state behind their own synchronization. Any number of
//! coordinator invocations may run concurrently against the same pair.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::ExtractError;
use crate::pipeline::job::{JobRecord, JobStatus, ResultRecord};
use crate::pipeline::queue::JobQueue;
use crate::pipeline::store::ResultStore;
use crate::scoring::report::{ScoreReport, ScoreRow};

/// One resume handed to `submit_batch`. Extraction happens upstream; a
/// failed extraction still becomes a job (and a Failed report row) so the
/// rest of the batch proceeds.
#[derive(Debug)]
pub struct ResumeSubmission {
    pub candidate_name: String,
    pub text: Result<String, ExtractError>,
}

impl ResumeSubmission {
    pub fn extracted(candidate_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            candidate_name: candidate_name.into(),
            text: Ok(text.into()),
        }
    }

    pub fn unreadable(candidate_name: impl Into<String>, error: ExtractError) -> Self {
        Self {
            candidate_name: candidate_name.into(),
            text: Err(error),
        }
    }
}

#[derive(Clone)]
pub struct BatchCoordinator {
    queue: JobQueue,
    store: ResultStore,
    batch_timeout: Duration,
    poll_interval: Duration,
}

impl BatchCoordinator {
    pub fn new(
        queue: JobQueue,
        store: ResultStore,
        batch_timeout: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            queue,
            store,
            batch_timeout,
            poll_interval,
        }
    }

    /// Scores a batch of resumes against the criteria and returns one row
    /// per resume, in submission order.
    ///
    /// Blocks until every job resolves or the batch deadline elapses;
    /// unresolved jobs are reported as Failed with a timeout note rather
    /// than an error, so the caller always gets a report.
    pub async fn submit_batch(
        &self,
        criteria: Vec<String>,
        resumes: Vec<ResumeSubmission>,
    ) -> Result<ScoreReport, AppError> {
        validate_batch(&criteria, &resumes)?;

        let criteria = Arc::new(criteria);
        let mut batch: Vec<(Uuid, String)> = Vec::with_capacity(resumes.len());

        for submission in resumes {
            match submission.text {
                Ok(text) => {
                    let job = JobRecord::new(submission.candidate_name, text, Arc::clone(&criteria));
                    batch.push((job.job_id, job.candidate_name.clone()));
                    self.queue.push(job);
                }
                Err(e) => {
                    // Unreadable resume: recorded as already-failed, never enqueued.
                    let job_id = Uuid::new_v4();
                    warn!(
                        "Resume '{}' not scorable: {e}",
                        submission.candidate_name
                    );
                    self.store
                        .put(ResultRecord::failed(
                            job_id,
                            submission.candidate_name.clone(),
                            e.to_string(),
                        ))
                        .await;
                    batch.push((job_id, submission.candidate_name));
                }
            }
        }

        info!("Batch submitted: {} jobs", batch.len());

        let job_ids: Vec<Uuid> = batch.iter().map(|(id, _)| *id).collect();
        let results = self.await_batch(&job_ids).await;

        let report = assemble_report(&criteria, &batch, &results, self.batch_timeout);

        // Bound memory: this batch's records are no longer needed. A worker
        // finishing a timed-out job after this point re-inserts its record,
        // which stays until process exit.
        self.store.remove_many(&job_ids).await;

        Ok(report)
    }

    /// Waits until every job id has a result or the deadline passes,
    /// returning whatever resolved. Wakes on worker writes, with the poll
    /// interval as a bounded fallback — never a busy spin.
    async fn await_batch(&self, job_ids: &[Uuid]) -> HashMap<Uuid, ResultRecord> {
        let deadline = Instant::now() + self.batch_timeout;

        loop {
            let results = self.store.get_many(job_ids).await;
            if results.len() == job_ids.len() {
                return results;
            }

            let now = Instant::now();
            if now >= deadline {
                warn!(
                    "Batch deadline elapsed with {}/{} jobs resolved",
                    results.len(),
                    job_ids.len()
                );
                return results;
            }

            let wait = self.poll_interval.min(deadline - now);
            self.store.wait_for_put(wait).await;
        }
    }
}

fn validate_batch(criteria: &[String], resumes: &[ResumeSubmission]) -> Result<(), AppError> {
    if criteria.is_empty() {
        return Err(AppError::Validation(
            "criteria must be a non-empty list".to_string(),
        ));
    }
    if criteria.iter().any(|c| c.trim().is_empty()) {
        return Err(AppError::Validation(
            "criteria must not contain empty entries".to_string(),
        ));
    }
    if resumes.is_empty() {
        return Err(AppError::Validation(
            "at least one resume is required".to_string(),
        ));
    }
    Ok(())
}

/// Builds the report in original submission order. Completion order is
/// irrelevant here: rows are driven off the submitted batch, not the store.
fn assemble_report(
    criteria: &[String],
    batch: &[(Uuid, String)],
    results: &HashMap<Uuid, ResultRecord>,
    batch_timeout: Duration,
) -> ScoreReport {
    let rows = batch
        .iter()
        .map(|(job_id, candidate_name)| match results.get(job_id) {
            Some(record) => match &record.status {
                JobStatus::Completed => ScoreRow {
                    job_id: *job_id,
                    candidate_name: candidate_name.clone(),
                    scores: record.per_criterion_scores.clone(),
                    total_score: record.total_score,
                    error: None,
                },
                JobStatus::Failed(error) => ScoreRow::failed(
                    *job_id,
                    candidate_name.clone(),
                    criteria.len(),
                    error.clone(),
                ),
            },
            None => ScoreRow::failed(
                *job_id,
                candidate_name.clone(),
                criteria.len(),
                format!(
                    "timed out waiting for score after {}s",
                    batch_timeout.as_secs()
                ),
            ),
        })
        .collect();

    ScoreReport {
        criteria: criteria.to_vec(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::worker::spawn_workers;
    use crate::scoring::scorer::{ResumeScorer, ScoreError};
    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    /// Scorer scripted through the document text itself:
    /// - "scores:a,b,c" returns those scores
    /// - "hang" never returns
    /// - "slow" sleeps before scoring
    /// - anything else scores 1 per criterion
    struct ScriptedScorer;

    #[async_trait]
    impl ResumeScorer for ScriptedScorer {
        async fn score(
            &self,
            document_text: &str,
            criteria: &[String],
        ) -> Result<Vec<u32>, ScoreError> {
            if document_text.contains("hang") {
                std::future::pending::<()>().await;
            }
            if document_text.contains("slow") {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            if let Some(encoded) = document_text.split("scores:").nth(1) {
                let scores = encoded
                    .split_whitespace()
                    .next()
                    .unwrap_or("")
                    .split(',')
                    .map(|s| s.parse().expect("bad scripted score"))
                    .collect();
                return Ok(scores);
            }
            Ok(vec![1; criteria.len()])
        }
    }

    fn setup(workers: usize) -> (BatchCoordinator, ResultStore, CancellationToken) {
        let token = CancellationToken::new();
        let queue = JobQueue::new(token.clone());
        let store = ResultStore::new();
        let scorer: Arc<dyn ResumeScorer> = Arc::new(ScriptedScorer);
        spawn_workers(workers, &queue, &store, &scorer);
        let coordinator = BatchCoordinator::new(
            queue,
            store.clone(),
            Duration::from_secs(2),
            Duration::from_millis(50),
        );
        (coordinator, store, token)
    }

    fn criteria() -> Vec<String> {
        vec!["cert A".to_string(), "5+ yrs experience".to_string()]
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_scores_in_submission_order() {
        let (coordinator, _store, token) = setup(2);

        let report = coordinator
            .submit_batch(
                criteria(),
                vec![
                    ResumeSubmission::extracted("Alice", "scores:1,1"),
                    ResumeSubmission::extracted("Bob", "scores:0,1"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].candidate_name, "Alice");
        assert_eq!(report.rows[0].scores, vec![1, 1]);
        assert_eq!(report.rows[0].total_score, 2);
        assert_eq!(report.rows[1].candidate_name, "Bob");
        assert_eq!(report.rows[1].scores, vec![0, 1]);
        assert_eq!(report.rows[1].total_score, 1);
        token.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_order_does_not_leak_into_report() {
        let (coordinator, _store, token) = setup(2);

        // Alice finishes last, but still leads the report.
        let report = coordinator
            .submit_batch(
                criteria(),
                vec![
                    ResumeSubmission::extracted("Alice", "slow scores:1,1"),
                    ResumeSubmission::extracted("Bob", "scores:0,1"),
                ],
            )
            .await
            .unwrap();

        let names: Vec<&str> = report
            .rows
            .iter()
            .map(|r| r.candidate_name.as_str())
            .collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        token.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_job_times_out_without_blocking_siblings() {
        let (coordinator, _store, token) = setup(2);

        let report = coordinator
            .submit_batch(
                criteria(),
                vec![
                    ResumeSubmission::extracted("Alice", "scores:1,1"),
                    ResumeSubmission::extracted("Bob", "hang"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(report.rows[0].total_score, 2);
        assert!(report.rows[0].error.is_none());

        let bob = &report.rows[1];
        assert_eq!(bob.scores, vec![0, 0]);
        assert!(bob.error.as_deref().unwrap().contains("timed out"));
        token.cancel();
    }

    #[tokio::test]
    async fn test_empty_resumes_rejected_before_enqueue() {
        let (coordinator, store, token) = setup(1);

        let err = coordinator
            .submit_batch(criteria(), Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.is_empty().await);
        token.cancel();
    }

    #[tokio::test]
    async fn test_empty_criteria_rejected() {
        let (coordinator, store, token) = setup(1);

        let err = coordinator
            .submit_batch(
                Vec::new(),
                vec![ResumeSubmission::extracted("Alice", "text")],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.is_empty().await);
        token.cancel();
    }

    #[tokio::test]
    async fn test_blank_criterion_rejected() {
        let (coordinator, _store, token) = setup(1);

        let err = coordinator
            .submit_batch(
                vec!["cert A".to_string(), "  ".to_string()],
                vec![ResumeSubmission::extracted("Alice", "text")],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        token.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreadable_resume_fails_without_stopping_batch() {
        let (coordinator, _store, token) = setup(1);

        let report = coordinator
            .submit_batch(
                criteria(),
                vec![
                    ResumeSubmission::unreadable(
                        "Mallory",
                        ExtractError::UnsupportedFormat("odt".to_string()),
                    ),
                    ResumeSubmission::extracted("Alice", "scores:1,1"),
                ],
            )
            .await
            .unwrap();

        let mallory = &report.rows[0];
        assert!(mallory.error.as_deref().unwrap().contains("odt"));
        assert_eq!(mallory.total_score, 0);
        assert_eq!(report.rows[1].total_score, 2);
        token.cancel();
    }

    #[tokio::test]
    async fn test_all_unreadable_batch_resolves_without_workers() {
        // No workers at all: pre-failed records resolve the batch on the
        // first store check.
        let token = CancellationToken::new();
        let coordinator = BatchCoordinator::new(
            JobQueue::new(token.clone()),
            ResultStore::new(),
            Duration::from_secs(2),
            Duration::from_millis(50),
        );

        let report = coordinator
            .submit_batch(
                criteria(),
                vec![ResumeSubmission::unreadable(
                    "Mallory",
                    ExtractError::CorruptDocument("truncated".to_string()),
                )],
            )
            .await
            .unwrap();

        assert_eq!(report.rows.len(), 1);
        assert!(report.rows[0].error.as_deref().unwrap().contains("truncated"));
        token.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_batches_do_not_cross_contaminate() {
        let (coordinator, _store, token) = setup(2);
        let other = coordinator.clone();

        let (left, right) = tokio::join!(
            coordinator.submit_batch(
                criteria(),
                vec![
                    ResumeSubmission::extracted("Alice", "scores:1,1"),
                    ResumeSubmission::extracted("Bob", "scores:0,1"),
                ],
            ),
            other.submit_batch(
                criteria(),
                vec![
                    ResumeSubmission::extracted("Carol", "scores:2,2"),
                    ResumeSubmission::extracted("Dave", "scores:3,3"),
                ],
            ),
        );

        let left = left.unwrap();
        let right = right.unwrap();

        let left_names: Vec<&str> = left.rows.iter().map(|r| r.candidate_name.as_str()).collect();
        let right_names: Vec<&str> =
            right.rows.iter().map(|r| r.candidate_name.as_str()).collect();
        assert_eq!(left_names, vec!["Alice", "Bob"]);
        assert_eq!(right_names, vec!["Carol", "Dave"]);
        assert_eq!(right.rows[0].total_score, 4);
        token.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_entries_evicted_after_report() {
        let (coordinator, store, token) = setup(1);

        let report = coordinator
            .submit_batch(
                criteria(),
                vec![ResumeSubmission::extracted("Alice", "scores:1,1")],
            )
            .await
            .unwrap();

        assert!(store.get(report.rows[0].job_id).await.is_none());
        token.cancel();
    }
}
