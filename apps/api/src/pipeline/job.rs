//! Data model for one unit of scoring work and its outcome.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One (resume, criteria) scoring unit of work.
///
/// Created at submission time, consumed exactly once by a worker, then
/// discarded. `job_id` is unique process-wide and never reused. The criteria
/// list is shared read-only across every job of the same batch.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub job_id: Uuid,
    pub candidate_name: String,
    pub document_text: String,
    pub criteria: Arc<Vec<String>>,
}

impl JobRecord {
    pub fn new(candidate_name: String, document_text: String, criteria: Arc<Vec<String>>) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            candidate_name,
            document_text,
            criteria,
        }
    }
}

/// Terminal state of a job. A job with no result record yet is Pending.
/// Terminal states are final; nothing reprocesses a job_id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum JobStatus {
    Completed,
    Failed(String),
}

/// Outcome of one job, written by a worker and read by polling coordinators.
///
/// Invariant: a Completed record has one score per criterion, in criteria
/// order, and `total_score` equal to their sum.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRecord {
    pub job_id: Uuid,
    pub candidate_name: String,
    pub per_criterion_scores: Vec<u32>,
    pub total_score: u32,
    pub status: JobStatus,
    pub completed_at: DateTime<Utc>,
}

impl ResultRecord {
    pub fn completed(job: &JobRecord, per_criterion_scores: Vec<u32>) -> Self {
        let total_score = per_criterion_scores.iter().sum();
        Self {
            job_id: job.job_id,
            candidate_name: job.candidate_name.clone(),
            per_criterion_scores,
            total_score,
            status: JobStatus::Completed,
            completed_at: Utc::now(),
        }
    }

    pub fn failed(job_id: Uuid, candidate_name: String, error: String) -> Self {
        Self {
            job_id,
            candidate_name,
            per_criterion_scores: Vec::new(),
            total_score: 0,
            status: JobStatus::Failed(error),
            completed_at: Utc::now(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, JobStatus::Failed(_))
    }
}
