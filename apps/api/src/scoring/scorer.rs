//! Resume scoring — trait seam between the job pipeline and the LLM.
//!
//! Workers hold an `Arc<dyn ResumeScorer>`, so the pipeline can be exercised
//! with a mock scorer in tests and the backend swapped without touching the
//! worker loop or coordinator.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::llm_client::{LlmClient, LlmError};
use crate::scoring::prompts::{SCORING_PROMPT_TEMPLATE, SCORING_SYSTEM};

/// Highest score a single criterion can receive.
pub const MAX_CRITERION_SCORE: u32 = 5;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("scoring service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("malformed scoring response: {0}")]
    MalformedResponse(String),

    #[error("scoring request timed out")]
    Timeout,
}

impl From<LlmError> for ScoreError {
    fn from(e: LlmError) -> Self {
        match e {
            _ if e.is_timeout() => ScoreError::Timeout,
            LlmError::Parse(_) | LlmError::EmptyContent => {
                ScoreError::MalformedResponse(e.to_string())
            }
            _ => ScoreError::ServiceUnavailable(e.to_string()),
        }
    }
}

/// Scores one resume against an ordered criteria list, returning one score
/// per criterion in the same order. Implementations must be stateless and
/// safely callable from any number of concurrent workers.
#[async_trait]
pub trait ResumeScorer: Send + Sync {
    async fn score(&self, document_text: &str, criteria: &[String]) -> Result<Vec<u32>, ScoreError>;
}

#[derive(Debug, Deserialize)]
struct ScoresResponse {
    scores: Vec<u32>,
}

/// LLM-backed scorer. One call per resume; the model returns an array of
/// integer scores aligned to the criteria order.
pub struct LlmResumeScorer {
    llm: LlmClient,
}

impl LlmResumeScorer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeScorer for LlmResumeScorer {
    async fn score(&self, document_text: &str, criteria: &[String]) -> Result<Vec<u32>, ScoreError> {
        let criteria_json = serde_json::to_string(criteria)
            .map_err(|e| ScoreError::MalformedResponse(e.to_string()))?;

        let prompt = SCORING_PROMPT_TEMPLATE
            .replace("{criteria_count}", &criteria.len().to_string())
            .replace("{criteria_json}", &criteria_json)
            .replace("{resume_text}", document_text);

        let response: ScoresResponse = self.llm.call_json(&prompt, SCORING_SYSTEM).await?;

        validate_scores(&response.scores, criteria.len())?;
        Ok(response.scores)
    }
}

/// A Completed result must carry one in-range score per criterion; anything
/// else from the model is a malformed response, not a partial success.
fn validate_scores(scores: &[u32], criteria_count: usize) -> Result<(), ScoreError> {
    if scores.len() != criteria_count {
        return Err(ScoreError::MalformedResponse(format!(
            "expected {} scores, got {}",
            criteria_count,
            scores.len()
        )));
    }
    if let Some(out_of_range) = scores.iter().find(|s| **s > MAX_CRITERION_SCORE) {
        return Err(ScoreError::MalformedResponse(format!(
            "score {out_of_range} exceeds maximum of {MAX_CRITERION_SCORE}"
        )));
    }
    Ok(())
}
