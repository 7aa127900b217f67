//! Criteria extraction — turns a job description into an ordered list of
//! ranking criteria via the LLM.

use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::scoring::prompts::{CRITERIA_PROMPT_TEMPLATE, CRITERIA_SYSTEM};

#[derive(Debug, Deserialize)]
struct CriteriaResponse {
    criteria: Vec<String>,
}

/// Extracts ranking criteria from a job description. Order is preserved as
/// returned by the model; blank entries are dropped.
pub async fn extract_criteria(jd_text: &str, llm: &LlmClient) -> Result<Vec<String>, AppError> {
    let prompt = CRITERIA_PROMPT_TEMPLATE.replace("{jd_text}", jd_text);

    let response: CriteriaResponse = llm
        .call_json(&prompt, CRITERIA_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Criteria extraction failed: {e}")))?;

    let criteria = clean_criteria(response.criteria);
    if criteria.is_empty() {
        return Err(AppError::Llm(
            "Criteria extraction returned no criteria".to_string(),
        ));
    }

    info!("Extracted {} criteria from job description", criteria.len());
    Ok(criteria)
}

fn clean_criteria(raw: Vec<String>) -> Vec<String> {
    raw.into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}
