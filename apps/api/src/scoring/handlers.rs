//! Axum route handlers for criteria extraction and batch resume scoring.

use axum::{
    extract::{Multipart, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extract::{candidate_name_from_filename, extract_text};
use crate::pipeline::coordinator::ResumeSubmission;
use crate::scoring::criteria::extract_criteria;
use crate::state::AppState;

/// Uploads above this size are rejected outright.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ExtractCriteriaResponse {
    pub criteria: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// "csv" (default) or "json".
    pub format: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /extract-criteria
///
/// Multipart body with one `file` field holding a job description document.
/// Extracts its text and returns the ranking criteria found in it.
pub async fn handle_extract_criteria(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractCriteriaResponse>, AppError> {
    let mut jd_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name().unwrap_or("") {
            "file" => {
                let file_name = field.file_name().unwrap_or("unknown").to_string();
                let data = read_field_bytes(field).await?;
                jd_text = Some(extract_text(&file_name, &data)?);
            }
            _ => {
                // Drain and ignore unknown fields.
                let _ = field.bytes().await;
            }
        }
    }

    let jd_text = jd_text
        .ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    if jd_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Job description contains no text".to_string(),
        ));
    }

    let criteria = extract_criteria(&jd_text, &state.llm).await?;
    Ok(Json(ExtractCriteriaResponse { criteria }))
}

/// POST /score-resumes?format=csv|json
///
/// Multipart body with a `criteria` text field (JSON array of strings) and
/// one or more `files` fields holding resumes. Blocks until the batch
/// resolves or times out, then renders the report — CSV by default.
///
/// A resume that cannot be read still gets a (Failed) row; only malformed
/// criteria or an empty batch reject the request up front.
pub async fn handle_score_resumes(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut criteria_field: Option<String> = None;
    let mut resumes: Vec<ResumeSubmission> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name().unwrap_or("") {
            "criteria" => {
                criteria_field = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Unreadable 'criteria' field: {e}"))
                })?);
            }
            "files" => {
                let file_name = field.file_name().unwrap_or("unknown").to_string();
                let candidate_name = candidate_name_from_filename(&file_name);
                let data = read_field_bytes(field).await?;
                resumes.push(match extract_text(&file_name, &data) {
                    Ok(text) => ResumeSubmission::extracted(candidate_name, text),
                    Err(e) => ResumeSubmission::unreadable(candidate_name, e),
                });
            }
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    let criteria_field = criteria_field
        .ok_or_else(|| AppError::Validation("Missing 'criteria' field".to_string()))?;
    let criteria = parse_criteria_field(&criteria_field)?;

    let report = state.coordinator.submit_batch(criteria, resumes).await?;

    match query.format.as_deref() {
        None | Some("csv") => Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=resume_scores.csv",
                ),
            ],
            report.to_csv(),
        )
            .into_response()),
        Some("json") => Ok(Json(report).into_response()),
        Some(other) => Err(AppError::Validation(format!(
            "Unknown report format '{other}' (expected 'csv' or 'json')"
        ))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_field_bytes(field: axum::extract::multipart::Field<'_>) -> Result<bytes::Bytes, AppError> {
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Unreadable file upload: {e}")))?;
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(format!(
            "File too large: maximum size is {} bytes",
            MAX_UPLOAD_BYTES
        )));
    }
    Ok(data)
}

/// The `criteria` form field carries a JSON array of strings, exactly as
/// returned by /extract-criteria.
fn parse_criteria_field(raw: &str) -> Result<Vec<String>, AppError> {
    serde_json::from_str::<Vec<String>>(raw)
        .map_err(|e| AppError::Validation(format!("Invalid criteria format: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_criteria_field_accepts_json_array() {
        let criteria = parse_criteria_field(r#"["cert A", "5+ yrs experience"]"#).unwrap();
        assert_eq!(criteria, vec!["cert A", "5+ yrs experience"]);
    }

    #[test]
    fn test_parse_criteria_field_rejects_non_array() {
        assert!(parse_criteria_field(r#"{"criteria": []}"#).is_err());
        assert!(parse_criteria_field("cert A").is_err());
    }

    #[test]
    fn test_parse_criteria_field_rejects_non_string_entries() {
        assert!(parse_criteria_field(r#"[1, 2]"#).is_err());
    }
}
