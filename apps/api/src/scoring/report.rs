//! Final batch report: one row per submitted resume, in submission order.
//!
//! Rendering is a pure transform of the assembled report — CSV matching the
//! original spreadsheet layout, or the serde JSON form.

use serde::Serialize;
use uuid::Uuid;

/// One report row. Failed rows carry zero scores plus an error note.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRow {
    pub job_id: Uuid,
    pub candidate_name: String,
    pub scores: Vec<u32>,
    pub total_score: u32,
    pub error: Option<String>,
}

impl ScoreRow {
    pub fn failed(job_id: Uuid, candidate_name: String, criteria_count: usize, error: String) -> Self {
        Self {
            job_id,
            candidate_name,
            scores: vec![0; criteria_count],
            total_score: 0,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub criteria: Vec<String>,
    pub rows: Vec<ScoreRow>,
}

impl ScoreReport {
    /// Renders the report as CSV: a header of `Candidate Name`, one column
    /// per criterion, `Total Score`, and an `Error` column for failed rows.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();

        let mut header: Vec<String> = Vec::with_capacity(self.criteria.len() + 3);
        header.push("Candidate Name".to_string());
        header.extend(self.criteria.iter().cloned());
        header.push("Total Score".to_string());
        header.push("Error".to_string());
        push_csv_row(&mut out, &header);

        for row in &self.rows {
            let mut fields: Vec<String> = Vec::with_capacity(self.criteria.len() + 3);
            fields.push(row.candidate_name.clone());
            fields.extend(row.scores.iter().map(|s| s.to_string()));
            fields.push(row.total_score.to_string());
            fields.push(row.error.clone().unwrap_or_default());
            push_csv_row(&mut out, &fields);
        }

        out
    }
}

fn push_csv_row(out: &mut String, fields: &[String]) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        out.push_str(&csv_escape(field));
        first = false;
    }
    out.push_str("\r\n");
}

/// Quotes a field when it contains a delimiter, quote, or line break;
/// embedded quotes are doubled per RFC 4180.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
