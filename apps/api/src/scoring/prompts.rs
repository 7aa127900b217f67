// All LLM prompt constants for the Scoring module. Each service that needs
// LLM calls defines its own prompts.rs alongside it.

/// System prompt for criteria extraction — enforces JSON-only output.
pub const CRITERIA_SYSTEM: &str =
    "You are an HR expert. Extract ranking criteria from a job description. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Criteria extraction prompt template. Replace `{jd_text}` before sending.
pub const CRITERIA_PROMPT_TEMPLATE: &str = r#"Extract key ranking criteria from the following job description.
Include required skills, certifications, experience, and qualifications.

Return a JSON object with this EXACT schema (no extra fields):
{
  "criteria": [
    "Certification XYZ",
    "5+ years of experience in Python development"
  ]
}

Each criterion must be a short, self-contained requirement a resume can be
scored against. Do not merge unrelated requirements into one criterion.

JOB DESCRIPTION:
{jd_text}"#;

/// System prompt for resume scoring — enforces JSON-only output.
pub const SCORING_SYSTEM: &str =
    "You are an HR expert who scores resumes based on given criteria. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Resume scoring prompt template.
/// Replace: {resume_text}, {criteria_json}, {criteria_count}
pub const SCORING_PROMPT_TEMPLATE: &str = r#"Score the following resume against the given criteria.
For each criterion, assign an integer score from 0 (no evidence) to 5 (fully satisfied).

Return a JSON object with this EXACT schema (no extra fields):
{
  "scores": [4, 0, 2]
}

RULES:
- "scores" must contain exactly {criteria_count} integers, one per criterion,
  in the SAME ORDER as the criteria list below.
- Score only from evidence in the resume text. Do not infer unstated skills.

CRITERIA:
{criteria_json}

RESUME TEXT:
{resume_text}"#;
