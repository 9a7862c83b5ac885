//! Axum route handlers for the skills API.

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::resume::{NewResume, ResumeRow};
use crate::skills::aggregation::aggregate_related_skills;
use crate::skills::extraction::{extract_skills, ExtractionIssue};
use crate::skills::insights::{analyze_market_demand, generate_roadmap, suggest_projects};
use crate::skills::recommendation::{
    recommend_skills, EXTRACT_ENDPOINT_CAP, RECOMMEND_ENDPOINT_CAP,
};
use crate::state::AppState;

const DEFAULT_RELATED_TOP_N: usize = 10;
const MAX_RELATED_TOP_N: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Body shared by the skill-list endpoints. `skills` may be a list or a single
/// string; `skill` is accepted as an alias.
#[derive(Debug, Default, Deserialize)]
pub struct SkillsRequest {
    #[serde(default)]
    pub skills: Option<Value>,
    #[serde(default)]
    pub skill: Option<Value>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub skills: Option<Value>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractSkillsResponse {
    pub status: &'static str,
    pub data: ResumeRow,
    pub extracted_skills: Vec<String>,
    pub recommended_skills: Vec<String>,
    pub extraction_issue: Option<ExtractionIssue>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommended_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RelatedResponse {
    pub related_skills: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Input parsing
// ────────────────────────────────────────────────────────────────────────────

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

/// `skills` (or `skill`) as a trimmed, lower-cased list. A bare string is a
/// one-element list; numbers are taken as their text; blanks are dropped.
pub fn parse_skill_list(skills: Option<Value>, skill: Option<Value>) -> Result<Vec<String>, AppError> {
    let raw = skills
        .filter(|v| !is_blank(v))
        .or_else(|| skill.filter(|v| !is_blank(v)));

    let items = match raw {
        Some(Value::String(s)) => vec![Value::String(s)],
        Some(Value::Array(items)) => items,
        _ => return Err(AppError::bad_request("Skill(s) is required")),
    };

    let skills: Vec<String> = items
        .iter()
        .filter(|item| !is_blank(item))
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_lowercase()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect();

    if skills.is_empty() {
        return Err(AppError::bad_request("No valid skills provided"));
    }
    Ok(skills)
}

/// `/skill-recommend` is stricter: a missing list is empty, anything else but a
/// list is rejected, and only string entries count.
fn parse_existing_skills(skills: Option<Value>) -> Result<Vec<String>, AppError> {
    match skills {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect()),
        Some(_) => Err(AppError::bad_request("skills must be a list")),
    }
}

fn clean_role(role: Option<String>) -> Option<String> {
    role.map(|r| r.trim().to_string()).filter(|r| !r.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /extract-skills
///
/// Multipart upload (`file`, optional `role`). Extracts skills from the PDF,
/// recommends more when a role is given, and records the result.
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ExtractSkillsResponse>), AppError> {
    let Ok(mut multipart) = multipart else {
        return Err(AppError::bad_request("No file provided"));
    };

    let mut upload: Option<(String, Bytes)> = None;
    let mut role: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let data = field.bytes().await?;
                upload = Some((file_name, data));
            }
            "role" => role = Some(field.text().await?),
            _ => {}
        }
    }

    let Some((file_name, document)) = upload.filter(|(_, data)| !data.is_empty()) else {
        return Err(AppError::bad_request("No file provided"));
    };
    let role = clean_role(role);

    let text = state.documents.extract_text(document).await.map_err(|e| {
        warn!("Unreadable upload {file_name}: {e}");
        AppError::bad_request("Could not extract text from PDF")
    })?;

    let extraction = extract_skills(&state.chain, &text, state.config.max_resume_chars).await?;

    let recommended = match role.as_deref() {
        Some(role) if !extraction.skills.is_empty() => {
            recommend_skills(&state.chain, &extraction.skills, Some(role), EXTRACT_ENDPOINT_CAP)
                .await?
        }
        _ => Vec::new(),
    };

    let record = state
        .resumes
        .create_resume(NewResume::new(
            &file_name,
            role.as_deref(),
            &extraction.skills,
            &recommended,
        ))
        .await?;

    info!(
        "Resume {} ({}): {} skills, {} recommendations",
        record.id,
        record.file_name,
        extraction.skills.len(),
        recommended.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(ExtractSkillsResponse {
            status: "success",
            data: record,
            extracted_skills: extraction.skills,
            recommended_skills: recommended,
            extraction_issue: extraction.issue,
        }),
    ))
}

/// POST /skill-roadmap
pub async fn handle_skill_roadmap(
    State(state): State<AppState>,
    payload: Result<Json<SkillsRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(request) = payload?;
    let skills = parse_skill_list(request.skills, request.skill)?;
    Ok(Json(generate_roadmap(&state.chain, &skills).await?))
}

/// POST /skill-market-analysis
pub async fn handle_market_analysis(
    State(state): State<AppState>,
    payload: Result<Json<SkillsRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(request) = payload?;
    let skills = parse_skill_list(request.skills, request.skill)?;
    Ok(Json(analyze_market_demand(&state.chain, &skills).await?))
}

/// POST /skill-projects
pub async fn handle_skill_projects(
    State(state): State<AppState>,
    payload: Result<Json<SkillsRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(request) = payload?;
    let skills = parse_skill_list(request.skills, request.skill)?;
    let role = clean_role(request.role);
    Ok(Json(
        suggest_projects(&state.chain, &skills, role.as_deref()).await?,
    ))
}

/// POST /skill-recommend
pub async fn handle_skill_recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, AppError> {
    let Json(request) = payload?;
    let existing = parse_existing_skills(request.skills)?;
    let role = clean_role(request.role);

    let recommended_skills =
        recommend_skills(&state.chain, &existing, role.as_deref(), RECOMMEND_ENDPOINT_CAP).await?;

    Ok(Json(RecommendResponse { recommended_skills }))
}

/// POST /skill-related
///
/// Related skills ranked by summed taxonomy relevance across the given skills.
pub async fn handle_skill_related(
    State(state): State<AppState>,
    payload: Result<Json<SkillsRequest>, JsonRejection>,
) -> Result<Json<RelatedResponse>, AppError> {
    let Json(request) = payload?;
    let skills = parse_skill_list(request.skills, request.skill)?;
    let top_n = request
        .top_n
        .unwrap_or(DEFAULT_RELATED_TOP_N)
        .clamp(1, MAX_RELATED_TOP_N);

    let related_skills = aggregate_related_skills(state.taxonomy.as_ref(), &skills, top_n).await;
    Ok(Json(RelatedResponse { related_skills }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bad_request_message(err: AppError) -> String {
        match err {
            AppError::BadRequest(message) => message,
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[test]
    fn test_single_string_and_alias() {
        assert_eq!(
            parse_skill_list(None, Some(json!("  Rust "))).unwrap(),
            vec!["rust"]
        );
        assert_eq!(
            parse_skill_list(Some(json!([])), Some(json!(["SQL"]))).unwrap(),
            vec!["sql"]
        );
    }

    #[test]
    fn test_list_normalization_drops_blanks() {
        let skills = parse_skill_list(Some(json!(["Python", "", "  ", null, 3, "Docker "])), None)
            .unwrap();
        assert_eq!(skills, vec!["python", "3", "docker"]);
    }

    #[test]
    fn test_missing_or_wrong_type_is_required_error() {
        let err = parse_skill_list(None, None).unwrap_err();
        assert_eq!(bad_request_message(err), "Skill(s) is required");
        let err = parse_skill_list(Some(json!({"a": 1})), None).unwrap_err();
        assert_eq!(bad_request_message(err), "Skill(s) is required");
    }

    #[test]
    fn test_all_blank_entries_is_no_valid_skills() {
        let err = parse_skill_list(Some(json!(["  ", null])), None).unwrap_err();
        assert_eq!(bad_request_message(err), "No valid skills provided");
    }

    #[test]
    fn test_recommend_skills_must_be_a_list() {
        assert!(parse_existing_skills(None).unwrap().is_empty());
        assert_eq!(
            parse_existing_skills(Some(json!(["Rust", 4]))).unwrap(),
            vec!["Rust"]
        );
        let err = parse_existing_skills(Some(json!("Rust"))).unwrap_err();
        assert_eq!(bad_request_message(err), "skills must be a list");
    }
}
