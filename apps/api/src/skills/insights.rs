//! Roadmaps, market analysis and project ideas. Each passes the provider's JSON
//! through once its top-level shape checks out, and falls back to an empty
//! document of the same shape.

use serde_json::{json, Value};

use crate::errors::AppError;
use crate::intelligence::{FallbackChain, GenerationRequest, SkillTask};
use crate::skills::prompts::{market_analysis_prompt, project_ideas_prompt, skill_roadmap_prompt};

/// `value` when `value[key]` passes `check`.
fn keyed(value: Value, key: &str, check: fn(&Value) -> bool) -> Option<Value> {
    value.get(key).is_some_and(check).then_some(value)
}

async fn resolve_document(
    chain: &FallbackChain,
    operation: &str,
    request: GenerationRequest,
    key: &'static str,
    check: fn(&Value) -> bool,
    fallback: Value,
) -> Value {
    chain
        .resolve(operation, &request, |value| keyed(value, key, check))
        .await
        .map(|resolved| resolved.value)
        .unwrap_or(fallback)
}

pub async fn generate_roadmap(chain: &FallbackChain, skills: &[String]) -> Result<Value, AppError> {
    let request = GenerationRequest {
        prompt: skill_roadmap_prompt(skills)?,
        task: SkillTask::Roadmap {
            skills: skills.to_vec(),
        },
        max_tokens: 2500,
        temperature: 0.7,
    };
    Ok(resolve_document(
        chain,
        "skill_roadmap",
        request,
        "roadmap",
        Value::is_object,
        json!({ "roadmap": {} }),
    )
    .await)
}

pub async fn analyze_market_demand(
    chain: &FallbackChain,
    skills: &[String],
) -> Result<Value, AppError> {
    let request = GenerationRequest {
        prompt: market_analysis_prompt(skills)?,
        task: SkillTask::MarketAnalysis {
            skills: skills.to_vec(),
        },
        max_tokens: 2000,
        temperature: 0.5,
    };
    Ok(resolve_document(
        chain,
        "market_analysis",
        request,
        "skills",
        Value::is_object,
        json!({ "skills": {} }),
    )
    .await)
}

pub async fn suggest_projects(
    chain: &FallbackChain,
    skills: &[String],
    role: Option<&str>,
) -> Result<Value, AppError> {
    let request = GenerationRequest {
        prompt: project_ideas_prompt(skills, role)?,
        task: SkillTask::ProjectIdeas {
            skills: skills.to_vec(),
            role: role.map(str::to_string),
        },
        max_tokens: 1500,
        temperature: 0.7,
    };
    Ok(resolve_document(
        chain,
        "project_ideas",
        request,
        "projects",
        Value::is_array,
        json!({ "projects": [] }),
    )
    .await)
}
