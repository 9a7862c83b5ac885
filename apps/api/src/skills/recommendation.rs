//! Role-conditioned skill recommendations.

use tracing::info;

use crate::errors::AppError;
use crate::intelligence::{FallbackChain, GenerationRequest, SkillTask};
use crate::skills::json_recovery::string_list;
use crate::skills::normalize::{exclude_known, normalize_skills, SkillSet};
use crate::skills::prompts::skill_recommendation_prompt;

/// Recommendations returned alongside a resume upload.
pub const EXTRACT_ENDPOINT_CAP: usize = 8;
/// Recommendations returned by `/skill-recommend`.
pub const RECOMMEND_ENDPOINT_CAP: usize = 5;

const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.3;

/// Skills worth adding for `role`, never repeating one in `existing` (any casing),
/// in model order, at most `cap`. A reply that only repeats existing skills counts
/// as unusable and the next backend is tried.
pub async fn recommend_skills(
    chain: &FallbackChain,
    existing: &[String],
    role: Option<&str>,
    cap: usize,
) -> Result<Vec<String>, AppError> {
    let existing = normalize_skills(existing);
    let known: SkillSet = existing.iter().collect();
    let role = role.map(str::trim).filter(|r| !r.is_empty());

    let request = GenerationRequest {
        prompt: skill_recommendation_prompt(&existing, role, cap)?,
        task: SkillTask::Recommendation {
            existing,
            role: role.map(str::to_string),
            limit: cap,
        },
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    };

    let resolved = chain
        .resolve("skill_recommendation", &request, |value| {
            string_list(&value)
                .map(|candidates| exclude_known(candidates, &known, cap))
                .filter(|fresh| !fresh.is_empty())
        })
        .await;

    Ok(match resolved {
        Some(resolved) => {
            info!(
                "Recommended {} skills via {}",
                resolved.value.len(),
                resolved.backend
            );
            resolved.value
        }
        None => Vec::new(),
    })
}
