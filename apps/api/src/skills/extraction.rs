//! Resume text to a normalized skill list.

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::intelligence::{BackendKind, FallbackChain, GenerationRequest, SkillTask};
use crate::skills::json_recovery::string_list;
use crate::skills::normalize::{normalize_skills, split_loose_list};
use crate::skills::prompts::skill_extraction_prompt;
use crate::skills::redaction::redact_sensitive;

const MAX_TOKENS: u32 = 400;
const TEMPERATURE: f32 = 0.0;

/// Why an extraction came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionIssue {
    /// The document held no readable text.
    BadRead,
    /// Over the configured character limit; never truncated.
    InputTooLong,
    /// Text was readable but no backend found a skill in it.
    NoSkillsFound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillExtraction {
    pub skills: Vec<String>,
    pub issue: Option<ExtractionIssue>,
    /// Which backend produced the list; `None` when no model was asked.
    pub backend: Option<BackendKind>,
}

impl SkillExtraction {
    fn empty(issue: ExtractionIssue, backend: Option<BackendKind>) -> Self {
        Self {
            skills: Vec::new(),
            issue: Some(issue),
            backend,
        }
    }
}

/// Model-side problems never surface as errors here; the chain degrades down to the
/// heuristic backend. Only a broken prompt template is an error.
pub async fn extract_skills(
    chain: &FallbackChain,
    resume_text: &str,
    max_chars: usize,
) -> Result<SkillExtraction, AppError> {
    if resume_text.trim().is_empty() {
        return Ok(SkillExtraction::empty(ExtractionIssue::BadRead, None));
    }

    let length = resume_text.chars().count();
    if length > max_chars {
        info!("Resume text is {length} chars (limit {max_chars}); skipping extraction");
        return Ok(SkillExtraction::empty(ExtractionIssue::InputTooLong, None));
    }

    let redacted = redact_sensitive(resume_text);
    let request = GenerationRequest {
        prompt: skill_extraction_prompt(&redacted)?,
        task: SkillTask::Extraction {
            resume_text: redacted,
        },
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    };

    let resolved = chain
        .resolve_with_salvage(
            "skill_extraction",
            &request,
            |value| string_list(&value).map(normalize_skills),
            |text| Some(split_loose_list(text)).filter(|skills| !skills.is_empty()),
        )
        .await;

    let Some(resolved) = resolved else {
        return Ok(SkillExtraction::empty(ExtractionIssue::NoSkillsFound, None));
    };

    let issue = resolved
        .value
        .is_empty()
        .then_some(ExtractionIssue::NoSkillsFound);

    info!(
        "Extracted {} skills via {}{}",
        resolved.value.len(),
        resolved.backend,
        if resolved.salvaged { " (salvaged)" } else { "" }
    );

    Ok(SkillExtraction {
        skills: resolved.value,
        issue,
        backend: Some(resolved.backend),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{heuristic, ScriptedBackend};

    #[tokio::test]
    async fn test_blank_text_is_bad_read_without_model_call() {
        let primary = ScriptedBackend::replying(BackendKind::HostedPrimary, "[\"Rust\"]");
        let chain = FallbackChain::new(vec![primary.shared()]);

        let result = extract_skills(&chain, "  \n\t ", 100).await.unwrap();

        assert_eq!(result.issue, Some(ExtractionIssue::BadRead));
        assert!(result.skills.is_empty());
        assert_eq!(primary.calls(), 0);
    }

    #[tokio::test]
    async fn test_over_limit_is_not_truncated() {
        let primary = ScriptedBackend::replying(BackendKind::HostedPrimary, "[\"Rust\"]");
        let chain = FallbackChain::new(vec![primary.shared()]);

        let result = extract_skills(&chain, &"x".repeat(101), 100).await.unwrap();

        assert_eq!(result.issue, Some(ExtractionIssue::InputTooLong));
        assert_eq!(primary.calls(), 0);
    }

    #[tokio::test]
    async fn test_prompt_is_redacted_and_output_normalized() {
        let primary = ScriptedBackend::replying(
            BackendKind::HostedPrimary,
            "Here you go:\n[\"Python\", \" python \", \"SQL\", \"\"]",
        );
        let chain = FallbackChain::new(vec![primary.shared()]);
        let text = "Jane Doe, jane@example.com, +1 415 555 0134. Python and SQL.";

        let result = extract_skills(&chain, text, 1_000).await.unwrap();

        assert_eq!(result.skills, vec!["Python", "SQL"]);
        assert_eq!(result.issue, None);
        assert_eq!(result.backend, Some(BackendKind::HostedPrimary));
        let prompt = primary.prompts().remove(0);
        assert!(!prompt.contains("jane@example.com"));
        assert!(!prompt.contains("555 0134"));
        assert!(prompt.contains("Python and SQL."));
    }

    #[tokio::test]
    async fn test_empty_array_reports_no_skills_found() {
        let primary = ScriptedBackend::replying(BackendKind::HostedPrimary, "[]");
        let chain = FallbackChain::new(vec![primary.shared(), heuristic()]);

        let result = extract_skills(&chain, "I like long walks.", 1_000).await.unwrap();

        assert!(result.skills.is_empty());
        assert_eq!(result.issue, Some(ExtractionIssue::NoSkillsFound));
    }

    #[tokio::test]
    async fn test_unreachable_models_fall_back_to_heuristic() {
        let chain = FallbackChain::new(vec![
            ScriptedBackend::failing(BackendKind::HostedPrimary).shared(),
            ScriptedBackend::failing(BackendKind::HostedSecondary).shared(),
            heuristic(),
        ]);

        let result = extract_skills(&chain, "Kubernetes and Terraform at scale", 1_000)
            .await
            .unwrap();

        assert_eq!(result.backend, Some(BackendKind::Heuristic));
        assert_eq!(result.skills, vec!["Kubernetes", "Terraform"]);
    }
}
