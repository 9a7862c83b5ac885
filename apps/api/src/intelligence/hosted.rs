//! Hosted chat-completion backends (OpenRouter primary, OpenAI secondary).

use std::time::Duration;

use async_trait::async_trait;

use crate::intelligence::{
    BackendError, BackendKind, GenerationRequest, SkillIntelligenceBackend, TaskKind,
};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError, OPENAI_BASE_URL, OPENROUTER_BASE_URL};

/// Per-task model ids on OpenRouter. Hardcoded so a deployment cannot drift onto an
/// untested model.
fn openrouter_model(task: TaskKind) -> &'static str {
    match task {
        TaskKind::SkillExtraction | TaskKind::SkillRecommendation => {
            "mistralai/mistral-7b-instruct:free"
        }
        TaskKind::SkillRoadmap | TaskKind::ProjectIdeas => "meta-llama/llama-3.2-3b-instruct:free",
        TaskKind::MarketAnalysis => "openai/gpt-oss-20b:free",
    }
}

fn openai_model(_task: TaskKind) -> &'static str {
    "gpt-4o-mini"
}

pub struct HostedBackend {
    kind: BackendKind,
    client: LlmClient,
    model_for: fn(TaskKind) -> &'static str,
}

impl HostedBackend {
    pub fn openrouter(api_key: Option<String>, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            kind: BackendKind::HostedPrimary,
            client: LlmClient::new(OPENROUTER_BASE_URL, api_key, timeout)?,
            model_for: openrouter_model,
        })
    }

    pub fn openai(api_key: Option<String>, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            kind: BackendKind::HostedSecondary,
            client: LlmClient::new(OPENAI_BASE_URL, api_key, timeout)?,
            model_for: openai_model,
        })
    }

    pub fn model(&self, task: TaskKind) -> &'static str {
        (self.model_for)(task)
    }
}

#[async_trait]
impl SkillIntelligenceBackend for HostedBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        let model = self.model(request.task.kind());
        let text = self
            .client
            .complete(
                model,
                JSON_ONLY_SYSTEM,
                &request.prompt,
                request.max_tokens,
                request.temperature,
            )
            .await?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::SkillTask;

    #[test]
    fn test_task_models() {
        let primary = HostedBackend::openrouter(None, Duration::from_secs(1)).unwrap();
        assert_eq!(
            primary.model(TaskKind::SkillExtraction),
            "mistralai/mistral-7b-instruct:free"
        );
        assert_eq!(primary.model(TaskKind::MarketAnalysis), "openai/gpt-oss-20b:free");
        let secondary = HostedBackend::openai(None, Duration::from_secs(1)).unwrap();
        assert_eq!(secondary.model(TaskKind::SkillRoadmap), "gpt-4o-mini");
        assert_eq!(secondary.kind(), BackendKind::HostedSecondary);
    }

    #[tokio::test]
    async fn test_missing_key_is_missing_credential() {
        let backend = HostedBackend::openrouter(None, Duration::from_secs(1)).unwrap();
        let request = GenerationRequest {
            task: SkillTask::Roadmap {
                skills: vec!["rust".into()],
            },
            prompt: "roadmap please".into(),
            max_tokens: 10,
            temperature: 0.0,
        };
        let err = backend.generate(&request).await.unwrap_err();
        assert!(matches!(err, BackendError::MissingCredential));
    }
}
