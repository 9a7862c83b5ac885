//! Locally served small model (Ollama-compatible `/api/generate`). Slower and
//! weaker than the hosted models; used only when both hosted paths fail.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::intelligence::{BackendError, BackendKind, GenerationRequest, SkillIntelligenceBackend};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmError;

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateReply {
    response: String,
}

pub struct LocalModelBackend {
    client: Client,
    endpoint: String,
    model: String,
}

impl LocalModelBackend {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: format!("{}/api/generate", base_url.trim_end_matches('/')),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl SkillIntelligenceBackend for LocalModelBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::LocalModel
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        let body = GenerateBody {
            model: &self.model,
            prompt: &request.prompt,
            system: JSON_ONLY_SYSTEM,
            stream: false,
            options: GenerateOptions {
                num_predict: request.max_tokens,
                temperature: request.temperature,
            },
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Upstream {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let reply: GenerateReply = response.json().await?;
        let text = reply.response.trim();
        if text.is_empty() {
            return Err(BackendError::EmptyContent);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let backend =
            LocalModelBackend::new("http://localhost:11434/", "phi3:mini", Duration::from_secs(1))
                .unwrap();
        assert_eq!(backend.endpoint, "http://localhost:11434/api/generate");
        assert_eq!(backend.kind(), BackendKind::LocalModel);
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateBody {
            model: "phi3:mini",
            prompt: "p",
            system: "s",
            stream: false,
            options: GenerateOptions {
                num_predict: 400,
                temperature: 0.0,
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["stream"], false);
        assert_eq!(value["options"]["num_predict"], 400);
    }
}
