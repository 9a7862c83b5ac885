// Skill intelligence backends.
// One capability (`SkillIntelligenceBackend`) with four variants, tried in a fixed
// order by `FallbackChain`. Everything is built once at startup and injected through
// `AppState`; nothing here is a global.

pub mod chain;
pub mod heuristic;
pub mod hosted;
pub mod local;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::llm_client::LlmError;

pub use chain::{FallbackChain, Resolved};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    HostedPrimary,
    HostedSecondary,
    LocalModel,
    Heuristic,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BackendKind::HostedPrimary => "hosted_primary",
            BackendKind::HostedSecondary => "hosted_secondary",
            BackendKind::LocalModel => "local_model",
            BackendKind::Heuristic => "heuristic",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    SkillExtraction,
    SkillRecommendation,
    SkillRoadmap,
    MarketAnalysis,
    ProjectIdeas,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::SkillExtraction => "skill_extraction",
            TaskKind::SkillRecommendation => "skill_recommendation",
            TaskKind::SkillRoadmap => "skill_roadmap",
            TaskKind::MarketAnalysis => "market_analysis",
            TaskKind::ProjectIdeas => "project_ideas",
        }
    }
}

/// The logical operation a prompt was built for, with its inputs.
#[derive(Debug, Clone)]
pub enum SkillTask {
    Extraction {
        resume_text: String,
    },
    Recommendation {
        existing: Vec<String>,
        role: Option<String>,
        limit: usize,
    },
    Roadmap {
        skills: Vec<String>,
    },
    MarketAnalysis {
        skills: Vec<String>,
    },
    ProjectIdeas {
        skills: Vec<String>,
        role: Option<String>,
    },
}

impl SkillTask {
    pub fn kind(&self) -> TaskKind {
        match self {
            SkillTask::Extraction { .. } => TaskKind::SkillExtraction,
            SkillTask::Recommendation { .. } => TaskKind::SkillRecommendation,
            SkillTask::Roadmap { .. } => TaskKind::SkillRoadmap,
            SkillTask::MarketAnalysis { .. } => TaskKind::MarketAnalysis,
            SkillTask::ProjectIdeas { .. } => TaskKind::ProjectIdeas,
        }
    }

    /// Short description of what is being processed, for log lines.
    pub fn subject(&self) -> String {
        match self {
            SkillTask::Extraction { resume_text } => {
                format!("resume ({} chars)", resume_text.chars().count())
            }
            SkillTask::Recommendation { existing, role, .. } => format!(
                "role={} existing={}",
                role.as_deref().unwrap_or("-"),
                existing.len()
            ),
            SkillTask::Roadmap { skills } | SkillTask::MarketAnalysis { skills } => {
                skills.join(",")
            }
            SkillTask::ProjectIdeas { skills, role } => {
                format!("role={} skills={}", role.as_deref().unwrap_or("-"), skills.join(","))
            }
        }
    }
}

/// Immutable, built per call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub task: SkillTask,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("no credential configured")]
    MissingCredential,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("backend returned no content")]
    EmptyContent,
}

impl From<LlmError> for BackendError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => BackendError::MissingCredential,
            LlmError::Http(e) => BackendError::Transport(e.to_string()),
            LlmError::Api { status, message } => BackendError::Upstream { status, message },
            LlmError::EmptyContent => BackendError::EmptyContent,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err.to_string())
    }
}

/// Produces raw text for a generation request. The text is not trusted to be JSON.
#[async_trait]
pub trait SkillIntelligenceBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError>;
}

/// Assembles the production chain: hosted primary, hosted secondary, local model
/// (only when configured), heuristic.
pub fn build_fallback_chain(config: &Config) -> Result<FallbackChain, LlmError> {
    let mut backends: Vec<Arc<dyn SkillIntelligenceBackend>> = vec![
        Arc::new(hosted::HostedBackend::openrouter(
            config.openrouter_api_key.clone(),
            config.llm_timeout,
        )?),
        Arc::new(hosted::HostedBackend::openai(
            config.openai_api_key.clone(),
            config.llm_timeout,
        )?),
    ];

    if let Some(url) = &config.local_model_url {
        backends.push(Arc::new(local::LocalModelBackend::new(
            url,
            &config.local_model_name,
            config.llm_timeout,
        )?));
    }

    backends.push(Arc::new(heuristic::HeuristicBackend));

    let chain = FallbackChain::new(backends);
    info!(
        "Skill backends: {}",
        chain
            .kinds()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    );
    Ok(chain)
}
