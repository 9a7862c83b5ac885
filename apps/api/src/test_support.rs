//! Fakes shared by unit and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use crate::accounts::mailer::{Mailer, OutgoingMail};
use crate::accounts::password::PasswordHasher;
use crate::accounts::tokens::TokenIssuer;
use crate::config::Config;
use crate::documents::{DocumentError, TextExtractor};
use crate::intelligence::heuristic::HeuristicBackend;
use crate::intelligence::{
    BackendError, BackendKind, FallbackChain, GenerationRequest, SkillIntelligenceBackend,
};
use crate::skills::taxonomy::{RelatedSkill, SkillsTaxonomy};
use crate::state::AppState;
use crate::store::memory::MemoryStore;

/// Backend that always gives the same reply (or always fails) and records prompts.
#[derive(Clone)]
pub struct ScriptedBackend {
    kind: BackendKind,
    reply: Option<String>,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedBackend {
    pub fn replying(kind: BackendKind, reply: &str) -> Self {
        Self {
            kind,
            reply: Some(reply.to_string()),
            calls: Arc::default(),
            prompts: Arc::default(),
        }
    }

    pub fn failing(kind: BackendKind) -> Self {
        Self {
            kind,
            reply: None,
            calls: Arc::default(),
            prompts: Arc::default(),
        }
    }

    pub fn shared(&self) -> Arc<dyn SkillIntelligenceBackend> {
        Arc::new(self.clone())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SkillIntelligenceBackend for ScriptedBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());
        self.reply
            .clone()
            .ok_or_else(|| BackendError::Transport("scripted failure".to_string()))
    }
}

pub fn heuristic() -> Arc<dyn SkillIntelligenceBackend> {
    Arc::new(HeuristicBackend)
}

/// Returns fixed text for any upload, or reports it unreadable.
pub struct FakeExtractor {
    text: Option<String>,
}

impl FakeExtractor {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
        }
    }

    pub fn unreadable() -> Self {
        Self { text: None }
    }
}

#[async_trait]
impl TextExtractor for FakeExtractor {
    async fn extract_text(&self, _document: Bytes) -> Result<String, DocumentError> {
        self.text
            .clone()
            .ok_or_else(|| DocumentError::Unreadable("fake".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<()> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

/// Canned taxonomy answers keyed by query.
#[derive(Default)]
pub struct StaticTaxonomy {
    answers: HashMap<String, Vec<RelatedSkill>>,
}

impl StaticTaxonomy {
    pub fn with(mut self, query: &str, related: &[(&str, Option<f64>)]) -> Self {
        self.answers.insert(
            query.to_string(),
            related
                .iter()
                .map(|(name, score)| RelatedSkill {
                    name: name.to_string(),
                    score: *score,
                })
                .collect(),
        );
        self
    }
}

#[async_trait]
impl SkillsTaxonomy for StaticTaxonomy {
    async fn search(&self, query: &str) -> Result<Vec<RelatedSkill>> {
        Ok(self.answers.get(query).cloned().unwrap_or_default())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
}

pub fn test_app(
    backends: Vec<Arc<dyn SkillIntelligenceBackend>>,
    extractor: FakeExtractor,
    taxonomy: StaticTaxonomy,
) -> TestApp {
    let config = Config::for_tests();
    let store = Arc::new(MemoryStore::default());
    let mailer = Arc::new(RecordingMailer::default());

    let state = AppState {
        chain: Arc::new(FallbackChain::new(backends)),
        taxonomy: Arc::new(taxonomy),
        documents: Arc::new(extractor),
        resumes: store.clone(),
        accounts: store.clone(),
        mailer: mailer.clone(),
        tokens: Arc::new(TokenIssuer::new(&config.jwt_secret)),
        passwords: PasswordHasher::new(config.password_iterations),
        config,
    };

    TestApp {
        state,
        store,
        mailer,
    }
}
