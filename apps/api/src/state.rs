use std::sync::Arc;

use crate::accounts::mailer::Mailer;
use crate::accounts::password::PasswordHasher;
use crate::accounts::tokens::TokenIssuer;
use crate::config::Config;
use crate::documents::TextExtractor;
use crate::intelligence::FallbackChain;
use crate::skills::taxonomy::SkillsTaxonomy;
use crate::store::{AccountStore, ResumeStore};

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything is built once in `main`; tests swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Skill backends in fallback order.
    pub chain: Arc<FallbackChain>,
    pub taxonomy: Arc<dyn SkillsTaxonomy>,
    pub documents: Arc<dyn TextExtractor>,
    pub resumes: Arc<dyn ResumeStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub mailer: Arc<dyn Mailer>,
    pub tokens: Arc<TokenIssuer>,
    pub passwords: PasswordHasher,
}
