mod accounts;
mod config;
mod db;
mod documents;
mod errors;
mod intelligence;
mod llm_client;
mod models;
mod routes;
mod skills;
mod state;
mod store;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::accounts::mailer::LogMailer;
use crate::accounts::password::PasswordHasher;
use crate::accounts::tokens::TokenIssuer;
use crate::config::Config;
use crate::db::create_pool;
use crate::documents::PdfTextExtractor;
use crate::intelligence::build_fallback_chain;
use crate::routes::build_router;
use crate::skills::taxonomy::LightcastClient;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Compass API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(db));

    // Skill backends: hosted primary -> hosted secondary -> local model -> heuristic
    let chain = Arc::new(build_fallback_chain(&config)?);

    let taxonomy = Arc::new(LightcastClient::new(
        config.lightcast_api_key.clone(),
        config.llm_timeout,
    )?);
    if config.lightcast_api_key.is_none() {
        info!("LIGHTCAST_API_KEY not set; /skill-related will return empty lists");
    }

    // Build app state
    let state = AppState {
        config: config.clone(),
        chain,
        taxonomy,
        documents: Arc::new(PdfTextExtractor),
        resumes: store.clone(),
        accounts: store,
        mailer: Arc::new(LogMailer),
        tokens: Arc::new(TokenIssuer::new(&config.jwt_secret)),
        passwords: PasswordHasher::new(config.password_iterations),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to FRONTEND_URL once deployed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
