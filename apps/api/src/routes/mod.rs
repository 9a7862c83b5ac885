pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::accounts::handlers as accounts;
use crate::skills::handlers as skills;
use crate::state::AppState;

/// Upper bound for resume uploads.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Skills
        .route(
            "/extract-skills",
            post(skills::handle_extract_skills).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/skill-roadmap", post(skills::handle_skill_roadmap))
        .route(
            "/skill-market-analysis",
            post(skills::handle_market_analysis),
        )
        .route("/skill-recommend", post(skills::handle_skill_recommend))
        .route("/skill-projects", post(skills::handle_skill_projects))
        .route("/skill-related", post(skills::handle_skill_related))
        // Accounts
        .route("/register", post(accounts::handle_register))
        .route("/login", post(accounts::handle_login))
        .route("/forgotPassword", post(accounts::handle_forgot_password))
        .route("/resetPassword", post(accounts::handle_reset_password))
        .with_state(state)
}
