//! Axum route handlers for registration, login and password reset.
//!
//! Outcomes the user can act on (bad credentials, expired links) are 200 responses
//! with `success: false`, which is what the frontend expects.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::accounts::mailer::reset_password_mail;
use crate::accounts::password::constant_time_eq;
use crate::accounts::tokens::{reset_salt, reset_token};
use crate::errors::AppError;
use crate::models::user::{NewResetToken, NewUser};
use crate::state::AppState;
use crate::store::StoreError;

const RESET_TOKEN_TTL_DAYS: i64 = 1;

const MSG_REGISTERED: &str = "You are now registered on our website!";
const MSG_EMAIL_TAKEN: &str = "user with this email already exists.";
const MSG_INVALID_LOGIN: &str = "Invalid Login Credentials!";
const MSG_LOGGED_IN: &str = "You are now logged in!";
const MSG_RESET_SENT: &str = "A password reset link has been sent to your email.";
const MSG_RESET_EXPIRED: &str = "Password Reset Link has expired!";
const MSG_RESET_INVALID: &str = "Reset Password link is invalid!";
const MSG_RESET_DONE: &str = "Your password reset was successfully!";

pub const CODE_TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
pub const CODE_TOKEN_INVALID: &str = "TOKEN_INVALID";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    /// Arrives from a query string, so either a number or a numeric string.
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl AuthResponse {
    fn ok(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
            access: None,
            refresh: None,
            code: None,
        })
    }

    fn failed(message: &str) -> Json<Self> {
        Json(Self {
            success: false,
            message: message.to_string(),
            access: None,
            refresh: None,
            code: None,
        })
    }

    fn failed_with_code(message: &str, code: &'static str) -> Json<Self> {
        Json(Self {
            success: false,
            message: message.to_string(),
            access: None,
            refresh: None,
            code: Some(code),
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Loose shape check: something@something.tld, no spaces.
fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !email.contains(char::is_whitespace)
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

fn parse_user_id(id: &Value) -> Option<i64> {
    match id {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn optional_field(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /register
pub async fn handle_register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(request) = payload?;
    let name = request.name.trim().to_string();
    let email = normalize_email(&request.email);

    if name.is_empty() {
        return Ok(AuthResponse::failed("Name is required."));
    }
    if email.is_empty() {
        return Ok(AuthResponse::failed("Email is required."));
    }
    if !looks_like_email(&email) {
        return Ok(AuthResponse::failed("Enter a valid email address."));
    }
    if request.password.is_empty() {
        return Ok(AuthResponse::failed("Password is required."));
    }

    let password_hash = state.passwords.hash_async(request.password).await?;
    let created = state
        .accounts
        .create_user(NewUser {
            name,
            email,
            password_hash,
            phone: optional_field(request.phone),
            country: optional_field(request.country),
        })
        .await;

    match created {
        Ok(user) => {
            info!("Registered user {}", user.id);
            Ok(AuthResponse::ok(MSG_REGISTERED))
        }
        Err(StoreError::EmailTaken) => Ok(AuthResponse::failed(MSG_EMAIL_TAKEN)),
        Err(e) => Err(e.into()),
    }
}

/// POST /login
pub async fn handle_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(request) = payload?;
    let email = normalize_email(&request.email);

    let Some(user) = state.accounts.find_user_by_email(&email).await? else {
        return Ok(AuthResponse::failed(MSG_INVALID_LOGIN));
    };

    let valid = state
        .passwords
        .verify_async(request.password, user.password.clone())
        .await?;
    if !valid {
        return Ok(AuthResponse::failed(MSG_INVALID_LOGIN));
    }

    let pair = state.tokens.issue_pair(user.id)?;
    info!("User {} logged in", user.id);
    Ok(Json(AuthResponse {
        success: true,
        message: MSG_LOGGED_IN.to_string(),
        access: Some(pair.access),
        refresh: Some(pair.refresh),
        code: None,
    }))
}

/// POST /forgotPassword
///
/// Unknown addresses get the same answer as known ones.
pub async fn handle_forgot_password(
    State(state): State<AppState>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(request) = payload?;
    let email = normalize_email(&request.email);

    let Some(user) = state.accounts.find_user_by_email(&email).await? else {
        info!("Password reset requested for an unknown address");
        return Ok(AuthResponse::ok(MSG_RESET_SENT));
    };

    let created_at = Utc::now();
    let token = reset_token(user.id, &user.password, created_at, &reset_salt());
    let stored = state
        .accounts
        .insert_reset_token(NewResetToken {
            token,
            user_id: user.id,
            created_at,
            expires_at: created_at + Duration::days(RESET_TOKEN_TTL_DAYS),
        })
        .await?;

    state
        .mailer
        .send(reset_password_mail(
            &user.email,
            &state.config.frontend_url,
            user.id,
            &stored.token,
        ))
        .await?;

    info!("Issued password reset token {} for user {}", stored.id, user.id);
    Ok(AuthResponse::ok(MSG_RESET_SENT))
}

/// POST /resetPassword
///
/// Only the most recently issued token is honoured; it must be unexpired,
/// unused and match exactly.
pub async fn handle_reset_password(
    State(state): State<AppState>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(request) = payload?;

    let Some(user_id) = parse_user_id(&request.id) else {
        return Ok(AuthResponse::failed_with_code(MSG_RESET_INVALID, CODE_TOKEN_INVALID));
    };
    let Some(latest) = state.accounts.latest_reset_token(user_id).await? else {
        return Ok(AuthResponse::failed_with_code(MSG_RESET_INVALID, CODE_TOKEN_INVALID));
    };

    if latest.is_expired(Utc::now()) {
        return Ok(AuthResponse::failed_with_code(MSG_RESET_EXPIRED, CODE_TOKEN_EXPIRED));
    }
    if latest.is_used || !constant_time_eq(request.token.as_bytes(), latest.token.as_bytes()) {
        return Ok(AuthResponse::failed_with_code(MSG_RESET_INVALID, CODE_TOKEN_INVALID));
    }
    if request.password.is_empty() {
        return Ok(AuthResponse::failed("Password is required."));
    }

    let password_hash = state.passwords.hash_async(request.password).await?;
    let reset = state
        .accounts
        .complete_password_reset(latest.id, user_id, &password_hash)
        .await?;

    if !reset {
        return Ok(AuthResponse::failed_with_code(MSG_RESET_INVALID, CODE_TOKEN_INVALID));
    }

    info!("Password reset completed for user {user_id}");
    Ok(AuthResponse::ok(MSG_RESET_DONE))
}
