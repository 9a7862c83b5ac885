//! Persistence seams. Handlers only see these traits; `PgStore` is the production
//! implementation and tests use an in-memory one.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::resume::{NewResume, ResumeRow};
use crate::models::user::{NewResetToken, NewUser, ResetTokenRow, UserRow};

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email is already registered")]
    EmailTaken,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn create_resume(&self, resume: NewResume) -> Result<ResumeRow, StoreError>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `EmailTaken` when the (lower-cased) email already exists.
    async fn create_user(&self, user: NewUser) -> Result<UserRow, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError>;

    async fn insert_reset_token(&self, token: NewResetToken) -> Result<ResetTokenRow, StoreError>;

    /// Most recently issued token for the user, used or not.
    async fn latest_reset_token(&self, user_id: i64) -> Result<Option<ResetTokenRow>, StoreError>;

    /// Marks the token used and stores the new hash atomically. Returns `false` when
    /// the token was already used or the user no longer exists.
    async fn complete_password_reset(
        &self,
        token_id: i64,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool, StoreError>;
}
