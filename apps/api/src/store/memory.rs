use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::models::resume::{NewResume, ResumeRow};
use crate::models::user::{NewResetToken, NewUser, ResetTokenRow, UserRow};
use crate::store::{AccountStore, ResumeStore, StoreError};

/// In-memory store for router tests.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<UserRow>>,
    tokens: Mutex<Vec<ResetTokenRow>>,
    resumes: Mutex<Vec<ResumeRow>>,
}

impl MemoryStore {
    pub fn resumes(&self) -> Vec<ResumeRow> {
        self.resumes.lock().unwrap().clone()
    }

    pub fn user(&self, email: &str) -> Option<UserRow> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    /// Rewrites a token's expiry, to simulate the passage of time.
    pub fn expire_token(&self, token_id: i64) {
        let mut tokens = self.tokens.lock().unwrap();
        if let Some(token) = tokens.iter_mut().find(|t| t.id == token_id) {
            token.expires_at = Utc::now() - chrono::Duration::minutes(1);
        }
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn create_resume(&self, resume: NewResume) -> Result<ResumeRow, StoreError> {
        let mut resumes = self.resumes.lock().unwrap();
        let row = ResumeRow {
            id: resumes.len() as i64 + 1,
            file_name: resume.file_name,
            role: resume.role,
            extracted_skills: resume.extracted_skills,
            recommended_skills: resume.recommended_skills,
            created_at: Utc::now(),
        };
        resumes.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<UserRow, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::EmailTaken);
        }
        let row = UserRow {
            id: users.len() as i64 + 1,
            name: user.name,
            email: user.email,
            password: user.password_hash,
            phone: user.phone,
            country: user.country,
            created_at: Utc::now(),
        };
        users.push(row.clone());
        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        Ok(self.user(email))
    }

    async fn insert_reset_token(&self, token: NewResetToken) -> Result<ResetTokenRow, StoreError> {
        let mut tokens = self.tokens.lock().unwrap();
        let row = ResetTokenRow {
            id: tokens.len() as i64 + 1,
            token: token.token,
            user_id: token.user_id,
            created_at: token.created_at,
            expires_at: token.expires_at,
            is_used: false,
        };
        tokens.push(row.clone());
        Ok(row)
    }

    async fn latest_reset_token(&self, user_id: i64) -> Result<Option<ResetTokenRow>, StoreError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .max_by_key(|t| (t.created_at, t.id))
            .cloned())
    }

    async fn complete_password_reset(
        &self,
        token_id: i64,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        let mut tokens = self.tokens.lock().unwrap();
        let mut users = self.users.lock().unwrap();
        let Some(token) = tokens.iter_mut().find(|t| t.id == token_id && !t.is_used) else {
            return Ok(false);
        };
        let Some(user) = users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(false);
        };
        token.is_used = true;
        user.password = password_hash.to_string();
        Ok(true)
    }
}
