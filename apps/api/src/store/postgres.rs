use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::resume::{NewResume, ResumeRow};
use crate::models::user::{NewResetToken, NewUser, ResetTokenRow, UserRow};
use crate::store::{AccountStore, ResumeStore, StoreError};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl ResumeStore for PgStore {
    async fn create_resume(&self, resume: NewResume) -> Result<ResumeRow, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (file_name, role, extracted_skills, recommended_skills)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&resume.file_name)
        .bind(&resume.role)
        .bind(&resume.extracted_skills)
        .bind(&resume.recommended_skills)
        .fetch_one(&self.pool)
        .await?)
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<UserRow, StoreError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password, phone, country)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(&user.country)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::EmailTaken
            } else {
                StoreError::Database(e)
            }
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_reset_token(&self, token: NewResetToken) -> Result<ResetTokenRow, StoreError> {
        Ok(sqlx::query_as::<_, ResetTokenRow>(
            r#"
            INSERT INTO password_reset_tokens (token, user_id, created_at, expires_at, is_used)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING *
            "#,
        )
        .bind(&token.token)
        .bind(token.user_id)
        .bind(token.created_at)
        .bind(token.expires_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn latest_reset_token(&self, user_id: i64) -> Result<Option<ResetTokenRow>, StoreError> {
        Ok(sqlx::query_as::<_, ResetTokenRow>(
            r#"
            SELECT * FROM password_reset_tokens
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn complete_password_reset(
        &self,
        token_id: i64,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Only an unused token can be claimed; a concurrent reset sees zero rows.
        let claimed = sqlx::query(
            "UPDATE password_reset_tokens SET is_used = TRUE WHERE id = $1 AND is_used = FALSE",
        )
        .bind(token_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if claimed == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        let updated = sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}
