//! Session JWTs and password-reset tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{errors::Error as JwtError, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use uuid::Uuid;

const ACCESS_TTL_MINUTES: i64 = 5;
const REFRESH_TTL_DAYS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub token_type: TokenType,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// HS256 issuer for access/refresh pairs.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue_pair(&self, user_id: i64) -> Result<TokenPair, JwtError> {
        let now = Utc::now();
        let access_ttl = Duration::minutes(ACCESS_TTL_MINUTES);
        let refresh_ttl = Duration::days(REFRESH_TTL_DAYS);
        Ok(TokenPair {
            access: self.issue(user_id, TokenType::Access, now, access_ttl)?,
            refresh: self.issue(user_id, TokenType::Refresh, now, refresh_ttl)?,
        })
    }

    fn issue(
        &self,
        user_id: i64,
        token_type: TokenType,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let claims = Claims {
            sub: user_id.to_string(),
            token_type,
            jti: Uuid::new_v4().simple().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
    }

    /// Signature and expiry checked.
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        Ok(jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())?.claims)
    }
}

/// Random component mixed into each reset token.
pub fn reset_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Lower-case hex SHA-512 over user id, stored password hash, issue time (RFC 3339)
/// and salt.
pub fn reset_token(
    user_id: i64,
    password_hash: &str,
    created_at: DateTime<Utc>,
    salt: &str,
) -> String {
    let mut hasher = Sha512::new();
    hasher.update(user_id.to_string().as_bytes());
    hasher.update(password_hash.as_bytes());
    hasher.update(created_at.to_rfc3339().as_bytes());
    hasher.update(salt.as_bytes());
    format!("{:x}", hasher.finalize())
}
