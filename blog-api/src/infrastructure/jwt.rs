use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[error("token encode failed")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),

    #[error("expected a {expected:?} token, got {actual:?}")]
    WrongKind {
        expected: TokenKind,
        actual: TokenKind,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TokenKind {
    Access,
    Refresh,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) token_type: TokenKind,
    pub(crate) user_id: i64,
    pub(crate) jti: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct TokenPair {
    pub(crate) refresh: String,
    pub(crate) access: String,
}

/// Stateless HS256 token issuer. Nothing is stored server-side.
pub(crate) struct JwtService {
    secret: String,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl JwtService {
    const DEFAULT_ACCESS_TTL_SECONDS: i64 = 5 * 60;
    const DEFAULT_REFRESH_TTL_SECONDS: i64 = 24 * 60 * 60;

    pub(crate) fn new(secret: &str, access_ttl_seconds: i64, refresh_ttl_seconds: i64) -> Self {
        let access_ttl_seconds = if access_ttl_seconds > 0 {
            access_ttl_seconds
        } else {
            Self::DEFAULT_ACCESS_TTL_SECONDS
        };
        let refresh_ttl_seconds = if refresh_ttl_seconds > 0 {
            refresh_ttl_seconds
        } else {
            Self::DEFAULT_REFRESH_TTL_SECONDS
        };

        JwtService {
            secret: secret.into(),
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }

    /// Mints a refresh token and an access token derived from it.
    pub(crate) fn issue_pair(&self, user_id: i64) -> Result<TokenPair, JwtError> {
        let refresh = self.sign(TokenKind::Refresh, user_id, self.refresh_ttl_seconds)?;
        let access = self.access_from_refresh(&refresh)?;
        Ok(TokenPair { refresh, access })
    }

    pub(crate) fn access_from_refresh(&self, refresh_token: &str) -> Result<String, JwtError> {
        let claims = self.verify_token(refresh_token, TokenKind::Refresh)?;
        self.sign(TokenKind::Access, claims.user_id, self.access_ttl_seconds)
    }

    pub(crate) fn verify_token(
        &self,
        token: &str,
        expected: TokenKind,
    ) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 10;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(JwtError::Decode)?;

        let claims = token_data.claims;
        if claims.token_type != expected {
            return Err(JwtError::WrongKind {
                expected,
                actual: claims.token_type,
            });
        }
        Ok(claims)
    }

    fn sign(&self, kind: TokenKind, user_id: i64, ttl_seconds: i64) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            token_type: kind,
            user_id,
            jti: Uuid::new_v4().simple().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(JwtError::Encode)
    }
}
