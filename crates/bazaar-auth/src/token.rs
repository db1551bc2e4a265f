//! Bearer access tokens.

use crate::{AuthError, Identity};
use serde::{Deserialize, Serialize};

/// An issued access token and the identity it stands for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    /// The token value.
    pub token: String,
    /// Identity this token belongs to.
    pub identity: Identity,
    /// Unix timestamp when token was created.
    pub created_at: i64,
    /// Unix timestamp when token expires, if ever.
    pub expires_at: Option<i64>,
}

impl AccessToken {
    /// Generate a token that never expires.
    pub fn generate(identity: Identity) -> Self {
        Self {
            token: generate_token_string(),
            identity,
            created_at: current_timestamp(),
            expires_at: None,
        }
    }

    /// Generate a token valid for `ttl_secs` seconds.
    pub fn generate_with_expiry(identity: Identity, ttl_secs: i64) -> Self {
        let mut token = Self::generate(identity);
        token.expires_at = Some(token.created_at + ttl_secs);
        token
    }

    /// Check if token is expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| current_timestamp() > expires_at)
    }

    /// Validate the token.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.is_expired() {
            return Err(AuthError::TokenExpired);
        }
        Ok(())
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let header = header.trim();
    if header.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    let (scheme, token) = header.split_once(' ').ok_or(AuthError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(token)
}

/// Generate a cryptographically secure token string.
fn generate_token_string() -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use rand::Rng;

    let bytes: [u8; 24] = rand::thread_rng().gen();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_entropy() {
        let token = AccessToken::generate(Identity::customer("user_1"));

        // 24 bytes base64 encoded
        assert_eq!(token.token.len(), 32);
        assert!(token
            .token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_unique_tokens() {
        let tokens: Vec<String> = (0..100)
            .map(|_| AccessToken::generate(Identity::customer("user_1")).token)
            .collect();
        for i in 0..tokens.len() {
            for j in (i + 1)..tokens.len() {
                assert_ne!(tokens[i], tokens[j]);
            }
        }
    }

    #[test]
    fn test_expiry() {
        let token = AccessToken::generate(Identity::customer("user_1"));
        assert!(token.validate().is_ok());

        let expired = AccessToken::generate_with_expiry(Identity::customer("user_1"), -10);
        assert_eq!(expired.validate(), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc123").unwrap(), "abc123");
        assert_eq!(parse_bearer("bearer   abc123 ").unwrap(), "abc123");
        assert_eq!(parse_bearer(""), Err(AuthError::MissingCredentials));
        assert_eq!(parse_bearer("Bearer "), Err(AuthError::MalformedHeader));
        assert_eq!(parse_bearer("Basic dXNlcg=="), Err(AuthError::MalformedHeader));
        assert_eq!(parse_bearer("abc123"), Err(AuthError::MalformedHeader));
    }
}
