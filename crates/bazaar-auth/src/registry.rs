//! Token lookup.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{AccessToken, AuthError, Identity};

/// Resolves a bearer token to the caller's identity.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate a raw bearer token.
    async fn authenticate(&self, token: &str) -> Result<Identity, AuthError>;
}

/// In-memory token registry.
#[derive(Debug, Default)]
pub struct TokenRegistry {
    tokens: RwLock<HashMap<String, AccessToken>>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a non-expiring token for an identity.
    pub async fn issue(&self, identity: Identity) -> AccessToken {
        self.insert(AccessToken::generate(identity)).await
    }

    /// Issue a token valid for `ttl_secs` seconds.
    pub async fn issue_with_expiry(&self, identity: Identity, ttl_secs: i64) -> AccessToken {
        self.insert(AccessToken::generate_with_expiry(identity, ttl_secs))
            .await
    }

    /// Revoke a token. Returns whether it existed.
    pub async fn revoke(&self, token: &str) -> bool {
        let removed = self.tokens.write().await.remove(token).is_some();
        if removed {
            tracing::debug!("Revoked access token");
        }
        removed
    }

    /// Number of live tokens.
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }

    async fn insert(&self, token: AccessToken) -> AccessToken {
        tracing::debug!(
            user_id = %token.identity.user_id,
            role = %token.identity.role,
            "Issued access token"
        );
        self.tokens
            .write()
            .await
            .insert(token.token.clone(), token.clone());
        token
    }
}

#[async_trait]
impl Authenticator for TokenRegistry {
    async fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        let tokens = self.tokens.read().await;
        let access = tokens.get(token).ok_or(AuthError::InvalidToken)?;
        access.validate()?;
        Ok(access.identity.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[tokio::test]
    async fn test_issue_and_authenticate() {
        let registry = TokenRegistry::new();
        let token = registry.issue(Identity::admin("admin-1")).await;

        let identity = registry.authenticate(&token.token).await.unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(identity.user_id.as_str(), "admin-1");
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let registry = TokenRegistry::new();
        let err = registry.authenticate("nope").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn test_revoke() {
        let registry = TokenRegistry::new();
        let token = registry.issue(Identity::customer("u1")).await;
        assert_eq!(registry.len().await, 1);

        assert!(registry.revoke(&token.token).await);
        assert!(!registry.revoke(&token.token).await);
        assert!(registry.authenticate(&token.token).await.is_err());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let registry = TokenRegistry::new();
        let token = registry
            .issue_with_expiry(Identity::customer("u1"), -1)
            .await;
        let err = registry.authenticate(&token.token).await.unwrap_err();
        assert_eq!(err, AuthError::TokenExpired);
    }
}
