//! Per-request context.

use std::fmt;

use bazaar_auth::{parse_bearer, AuthError, Authenticator, Identity, Role};
use bazaar_commerce::ids::UserId;

use crate::ShopResult;

/// Unique request identifier for tracing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new request ID.
    pub fn generate() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self(format!("{:x}-{:08x}", nanos, rand::random::<u32>()))
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who is calling and under which request id.
///
/// Passed explicitly to every operation that depends on the caller.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request identifier for log correlation.
    pub request_id: RequestId,
    /// Authenticated caller.
    pub identity: Identity,
}

impl RequestContext {
    /// Create a context with a fresh request id.
    pub fn new(identity: Identity) -> Self {
        Self {
            request_id: RequestId::generate(),
            identity,
        }
    }

    /// Context for a customer.
    pub fn customer(user_id: impl Into<UserId>) -> Self {
        Self::new(Identity::customer(user_id))
    }

    /// Context for an administrator.
    pub fn admin(user_id: impl Into<UserId>) -> Self {
        Self::new(Identity::admin(user_id))
    }

    /// Use a request id supplied by the caller.
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    /// Resolve the caller from an `Authorization` header value.
    pub async fn authenticate(
        auth: &dyn Authenticator,
        authorization: Option<&str>,
    ) -> ShopResult<Self> {
        let request_id = RequestId::generate();
        let resolved = match authorization {
            Some(header) => match parse_bearer(header) {
                Ok(token) => auth.authenticate(token).await,
                Err(e) => Err(e),
            },
            None => Err(AuthError::MissingCredentials),
        };

        match resolved {
            Ok(identity) => Ok(Self {
                request_id,
                identity,
            }),
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "Authentication failed");
                Err(e.into())
            }
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.identity.user_id
    }

    pub fn role(&self) -> Role {
        self.identity.role
    }

    pub fn is_admin(&self) -> bool {
        self.identity.is_admin()
    }

    /// Fail with `Forbidden` unless the caller is an administrator.
    pub fn require_admin(&self) -> ShopResult<()> {
        self.identity.require_admin().map_err(|e| {
            tracing::warn!(
                request_id = %self.request_id,
                user_id = %self.identity.user_id,
                "Admin operation denied"
            );
            e.into()
        })
    }
}
