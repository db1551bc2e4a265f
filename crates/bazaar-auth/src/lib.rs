//! Authentication for the Bazaar storefront.
//!
//! Resolves bearer tokens to a caller [`Identity`] and answers authorization
//! questions (admin or not, owner or not).

mod error;
mod identity;
mod registry;
mod token;

pub use error::AuthError;
pub use identity::{Identity, Role};
pub use registry::{Authenticator, TokenRegistry};
pub use token::{parse_bearer, AccessToken};
