pub mod authorization;
pub mod client;
pub mod code;
pub mod errors;
pub mod token;

pub use authorization::{AttemptState, AuthorizationParams, AuthorizationRequest, PkceChallenge};
pub use client::RegisteredClient;
pub use code::{AuthorizationCode, GrantRejection, RedemptionAttempt};
pub use errors::{DomainError, DomainResult};
pub use token::{IdTokenClaims, JsonWebKey, JsonWebKeySet};
