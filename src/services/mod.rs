//! External service integration module
//! 
//! This module contains the identity provider seam and its implementations.

pub mod firebase;
pub mod identity;
pub mod memory_identity;

// Re-export main types
pub use firebase::{FirebaseIdentity, DEFAULT_IDENTITY_URL};
pub use identity::{AuthSession, Credentials, IdentityProvider, SignUpForm};
pub use memory_identity::InMemoryIdentity;
