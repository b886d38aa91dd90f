//! Authentication core
//!
//! - Password hashing (Argon2id, self-describing PHC hashes)
//! - Identity token issuance and validation (JWT, HS256)
//! - An [`Authenticator`] bundling both with the configured token lifetime
//!
//! The crate holds no storage: callers look accounts up themselves and use
//! these primitives to check credentials and mint tokens.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("my_password", "not-a-valid-hash"));
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{IdentityClaims, JwtHandler};
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let identity = IdentityClaims::new("user123", "alice@example.com", 1);
//! let issued = handler.issue(&identity, Duration::hours(24)).unwrap();
//! let decoded = handler.validate(&issued.token).unwrap();
//! assert_eq!(decoded, identity);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::AuthenticatorSettings;
pub use jwt::Claims;
pub use jwt::IdentityClaims;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
