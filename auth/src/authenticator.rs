use chrono::Duration;

use crate::jwt::IdentityClaims;
use crate::jwt::IssuedToken;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::HashingCost;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Settings needed to build an [`Authenticator`].
#[derive(Debug, Clone)]
pub struct AuthenticatorSettings {
    /// Secret key for JWT signing
    pub jwt_secret: Vec<u8>,
    /// Lifetime of issued access tokens
    pub token_ttl: Duration,
    /// Password hashing work factor
    pub hashing_cost: HashingCost,
}

/// Authentication coordinator combining password hashing and JWT handling.
///
/// Built once at start-up and shared immutably between requests.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
}

/// Authentication set-up errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),

    #[error("Token lifetime must be positive")]
    InvalidTokenTtl,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Errors
    /// * `JwtError` - Secret is empty
    /// * `PasswordError` - Hashing cost is out of range
    /// * `InvalidTokenTtl` - Token lifetime is zero or negative
    pub fn new(settings: AuthenticatorSettings) -> Result<Self, AuthenticationError> {
        if settings.token_ttl <= Duration::zero() {
            return Err(AuthenticationError::InvalidTokenTtl);
        }

        Ok(Self {
            password_hasher: PasswordHasher::with_cost(settings.hashing_cost)?,
            jwt_handler: JwtHandler::new(&settings.jwt_secret)?,
            token_ttl: settings.token_ttl,
        })
    }

    /// Lifetime applied to every issued token.
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// Invalid or foreign hashes never match.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Mint an access token for an already authenticated identity.
    ///
    /// # Errors
    /// * `IssuanceFailed` - Claims are incomplete or encoding failed
    pub fn issue_token(&self, identity: &IdentityClaims) -> Result<IssuedToken, JwtError> {
        self.jwt_handler.issue(identity, self.token_ttl)
    }

    /// Validate and decode an access token.
    ///
    /// # Errors
    /// * `ExpiredToken`, `InvalidSignature`, `MalformedToken`
    pub fn validate_token(&self, token: &str) -> Result<IdentityClaims, JwtError> {
        self.jwt_handler.validate(token)
    }
}
