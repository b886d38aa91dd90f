use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::IdentityClaims;
use super::errors::JwtError;

/// Signed access token together with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT token handler for issuing and validating identity tokens.
///
/// Uses HS256 (HMAC with SHA-256). Tokens are stateless: validity is decided
/// by the signature and the `exp` claim alone.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Errors
    /// * `IssuanceFailed` - Secret is empty
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::IssuanceFailed(
                "signing secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        })
    }

    /// Issue a token valid for `ttl` from now.
    ///
    /// # Errors
    /// * `IssuanceFailed` - Subject is missing, ttl is not positive, or encoding failed
    pub fn issue(&self, identity: &IdentityClaims, ttl: Duration) -> Result<IssuedToken, JwtError> {
        self.issue_at(identity, ttl, Utc::now())
    }

    /// Issue a token whose validity window starts at `issued_at`.
    pub fn issue_at(
        &self,
        identity: &IdentityClaims,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        if identity.sub.trim().is_empty() {
            return Err(JwtError::IssuanceFailed(
                "missing required claim: sub".to_string(),
            ));
        }
        if ttl <= Duration::zero() {
            return Err(JwtError::IssuanceFailed(
                "token lifetime must be positive".to_string(),
            ));
        }

        let claims = Claims::new(identity.clone(), issued_at, ttl);
        let header = Header::new(self.algorithm);

        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::IssuanceFailed(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// Verify signature and expiry, then return the embedded identity.
    ///
    /// # Errors
    /// * `ExpiredToken` - Current time is past `exp`
    /// * `InvalidSignature` - Signature does not match this handler's secret
    /// * `MalformedToken` - Token cannot be parsed or lacks required claims
    pub fn validate(&self, token: &str) -> Result<IdentityClaims, JwtError> {
        self.decode(token).map(|claims| claims.identity)
    }

    /// Verify a token and return the full payload including time claims.
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                    ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                    _ => JwtError::MalformedToken(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}
