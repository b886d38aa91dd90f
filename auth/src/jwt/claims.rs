use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity facts embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityClaims {
    /// Subject (user identifier)
    pub sub: String,

    /// Email address of the subject
    pub email: String,

    /// Role identifier of the subject
    pub role: i32,
}

impl IdentityClaims {
    pub fn new(sub: impl ToString, email: impl ToString, role: i32) -> Self {
        Self {
            sub: sub.to_string(),
            email: email.to_string(),
            role,
        }
    }
}

/// Full token payload: identity plus registered time claims.
///
/// Serialized flat, e.g. `{"sub":..,"email":..,"role":..,"iat":..,"exp":..}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(flatten)]
    pub identity: IdentityClaims,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Bind identity claims to a validity window starting at `issued_at`.
    pub fn new(identity: IdentityClaims, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        let expiration = issued_at + ttl;

        Self {
            identity,
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Expiration as a UTC timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims_window() {
        let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let identity = IdentityClaims::new("user123", "alice@example.com", 1);

        let claims = Claims::new(identity.clone(), issued_at, Duration::hours(24));

        assert_eq!(claims.identity, identity);
        assert_eq!(claims.iat, issued_at.timestamp());
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert_eq!(claims.expires_at(), issued_at + Duration::hours(24));
    }

    #[test]
    fn test_payload_is_flat() {
        let claims = Claims {
            identity: IdentityClaims::new("user123", "alice@example.com", 3),
            iat: 10,
            exp: 20,
        };

        let value = serde_json::to_value(&claims).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "sub": "user123",
                "email": "alice@example.com",
                "role": 3,
                "iat": 10,
                "exp": 20
            })
        );
    }
}
