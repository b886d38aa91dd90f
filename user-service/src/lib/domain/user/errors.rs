use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),

    #[error("Email too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for FullName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FullNameError {
    #[error("Full name must not be empty")]
    Empty,

    #[error("Full name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for plaintext password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Error for Gender parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenderError {
    #[error("Unknown gender '{0}' (expected male, female or other)")]
    Unknown(String),
}

/// Error for optional profile text fields (phone, avatar URL)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileFieldError {
    #[error("{field} too long: maximum {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

/// Error for date of birth parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateOfBirthError {
    #[error("Invalid date of birth '{0}': expected YYYY-MM-DD")]
    InvalidFormat(String),

    #[error("Date of birth is in the future")]
    InFuture,
}

/// Error for pagination parameters
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Page out of range: {0}")]
    InvalidPage(i64),

    #[error("Limit must be between 1 and {max}, got {actual}")]
    InvalidLimit { max: i64, actual: i64 },
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid full name: {0}")]
    InvalidFullName(#[from] FullNameError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    #[error("Invalid gender: {0}")]
    InvalidGender(#[from] GenderError),

    #[error("Invalid profile field: {0}")]
    InvalidProfileField(#[from] ProfileFieldError),

    #[error("Invalid date of birth: {0}")]
    InvalidDateOfBirth(#[from] DateOfBirthError),

    #[error("Invalid pagination: {0}")]
    InvalidPagination(#[from] PaginationError),

    // Domain-level errors
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User account is inactive")]
    AccountInactive,

    // Infrastructure errors
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuanceFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl UserError {
    /// Machine-readable reason code, stable across message wording changes.
    pub fn reason_code(&self) -> &'static str {
        match self {
            UserError::InvalidUserId(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidFullName(_)
            | UserError::InvalidPassword(_)
            | UserError::InvalidGender(_)
            | UserError::InvalidProfileField(_)
            | UserError::InvalidDateOfBirth(_)
            | UserError::InvalidPagination(_) => "validation_failed",
            UserError::NotFound(_) => "not_found",
            UserError::EmailAlreadyExists(_) => "duplicate_email",
            UserError::InvalidCredentials => "invalid_credentials",
            UserError::AccountInactive => "account_inactive",
            UserError::HashingFailed(_)
            | UserError::TokenIssuanceFailed(_)
            | UserError::DatabaseError(_) => "internal_error",
        }
    }

    /// Whether the failure is on our side rather than the caller's.
    pub fn is_internal(&self) -> bool {
        self.reason_code() == "internal_error"
    }
}
