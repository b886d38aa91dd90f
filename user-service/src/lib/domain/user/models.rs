use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::errors::DateOfBirthError;
use crate::domain::user::errors::EmailError;
use crate::domain::user::errors::FullNameError;
use crate::domain::user::errors::GenderError;
use crate::domain::user::errors::PaginationError;
use crate::domain::user::errors::PasswordPolicyError;
use crate::domain::user::errors::ProfileFieldError;
use crate::domain::user::errors::UserIdError;

/// User aggregate entity.
///
/// Represents a registered account. The plaintext password never reaches
/// this type, only its hash.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub full_name: FullName,
    pub phone: Option<PhoneNumber>,
    pub avatar_url: Option<AvatarUrl>,
    pub gender: Gender,
    pub date_of_birth: Option<DateOfBirth>,
    pub is_active: bool,
    pub is_verified: bool,
    pub role_id: RoleId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Claims describing this user inside an access token.
    pub fn identity_claims(&self) -> auth::IdentityClaims {
        auth::IdentityClaims::new(self.id, self.email.as_str(), self.role_id.0)
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role identifier, matching the rows seeded into the `roles` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleId(pub i32);

impl RoleId {
    /// `customer`
    pub const CUSTOMER: RoleId = RoleId(1);
    /// `toko`, a store owner
    pub const STORE: RoleId = RoleId(2);
    /// `admin`
    pub const ADMIN: RoleId = RoleId(3);
}

impl Default for RoleId {
    fn default() -> Self {
        Self::CUSTOMER
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LENGTH: usize = 255;

    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `TooLong` - More than 255 characters, the width of the stored column
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_string();
        let length = email.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name of the account holder, 1-255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(String);

impl FullName {
    const MAX_LENGTH: usize = 255;

    pub fn new(full_name: String) -> Result<Self, FullNameError> {
        let full_name = full_name.trim().to_string();
        let length = full_name.chars().count();

        if length == 0 {
            Err(FullNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(FullNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(full_name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plaintext password as submitted by the user.
///
/// Lives only for the duration of a register or update call. `Debug` is
/// redacted so it cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = GenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(GenderError::Unknown(s.to_string())),
        }
    }
}

fn bounded_text(
    field: &'static str,
    value: String,
    max: usize,
) -> Result<String, ProfileFieldError> {
    let value = value.trim().to_string();
    let length = value.chars().count();
    if length > max {
        return Err(ProfileFieldError::TooLong {
            field,
            max,
            actual: length,
        });
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(phone: String) -> Result<Self, ProfileFieldError> {
        bounded_text("Phone", phone, 20).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUrl(String);

impl AvatarUrl {
    pub fn new(url: String) -> Result<Self, ProfileFieldError> {
        bounded_text("Avatar URL", url, 500).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Calendar date of birth, never in the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateOfBirth(NaiveDate);

impl DateOfBirth {
    pub fn new(date: NaiveDate) -> Result<Self, DateOfBirthError> {
        if date > Utc::now().date_naive() {
            return Err(DateOfBirthError::InFuture);
        }
        Ok(Self(date))
    }

    /// Parse a `YYYY-MM-DD` string.
    pub fn parse(s: &str) -> Result<Self, DateOfBirthError> {
        let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| DateOfBirthError::InvalidFormat(s.to_string()))?;
        Self::new(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

/// Page request for user listings. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i64,
    limit: i64,
}

impl Pagination {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    /// # Errors
    /// * `InvalidPage` - Page below 1, or so large the row offset overflows
    /// * `InvalidLimit` - Limit outside 1..=100
    pub fn new(page: i64, limit: i64) -> Result<Self, PaginationError> {
        if page < 1 {
            return Err(PaginationError::InvalidPage(page));
        }
        if !(1..=Self::MAX_LIMIT).contains(&limit) {
            return Err(PaginationError::InvalidLimit {
                max: Self::MAX_LIMIT,
                actual: limit,
            });
        }
        if (page - 1).checked_mul(limit).is_none() {
            return Err(PaginationError::InvalidPage(page));
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub email: EmailAddress,
    pub password: Password,
    pub full_name: FullName,
    pub phone: Option<PhoneNumber>,
    pub gender: Gender,
    pub date_of_birth: Option<DateOfBirth>,
}

impl RegisterUserCommand {
    /// Construct a command with only the required fields set.
    pub fn new(email: EmailAddress, password: Password, full_name: FullName) -> Self {
        Self {
            email,
            password,
            full_name,
            phone: None,
            gender: Gender::default(),
            date_of_birth: None,
        }
    }
}

/// Login attempt exactly as submitted.
///
/// Kept as raw strings: a malformed email must fail the same way an unknown
/// one does.
#[derive(Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Command to update an existing profile with optional validated fields.
///
/// Only provided fields will be updated.
#[derive(Debug, Default)]
pub struct UpdateUserCommand {
    pub full_name: Option<FullName>,
    pub phone: Option<PhoneNumber>,
    pub avatar_url: Option<AvatarUrl>,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<DateOfBirth>,
    pub password: Option<Password>,
}

/// Command to create the administrator account during seeding.
#[derive(Debug)]
pub struct ProvisionAdminCommand {
    pub email: EmailAddress,
    pub password: Password,
    pub full_name: FullName,
}

/// Successful login: a signed token plus the account it was issued for.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}
