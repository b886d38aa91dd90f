use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::AuthenticatedSession;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Gender;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Pagination;
use crate::domain::user::models::ProvisionAdminCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::RoleId;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    fn hash_password(&self, password: &str) -> Result<String, UserError> {
        self.authenticator.hash_password(password).map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            UserError::HashingFailed(e.to_string())
        })
    }

    async fn require_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        let password_hash = self.hash_password(command.password.expose())?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: command.email,
            password_hash,
            full_name: command.full_name,
            phone: command.phone,
            avatar_url: None,
            gender: command.gender,
            date_of_birth: command.date_of_birth,
            is_active: true,
            is_verified: false,
            role_id: RoleId::CUSTOMER,
            created_at: now,
            updated_at: now,
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedSession, UserError> {
        // Identity lookup: a malformed email is just another unknown email
        let candidate = match EmailAddress::new(command.email) {
            Ok(email) => self.repository.find_by_email(&email).await?,
            Err(_) => None,
        };
        let Some(user) = candidate else {
            tracing::info!("Login rejected: no matching account");
            return Err(UserError::InvalidCredentials);
        };

        // Credential check
        if !self
            .authenticator
            .verify_password(&command.password, &user.password_hash)
        {
            tracing::info!(user_id = %user.id, "Login rejected: credential mismatch");
            return Err(UserError::InvalidCredentials);
        }

        // Account state check, only reachable with proven credentials
        if !user.is_active {
            tracing::warn!(user_id = %user.id, "Login rejected: account inactive");
            return Err(UserError::AccountInactive);
        }

        // Token mint
        let issued = self
            .authenticator
            .issue_token(&user.identity_claims())
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Token issuance failed");
                UserError::TokenIssuanceFailed(e.to_string())
            })?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthenticatedSession {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.require_user(id).await
    }

    async fn list_users(&self, pagination: Pagination) -> Result<Vec<User>, UserError> {
        self.repository
            .list(pagination.offset(), pagination.limit())
            .await
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self.require_user(id).await?;

        if let Some(full_name) = command.full_name {
            user.full_name = full_name;
        }
        if let Some(phone) = command.phone {
            user.phone = Some(phone);
        }
        if let Some(avatar_url) = command.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        if let Some(gender) = command.gender {
            user.gender = gender;
        }
        if let Some(date_of_birth) = command.date_of_birth {
            user.date_of_birth = Some(date_of_birth);
        }
        if let Some(new_password) = command.password {
            user.password_hash = self.hash_password(new_password.expose())?;
        }
        user.updated_at = Utc::now();

        self.repository.update(user).await
    }

    async fn set_user_active(&self, id: &UserId, active: bool) -> Result<User, UserError> {
        let mut user = self.require_user(id).await?;

        user.is_active = active;
        user.updated_at = Utc::now();

        let updated_user = self.repository.update(user).await?;
        tracing::info!(user_id = %id, active, "Account state changed");

        Ok(updated_user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }

    async fn provision_admin(
        &self,
        command: ProvisionAdminCommand,
    ) -> Result<Option<User>, UserError> {
        if self.repository.find_by_email(&command.email).await?.is_some() {
            tracing::info!(email = %command.email, "Administrator already present, skipping");
            return Ok(None);
        }

        let password_hash = self.hash_password(command.password.expose())?;

        let now = Utc::now();
        let admin = User {
            id: UserId::new(),
            email: command.email,
            password_hash,
            full_name: command.full_name,
            phone: None,
            avatar_url: None,
            gender: Gender::Other,
            date_of_birth: None,
            is_active: true,
            is_verified: true,
            role_id: RoleId::ADMIN,
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.create(admin).await?;
        tracing::info!(user_id = %created.id, "Administrator provisioned");

        Ok(Some(created))
    }
}

#[cfg(test)]
mod tests {
    use auth::AuthenticatorSettings;
    use auth::HashingCost;
    use chrono::Duration;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::FullName;
    use crate::domain::user::models::Password;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
            async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(
            Authenticator::new(AuthenticatorSettings {
                jwt_secret: b"test_secret_key_at_least_32_bytes!".to_vec(),
                token_ttl: Duration::hours(24),
                hashing_cost: HashingCost {
                    memory_kib: 1024,
                    iterations: 1,
                    parallelism: 1,
                },
            })
            .expect("Failed to build authenticator"),
        )
    }

    fn email(s: &str) -> EmailAddress {
        EmailAddress::new(s.to_string()).unwrap()
    }

    fn stored_user(authenticator: &Authenticator, password: &str, active: bool) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            email: email("a@x.com"),
            password_hash: authenticator.hash_password(password).unwrap(),
            full_name: FullName::new("A".to_string()).unwrap(),
            phone: None,
            avatar_url: None,
            gender: Gender::Other,
            date_of_birth: None,
            is_active: active,
            is_verified: false,
            role_id: RoleId::CUSTOMER,
            created_at: now,
            updated_at: now,
        }
    }

    fn login(email: &str, password: &str) -> LoginCommand {
        LoginCommand {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .withf(|user| {
                user.email.as_str() == "a@x.com"
                    && user.password_hash.starts_with("$argon2id$")
                    && !user.password_hash.contains("secret1")
                    && user.is_active
                    && !user.is_verified
                    && user.role_id == RoleId::CUSTOMER
            })
            .times(1)
            .returning(|user| Ok(user));

        let authenticator = authenticator();
        let service = UserService::new(Arc::new(repository), Arc::clone(&authenticator));

        let command = RegisterUserCommand::new(
            email("a@x.com"),
            Password::new("secret1".to_string()).unwrap(),
            FullName::new("A".to_string()).unwrap(),
        );

        let user = service.register(command).await.expect("Register failed");
        assert_eq!(user.full_name.as_str(), "A");
        assert_eq!(user.gender, Gender::Other);
        assert!(authenticator.verify_password("secret1", &user.password_hash));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_propagates() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .times(1)
            .returning(|user| Err(UserError::EmailAlreadyExists(user.email.to_string())));

        let service = UserService::new(Arc::new(repository), authenticator());

        let command = RegisterUserCommand::new(
            email("a@x.com"),
            Password::new("secret1".to_string()).unwrap(),
            FullName::new("A".to_string()).unwrap(),
        );

        let result = service.register(command).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let authenticator = authenticator();
        let user = stored_user(&authenticator, "secret1", true);
        let user_id = user.id;

        let mut repository = MockTestUserRepository::new();
        let returned_user = user.clone();
        repository
            .expect_find_by_email()
            .withf(|e| e.as_str() == "a@x.com")
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));

        let service = UserService::new(Arc::new(repository), Arc::clone(&authenticator));

        let session = service
            .login(login("a@x.com", "secret1"))
            .await
            .expect("Login failed");

        assert_eq!(session.user.id, user_id);
        assert!(session.expires_at > Utc::now());

        let claims = authenticator
            .validate_token(&session.token)
            .expect("Token should validate");
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, RoleId::CUSTOMER.0);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let authenticator = authenticator();
        let user = stored_user(&authenticator, "secret1", true);

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository), authenticator);

        let result = service.login(login("a@x.com", "wrong")).await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service.login(login("missing@x.com", "x")).await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_malformed_email_skips_lookup() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_email().times(0);

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service.login(login("not-an-email", "secret1")).await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_corrupt_stored_hash() {
        let authenticator = authenticator();
        let mut user = stored_user(&authenticator, "secret1", true);
        user.password_hash = "not-a-valid-hash".to_string();

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository), authenticator);

        let result = service.login(login("a@x.com", "secret1")).await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_inactive_account() {
        let authenticator = authenticator();
        let user = stored_user(&authenticator, "secret1", false);

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(2)
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository), authenticator);

        let result = service.login(login("a@x.com", "secret1")).await;
        assert!(matches!(result, Err(UserError::AccountInactive)));

        // Inactive state is not revealed without the right password
        let result = service.login(login("a@x.com", "wrong")).await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_store_failure_is_not_invalid_credentials() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection reset".to_string())));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service.login(login("a@x.com", "secret1")).await;
        assert!(matches!(result, Err(UserError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service.get_user(&UserId::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_users_uses_offset_and_limit() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_list()
            .withf(|offset, limit| *offset == 20 && *limit == 10)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let service = UserService::new(Arc::new(repository), authenticator());

        let users = service
            .list_users(Pagination::new(3, 10).unwrap())
            .await
            .expect("List failed");
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_update_user_applies_present_fields() {
        let authenticator = authenticator();
        let user = stored_user(&authenticator, "secret1", true);
        let user_id = user.id;
        let old_hash = user.password_hash.clone();

        let mut repository = MockTestUserRepository::new();
        let returned_user = user.clone();
        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));
        repository
            .expect_update()
            .withf(move |user| {
                user.full_name.as_str() == "Alice"
                    && user.gender == Gender::Female
                    && user.email.as_str() == "a@x.com"
                    && user.password_hash != old_hash
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository), Arc::clone(&authenticator));

        let command = UpdateUserCommand {
            full_name: Some(FullName::new("Alice".to_string()).unwrap()),
            gender: Some(Gender::Female),
            password: Some(Password::new("secret2".to_string()).unwrap()),
            ..Default::default()
        };

        let updated = service
            .update_user(&user_id, command)
            .await
            .expect("Update failed");
        assert!(authenticator.verify_password("secret2", &updated.password_hash));
        assert!(!authenticator.verify_password("secret1", &updated.password_hash));
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_update().times(0);

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .update_user(&UserId::new(), UpdateUserCommand::default())
            .await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_set_user_active() {
        let authenticator = authenticator();
        let user = stored_user(&authenticator, "secret1", true);
        let user_id = user.id;

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_update()
            .withf(|user| !user.is_active)
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository), authenticator);

        let updated = service
            .set_user_active(&user_id, false)
            .await
            .expect("Deactivation failed");
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        let user_id = UserId::new();

        repository
            .expect_delete()
            .times(1)
            .returning(move |_| Err(UserError::NotFound(user_id.to_string())));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service.delete_user(&user_id).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_provision_admin_creates_once() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|user| user.role_id == RoleId::ADMIN && user.is_verified && user.is_active)
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository), authenticator());

        let created = service
            .provision_admin(ProvisionAdminCommand {
                email: email("admin@ecommerce.com"),
                password: Password::new("admin-password".to_string()).unwrap(),
                full_name: FullName::new("Administrator".to_string()).unwrap(),
            })
            .await
            .expect("Provisioning failed");
        assert!(created.is_some());
    }

    #[tokio::test]
    async fn test_provision_admin_skips_existing() {
        let authenticator = authenticator();
        let existing = stored_user(&authenticator, "admin-password", true);

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository), authenticator);

        let created = service
            .provision_admin(ProvisionAdminCommand {
                email: email("a@x.com"),
                password: Password::new("admin-password".to_string()).unwrap(),
                full_name: FullName::new("Administrator".to_string()).unwrap(),
            })
            .await
            .expect("Provisioning failed");
        assert!(created.is_none());
    }
}
