mod common;

use std::sync::Arc;

use common::test_authenticator;
use user_service::domain::user::models::EmailAddress;
use user_service::domain::user::models::FullName;
use user_service::domain::user::models::LoginCommand;
use user_service::domain::user::models::Password;
use user_service::domain::user::models::ProvisionAdminCommand;
use user_service::domain::user::models::RegisterUserCommand;
use user_service::domain::user::models::RoleId;
use user_service::domain::user::ports::UserServicePort;
use user_service::domain::user::service::UserService;
use user_service::outbound::repositories::InMemoryUserRepository;
use user_service::user::errors::UserError;

fn service() -> UserService<InMemoryUserRepository> {
    UserService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(test_authenticator()),
    )
}

fn registration(email: &str, password: &str, full_name: &str) -> RegisterUserCommand {
    RegisterUserCommand::new(
        EmailAddress::new(email.to_string()).unwrap(),
        Password::new(password.to_string()).unwrap(),
        FullName::new(full_name.to_string()).unwrap(),
    )
}

fn login(email: &str, password: &str) -> LoginCommand {
    LoginCommand {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_register_then_login_lifecycle() {
    let service = service();
    let authenticator = test_authenticator();

    let user = service
        .register(registration("a@x.com", "secret1", "A"))
        .await
        .unwrap();
    assert_eq!(user.role_id, RoleId::CUSTOMER);

    let session = service.login(login("a@x.com", "secret1")).await.unwrap();
    assert_eq!(session.user.id, user.id);
    let identity = authenticator.validate_token(&session.token).unwrap();
    assert_eq!(identity.sub, user.id.to_string());
    assert_eq!(identity.role, RoleId::CUSTOMER.0);

    let wrong_password = service
        .login(login("a@x.com", "wrong-password"))
        .await
        .unwrap_err();
    let unknown_email = service
        .login(login("nobody@x.com", "secret1"))
        .await
        .unwrap_err();
    assert!(matches!(wrong_password, UserError::InvalidCredentials));
    assert!(matches!(unknown_email, UserError::InvalidCredentials));
    assert_eq!(wrong_password.reason_code(), unknown_email.reason_code());
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());

    service.set_user_active(&user.id, false).await.unwrap();
    let inactive = service.login(login("a@x.com", "secret1")).await.unwrap_err();
    assert!(matches!(inactive, UserError::AccountInactive));
    assert_eq!(inactive.reason_code(), "account_inactive");

    service.set_user_active(&user.id, true).await.unwrap();
    assert!(service.login(login("a@x.com", "secret1")).await.is_ok());
}

#[tokio::test]
async fn test_inactive_account_with_wrong_password_is_invalid_credentials() {
    let service = service();
    let user = service
        .register(registration("a@x.com", "secret1", "A"))
        .await
        .unwrap();
    service.set_user_active(&user.id, false).await.unwrap();

    let err = service
        .login(login("a@x.com", "wrong-password"))
        .await
        .unwrap_err();

    assert!(matches!(err, UserError::InvalidCredentials));
}

#[tokio::test]
async fn test_duplicate_registration() {
    let service = service();
    service
        .register(registration("a@x.com", "secret1", "A"))
        .await
        .unwrap();

    let err = service
        .register(registration("a@x.com", "secret2", "B"))
        .await
        .unwrap_err();

    assert!(matches!(err, UserError::EmailAlreadyExists(_)));
    assert_eq!(err.reason_code(), "duplicate_email");
}

#[tokio::test]
async fn test_provision_admin_is_idempotent() {
    let service = service();
    let command = || ProvisionAdminCommand {
        email: EmailAddress::new("admin@x.com".to_string()).unwrap(),
        password: Password::new("admin-secret".to_string()).unwrap(),
        full_name: FullName::new("Administrator".to_string()).unwrap(),
    };

    let admin = service.provision_admin(command()).await.unwrap().unwrap();
    assert_eq!(admin.role_id, RoleId::ADMIN);
    assert!(admin.is_active);
    assert!(admin.is_verified);

    assert!(service.provision_admin(command()).await.unwrap().is_none());

    let session = service
        .login(login("admin@x.com", "admin-secret"))
        .await
        .unwrap();
    assert_eq!(session.user.id, admin.id);
}
