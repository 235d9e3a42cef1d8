use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;

use sentra::error::{AuthError, TokenError, ValidationError};
use sentra::{
    Error, RegisterAccount, RepositoryProvider, Role, Sentra, SqliteRepositoryProvider,
    TokenConfig,
};

const TEST_HS256_SECRET: &[u8] = b"this_is_a_test_secret_key_for_hs256_tokens_not_for_prod";

async fn setup() -> Sentra<SqliteRepositoryProvider> {
    // A single connection so every statement sees the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    let repositories = SqliteRepositoryProvider::new(pool);
    repositories.migrate().await.unwrap();

    Sentra::new(
        Arc::new(repositories),
        TokenConfig::new_hs256(TEST_HS256_SECRET.to_vec()),
    )
}

fn register_request(username: &str, email: &str, password: &str) -> RegisterAccount {
    RegisterAccount {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        role: None,
        department_id: None,
    }
}

#[tokio::test]
async fn test_register_and_login() {
    let sentra = setup().await;

    let (account, token) = sentra
        .register(register_request("alice", "alice@example.com", "P@ssw0rd!"))
        .await
        .unwrap();

    assert_eq!(account.username, "alice");
    assert_eq!(account.email, "alice@example.com");
    assert_eq!(account.role, Role::Analyst);
    assert!(account.public_id.starts_with("usr_"));
    assert!(account.last_login_at.is_none());

    // Registration auto-logs-in: the returned token already works.
    let me = sentra.authenticate(&token).await.unwrap();
    assert_eq!(me.id, account.id);

    // A fresh login with either identifier works.
    let (by_username, _) = sentra.login("alice", "P@ssw0rd!").await.unwrap();
    assert_eq!(by_username.id, account.id);
    assert!(by_username.last_login_at.is_some());

    let (by_email, _) = sentra.login("Alice@Example.COM", "P@ssw0rd!").await.unwrap();
    assert_eq!(by_email.id, account.id);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let sentra = setup().await;
    sentra
        .register(register_request("alice", "alice@example.com", "P@ssw0rd!"))
        .await
        .unwrap();

    let wrong = sentra.login("alice", "P@ssw0rd!x").await.unwrap_err();
    let unknown = sentra.login("nobody", "P@ssw0rd!").await.unwrap_err();

    assert!(matches!(wrong, Error::Auth(AuthError::InvalidCredentials)));
    assert!(matches!(unknown, Error::Auth(AuthError::InvalidCredentials)));
    assert_eq!(wrong.to_string(), unknown.to_string());
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let sentra = setup().await;

    assert!(matches!(
        sentra.login("", "secret1").await,
        Err(Error::Validation(ValidationError::MissingField(_)))
    ));
    assert!(matches!(
        sentra.login("alice", "").await,
        Err(Error::Validation(ValidationError::MissingField(_)))
    ));
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let sentra = setup().await;
    sentra
        .register(register_request("alice", "alice@example.com", "P@ssw0rd!"))
        .await
        .unwrap();

    // Same username, different email.
    let result = sentra
        .register(register_request("alice", "alice2@example.com", "secret1"))
        .await;
    assert!(matches!(
        result,
        Err(Error::Auth(AuthError::DuplicateIdentity))
    ));

    // Same email, case-insensitively.
    let result = sentra
        .register(register_request("alice2", "ALICE@EXAMPLE.COM", "secret1"))
        .await;
    assert!(matches!(
        result,
        Err(Error::Auth(AuthError::DuplicateIdentity))
    ));

    // A genuinely new identity still works.
    let result = sentra
        .register(register_request("bob", "bob@example.com", "secret1"))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_register_validates_input() {
    let sentra = setup().await;

    // Password below the 6 character minimum.
    let result = sentra
        .register(register_request("alice", "alice@example.com", "pw"))
        .await;
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::InvalidPassword(_)))
    ));

    // Malformed email.
    let result = sentra
        .register(register_request("alice", "not-an-email", "secret1"))
        .await;
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::InvalidEmail(_)))
    ));

    // Username too short.
    let result = sentra
        .register(register_request("ab", "alice@example.com", "secret1"))
        .await;
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::InvalidUsername(_)))
    ));
}

#[tokio::test]
async fn test_change_password_swaps_the_credential() {
    let sentra = setup().await;
    let (account, _) = sentra
        .register(register_request("alice", "alice@example.com", "P@ssw0rd!"))
        .await
        .unwrap();

    sentra
        .change_password(&account.id, "P@ssw0rd!", "n3w-secret")
        .await
        .unwrap();

    // New password logs in, old one no longer does.
    assert!(sentra.login("alice", "n3w-secret").await.is_ok());
    assert!(matches!(
        sentra.login("alice", "P@ssw0rd!").await,
        Err(Error::Auth(AuthError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn test_change_password_rejects_bad_input() {
    let sentra = setup().await;
    let (account, _) = sentra
        .register(register_request("alice", "alice@example.com", "P@ssw0rd!"))
        .await
        .unwrap();

    let result = sentra
        .change_password(&account.id, "wrong-current", "n3w-secret")
        .await;
    assert!(matches!(
        result,
        Err(Error::Auth(AuthError::InvalidCredentials))
    ));

    let result = sentra.change_password(&account.id, "P@ssw0rd!", "short").await;
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::InvalidPassword(_)))
    ));

    let result = sentra.change_password(&account.id, "", "n3w-secret").await;
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::MissingField(_)))
    ));

    // The credential is untouched after the failures above.
    assert!(sentra.login("alice", "P@ssw0rd!").await.is_ok());
}

#[tokio::test]
async fn test_logout_does_not_invalidate_tokens() {
    let sentra = setup().await;
    sentra
        .register(register_request("alice", "alice@example.com", "P@ssw0rd!"))
        .await
        .unwrap();

    let (_, token) = sentra.login("alice", "P@ssw0rd!").await.unwrap();

    sentra.logout().await.unwrap();

    // Stateless scheme: the discarded token stays valid until expiry.
    assert!(sentra.authenticate(&token).await.is_ok());
}

#[tokio::test]
async fn test_token_expiry() {
    use std::time::Duration as StdDuration;
    use tokio::time::sleep;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let repositories = SqliteRepositoryProvider::new(pool);
    repositories.migrate().await.unwrap();

    let tokens = TokenConfig::new_hs256(TEST_HS256_SECRET.to_vec())
        .expires_in(chrono::Duration::seconds(1));
    let sentra = Sentra::new(Arc::new(repositories), tokens);

    sentra
        .register(register_request("alice", "alice@example.com", "P@ssw0rd!"))
        .await
        .unwrap();
    let (_, token) = sentra.login("alice", "P@ssw0rd!").await.unwrap();

    assert!(sentra.authenticate(&token).await.is_ok());

    sleep(StdDuration::from_secs(2)).await;

    let result = sentra.authenticate(&token).await;
    assert!(matches!(result, Err(Error::Token(TokenError::Expired))));
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let sentra = setup().await;
    sentra
        .register(register_request("alice", "alice@example.com", "P@ssw0rd!"))
        .await
        .unwrap();

    let (_, token) = sentra.login("alice", "P@ssw0rd!").await.unwrap();

    let mut tampered = token.as_str().to_string();
    tampered.pop();
    tampered.push('x');

    let result = sentra
        .authenticate(&sentra::AccessToken::new(&tampered))
        .await;
    assert!(matches!(result, Err(Error::Token(TokenError::Invalid(_)))));
}
