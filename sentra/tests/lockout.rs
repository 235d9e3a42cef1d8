//! End-to-end tests of the account lockout state machine over SQLite.

use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use sentra::error::AuthError;
use sentra::{
    Error, LockoutPolicy, RegisterAccount, RepositoryProvider, Sentra, SqliteRepositoryProvider,
    TokenConfig,
};

const TEST_HS256_SECRET: &[u8] = b"this_is_a_test_secret_key_for_hs256_tokens_not_for_prod";

async fn setup_with_policy(
    policy: LockoutPolicy,
) -> (Sentra<SqliteRepositoryProvider>, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    let repositories = SqliteRepositoryProvider::new(pool.clone());
    repositories.migrate().await.unwrap();

    let sentra = Sentra::with_config(
        Arc::new(repositories),
        TokenConfig::new_hs256(TEST_HS256_SECRET.to_vec()),
        policy,
    );

    (sentra, pool)
}

async fn setup() -> (Sentra<SqliteRepositoryProvider>, SqlitePool) {
    setup_with_policy(LockoutPolicy::default()).await
}

async fn register_alice(sentra: &Sentra<SqliteRepositoryProvider>) {
    sentra
        .register(RegisterAccount {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "P@ssw0rd!".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            role: None,
            department_id: None,
        })
        .await
        .unwrap();
}

async fn lock_state(pool: &SqlitePool, username: &str) -> (i64, Option<i64>) {
    sqlx::query_as("SELECT failed_attempts, locked_until FROM accounts WHERE username = ?1")
        .bind(username)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Simulate the passage of the lock window by back-dating `locked_until`.
async fn expire_lock(pool: &SqlitePool, username: &str) {
    sqlx::query("UPDATE accounts SET locked_until = ?1 WHERE username = ?2")
        .bind(Utc::now().timestamp() - 1)
        .bind(username)
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_five_failures_lock_the_account() {
    let (sentra, pool) = setup().await;
    register_alice(&sentra).await;

    for i in 1..=5 {
        let result = sentra.login("alice", &format!("wrong{i}")).await;
        assert!(
            matches!(result, Err(Error::Auth(AuthError::InvalidCredentials))),
            "attempt {i} should report invalid credentials"
        );
    }

    let (attempts, locked_until) = lock_state(&pool, "alice").await;
    assert_eq!(attempts, 5);
    let locked_until = locked_until.expect("5th failure must set the lock");

    // Lock window is 2 hours from the 5th failure. Allow a little slack for
    // test runtime.
    let expected = Utc::now().timestamp() + 2 * 60 * 60;
    assert!((locked_until - expected).abs() < 10);

    // 6th attempt, correct password: still locked out.
    let result = sentra.login("alice", "P@ssw0rd!").await;
    assert!(matches!(result, Err(Error::Auth(AuthError::AccountLocked))));

    // And the rejection consumed no verification attempt.
    let (attempts_after, _) = lock_state(&pool, "alice").await;
    assert_eq!(attempts_after, 5);
}

#[tokio::test]
async fn test_correct_password_before_window_elapses_stays_locked() {
    let (sentra, _pool) = setup().await;
    register_alice(&sentra).await;

    for i in 1..=5 {
        let _ = sentra.login("alice", &format!("wrong{i}")).await;
    }

    // Repeated correct-password attempts inside the window all fail the
    // same way.
    for _ in 0..3 {
        let result = sentra.login("alice", "P@ssw0rd!").await;
        assert!(matches!(result, Err(Error::Auth(AuthError::AccountLocked))));
    }
}

#[tokio::test]
async fn test_expired_window_resets_counter_on_next_failure() {
    let (sentra, pool) = setup().await;
    register_alice(&sentra).await;

    for i in 1..=5 {
        let _ = sentra.login("alice", &format!("wrong{i}")).await;
    }
    expire_lock(&pool, "alice").await;

    // One wrong attempt after expiry: counter restarts at 1, not 6, and the
    // stale lock is cleared.
    let result = sentra.login("alice", "wrong6").await;
    assert!(matches!(
        result,
        Err(Error::Auth(AuthError::InvalidCredentials))
    ));

    let (attempts, locked_until) = lock_state(&pool, "alice").await;
    assert_eq!(attempts, 1);
    assert!(locked_until.is_none());

    // The correct password now succeeds and fully resets the state.
    let (account, _) = sentra.login("alice", "P@ssw0rd!").await.unwrap();
    assert_eq!(account.username, "alice");

    let (attempts, locked_until) = lock_state(&pool, "alice").await;
    assert_eq!(attempts, 0);
    assert!(locked_until.is_none());
}

#[tokio::test]
async fn test_alice_scenario_lock_then_expiry_then_login() {
    // The canonical walkthrough: 5 wrong passwords, a locked-out correct
    // attempt, window expiry, then a clean login.
    let (sentra, pool) = setup().await;
    register_alice(&sentra).await;

    for password in ["wrong1", "wrong2", "wrong3", "wrong4", "wrong5"] {
        let result = sentra.login("alice", password).await;
        assert!(matches!(
            result,
            Err(Error::Auth(AuthError::InvalidCredentials))
        ));
    }

    let result = sentra.login("alice", "P@ssw0rd!").await;
    assert!(matches!(result, Err(Error::Auth(AuthError::AccountLocked))));

    // 2 hours and change later...
    expire_lock(&pool, "alice").await;

    let (account, token) = sentra.login("alice", "P@ssw0rd!").await.unwrap();
    assert!(account.last_login_at.is_some());

    let (attempts, locked_until) = lock_state(&pool, "alice").await;
    assert_eq!(attempts, 0);
    assert!(locked_until.is_none());

    // The issued token authenticates.
    let me = sentra.authenticate(&token).await.unwrap();
    assert_eq!(me.id, account.id);
}

#[tokio::test]
async fn test_short_window_round_trip_with_real_time() {
    use std::time::Duration as StdDuration;
    use tokio::time::sleep;

    // Shrink the policy so the window genuinely elapses in test time.
    let (sentra, _pool) = setup_with_policy(LockoutPolicy {
        max_failed_attempts: 3,
        lock_duration: chrono::Duration::seconds(1),
    })
    .await;
    register_alice(&sentra).await;

    for i in 1..=3 {
        let _ = sentra.login("alice", &format!("wrong{i}")).await;
    }
    assert!(matches!(
        sentra.login("alice", "P@ssw0rd!").await,
        Err(Error::Auth(AuthError::AccountLocked))
    ));

    sleep(StdDuration::from_secs(2)).await;

    assert!(sentra.login("alice", "P@ssw0rd!").await.is_ok());
}

#[tokio::test]
async fn test_successful_login_clears_partial_count() {
    let (sentra, pool) = setup().await;
    register_alice(&sentra).await;

    for i in 1..=3 {
        let _ = sentra.login("alice", &format!("wrong{i}")).await;
    }
    let (attempts, _) = lock_state(&pool, "alice").await;
    assert_eq!(attempts, 3);

    sentra.login("alice", "P@ssw0rd!").await.unwrap();

    let (attempts, locked_until) = lock_state(&pool, "alice").await;
    assert_eq!(attempts, 0);
    assert!(locked_until.is_none());
}

#[tokio::test]
async fn test_inactive_account_rejected_without_counter_change() {
    let (sentra, pool) = setup().await;
    register_alice(&sentra).await;

    // Two failures on the active account first.
    for i in 1..=2 {
        let _ = sentra.login("alice", &format!("wrong{i}")).await;
    }

    sqlx::query("UPDATE accounts SET status = 'inactive' WHERE username = 'alice'")
        .execute(&pool)
        .await
        .unwrap();

    // Correct password on an inactive account: a distinct, reported error,
    // and the counter is neither incremented nor reset.
    let result = sentra.login("alice", "P@ssw0rd!").await;
    assert!(matches!(
        result,
        Err(Error::Auth(AuthError::AccountInactive))
    ));

    let (attempts, _) = lock_state(&pool, "alice").await;
    assert_eq!(attempts, 2);

    // Suspended is treated the same way.
    sqlx::query("UPDATE accounts SET status = 'suspended' WHERE username = 'alice'")
        .execute(&pool)
        .await
        .unwrap();
    let result = sentra.login("alice", "P@ssw0rd!").await;
    assert!(matches!(
        result,
        Err(Error::Auth(AuthError::AccountInactive))
    ));
}

#[tokio::test]
async fn test_concurrent_failures_do_not_undercount() {
    // A high threshold so the probe measures counting, not locking.
    let (sentra, pool) = setup_with_policy(LockoutPolicy {
        max_failed_attempts: 10,
        lock_duration: chrono::Duration::hours(2),
    })
    .await;
    register_alice(&sentra).await;

    let sentra = Arc::new(sentra);
    let mut handles = Vec::new();
    for i in 0..5 {
        let sentra = sentra.clone();
        handles.push(tokio::spawn(async move {
            let _ = sentra.login("alice", &format!("wrong{i}")).await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // The conditional single-statement update means every failure counts:
    // no read-then-write interleaving can drop an increment.
    let (attempts, _) = lock_state(&pool, "alice").await;
    assert_eq!(attempts, 5);
}

#[tokio::test]
async fn test_lockouts_are_per_account() {
    let (sentra, _pool) = setup().await;
    register_alice(&sentra).await;
    sentra
        .register(RegisterAccount {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "hunter22".to_string(),
            first_name: "Bob".to_string(),
            last_name: "Jones".to_string(),
            role: None,
            department_id: None,
        })
        .await
        .unwrap();

    for i in 1..=5 {
        let _ = sentra.login("alice", &format!("wrong{i}")).await;
    }

    assert!(matches!(
        sentra.login("alice", "P@ssw0rd!").await,
        Err(Error::Auth(AuthError::AccountLocked))
    ));

    // Bob is unaffected.
    assert!(sentra.login("bob", "hunter22").await.is_ok());
}
