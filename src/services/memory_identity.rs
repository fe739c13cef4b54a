//! In-process identity provider used when no Firebase API key is configured

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use super::identity::{looks_like_email, AuthSession, Credentials, IdentityProvider};
use crate::error::AuthError;

/// Consecutive failures that lock an account
pub const MAX_FAILED_ATTEMPTS: u32 = 5;
/// How long a locked account refuses sign-in
pub const LOCKOUT_COOLDOWN: Duration = Duration::from_secs(5 * 60);
pub const MIN_PASSWORD_LEN: usize = 6;

const TOKEN_TTL_SECONDS: u64 = 3600;

#[derive(Debug)]
struct Account {
    uid: String,
    display_name: Option<String>,
    password_digest: String,
    failed_attempts: u32,
    locked_at: Option<Instant>,
}

impl Account {
    /// Whether the account is still inside its cooldown; an expired lock is cleared
    fn is_locked(&mut self) -> bool {
        match self.locked_at {
            Some(at) if at.elapsed() < LOCKOUT_COOLDOWN => true,
            Some(_) => {
                self.locked_at = None;
                self.failed_attempts = 0;
                false
            }
            None => false,
        }
    }

    fn record_failure(&mut self) {
        self.failed_attempts += 1;
        if self.failed_attempts >= MAX_FAILED_ATTEMPTS {
            self.locked_at = Some(Instant::now());
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryIdentity {
    accounts: Mutex<HashMap<String, Account>>,
}

impl InMemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    fn accounts(&self) -> MutexGuard<'_, HashMap<String, Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn digest(uid: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(uid.as_bytes());
        hasher.update(b":");
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn session_for(email: &str, account: &Account) -> AuthSession {
        AuthSession {
            uid: account.uid.clone(),
            email: email.to_string(),
            display_name: account.display_name.clone(),
            id_token: Uuid::new_v4().simple().to_string(),
            refresh_token: Some(Uuid::new_v4().simple().to_string()),
            expires_in_seconds: TOKEN_TTL_SECONDS,
        }
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, AuthError> {
        let email = credentials.email().to_lowercase();
        if !looks_like_email(&email) {
            return Err(AuthError::InvalidEmail);
        }

        let mut accounts = self.accounts();
        let account = accounts
            .get_mut(&email)
            .ok_or(AuthError::InvalidCredentials)?;

        if account.is_locked() {
            warn!("Sign-in refused for locked account {}", account.uid);
            return Err(AuthError::TooManyRequests);
        }

        if Self::digest(&account.uid, credentials.password()) != account.password_digest {
            account.record_failure();
            warn!(
                "Wrong password for {} ({} consecutive failures)",
                account.uid, account.failed_attempts
            );
            return Err(AuthError::InvalidCredentials);
        }

        account.failed_attempts = 0;
        info!("Signed in {}", account.uid);
        Ok(Self::session_for(&email, account))
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        display_name: Option<&str>,
    ) -> Result<AuthSession, AuthError> {
        let email = credentials.email().to_lowercase();
        if !looks_like_email(&email) {
            return Err(AuthError::InvalidEmail);
        }
        if credentials.password().chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let mut accounts = self.accounts();
        if accounts.contains_key(&email) {
            return Err(AuthError::EmailInUse);
        }

        let uid = Uuid::new_v4().to_string();
        let account = Account {
            password_digest: Self::digest(&uid, credentials.password()),
            uid,
            display_name: display_name.map(str::to_string),
            failed_attempts: 0,
            locked_at: None,
        };
        let session = Self::session_for(&email, &account);
        info!("Created account {}", account.uid);
        accounts.insert(email, account);

        Ok(session)
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials::new(email, password).unwrap()
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let identity = InMemoryIdentity::new();
        let created = identity
            .sign_up(&creds("Shopper@Example.com", "hunter22"), Some("Shopper"))
            .await
            .unwrap();
        assert_eq!(created.email, "shopper@example.com");

        let session = identity
            .sign_in(&creds("shopper@example.com", "hunter22"))
            .await
            .unwrap();
        assert_eq!(session.uid, created.uid);
        assert_eq!(session.display_name.as_deref(), Some("Shopper"));
        assert_ne!(session.id_token, created.id_token);
    }

    #[tokio::test]
    async fn sign_up_failures_are_classified() {
        let identity = InMemoryIdentity::new();
        assert_eq!(
            identity.sign_up(&creds("not-an-email", "hunter22"), None).await,
            Err(AuthError::InvalidEmail)
        );
        assert_eq!(
            identity.sign_up(&creds("a@b.co", "123"), None).await,
            Err(AuthError::WeakPassword)
        );
        identity.sign_up(&creds("a@b.co", "hunter22"), None).await.unwrap();
        assert_eq!(
            identity.sign_up(&creds("A@B.co", "hunter22"), None).await,
            Err(AuthError::EmailInUse)
        );
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_look_the_same() {
        let identity = InMemoryIdentity::new();
        identity.sign_up(&creds("a@b.co", "hunter22"), None).await.unwrap();

        assert_eq!(
            identity.sign_in(&creds("nobody@b.co", "hunter22")).await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            identity.sign_in(&creds("a@b.co", "wrong-one")).await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_failures_lock_the_account() {
        let identity = InMemoryIdentity::new();
        identity.sign_up(&creds("a@b.co", "hunter22"), None).await.unwrap();

        for _ in 0..MAX_FAILED_ATTEMPTS {
            assert_eq!(
                identity.sign_in(&creds("a@b.co", "nope-nope")).await,
                Err(AuthError::InvalidCredentials)
            );
        }
        assert_eq!(
            identity.sign_in(&creds("a@b.co", "hunter22")).await,
            Err(AuthError::TooManyRequests)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn lockout_expires_after_cooldown() {
        let identity = InMemoryIdentity::new();
        identity.sign_up(&creds("a@b.co", "hunter22"), None).await.unwrap();

        for _ in 0..MAX_FAILED_ATTEMPTS {
            let _ = identity.sign_in(&creds("a@b.co", "nope-nope")).await;
        }

        tokio::time::advance(LOCKOUT_COOLDOWN - Duration::from_secs(1)).await;
        assert_eq!(
            identity.sign_in(&creds("a@b.co", "hunter22")).await,
            Err(AuthError::TooManyRequests)
        );

        tokio::time::advance(Duration::from_secs(1)).await;
        identity.sign_in(&creds("a@b.co", "hunter22")).await.unwrap();

        // The failure count starts over once the lock lifts
        for _ in 0..MAX_FAILED_ATTEMPTS - 1 {
            assert_eq!(
                identity.sign_in(&creds("a@b.co", "nope-nope")).await,
                Err(AuthError::InvalidCredentials)
            );
        }
        identity.sign_in(&creds("a@b.co", "hunter22")).await.unwrap();
    }
}
