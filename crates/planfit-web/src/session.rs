//! Per-browser session state keyed by a signed opaque token.
//!
//! The cookie carries `<uuid>.<hex digest>`; the digest binds the uuid to the
//! server's `SECRET_KEY`, so a tampered cookie simply reads as no session.
//! Storage sits behind [`SessionStore`] so the in-memory map can be swapped
//! for an external cache without touching the flow handlers.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use uuid::Uuid;

use planfit_core::{PlanPreferences, SurveyData};

/// Cookie name carrying the session token.
pub const SESSION_COOKIE: &str = "planfit_session";

/// Everything a session accumulates across the survey pages.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub survey: Option<SurveyData>,
    pub preferences: Option<PlanPreferences>,
}

/// Issue a fresh signed token.
pub fn issue_token(secret: &SecretString) -> String {
    let id = Uuid::new_v4().to_string();
    let signature = sign(secret, &id);
    format!("{}.{}", id, signature)
}

/// Check a presented token's signature. Returns the token on success.
pub fn verify_token<'a>(secret: &SecretString, token: &'a str) -> Option<&'a str> {
    let (id, signature) = token.split_once('.')?;
    (sign(secret, id) == signature).then_some(token)
}

fn sign(secret: &SecretString, id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.expose_secret().as_bytes());
    hasher.update(b".");
    hasher.update(id.as_bytes());
    hex::encode(hasher.finalize())
}

/// Pluggable session storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the state for a token, if it exists and has not expired.
    async fn load(&self, token: &str) -> Option<SessionState>;

    /// Write the state for a token, resetting its expiry clock.
    async fn store(&self, token: &str, state: SessionState);

    /// Drop a session.
    async fn remove(&self, token: &str);

    /// Number of live sessions.
    async fn session_count(&self) -> usize;
}

struct Entry {
    state: SessionState,
    touched: Instant,
}

/// In-process store with lazy TTL expiry.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Entry>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, token: &str) -> Option<SessionState> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(token) {
            Some(entry) if entry.touched.elapsed() > self.ttl => {
                sessions.remove(token);
                None
            }
            Some(entry) => Some(entry.state.clone()),
            None => None,
        }
    }

    async fn store(&self, token: &str, state: SessionState) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            token.to_string(),
            Entry {
                state,
                touched: Instant::now(),
            },
        );
    }

    async fn remove(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planfit_core::{ActivityLevel, Gender};

    fn secret() -> SecretString {
        SecretString::from("test-secret")
    }

    #[test]
    fn test_issued_token_verifies() {
        let token = issue_token(&secret());
        assert!(verify_token(&secret(), &token).is_some());
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let token = issue_token(&secret());
        let (id, _) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", id, "0".repeat(64));
        assert!(verify_token(&secret(), &forged).is_none());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(&secret());
        assert!(verify_token(&SecretString::from("other-secret"), &token).is_none());
    }

    #[test]
    fn test_unsigned_token_rejected() {
        assert!(verify_token(&secret(), "no-dot-here").is_none());
    }

    #[tokio::test]
    async fn test_store_round_trip() {
        let store = MemorySessionStore::new(Duration::from_secs(60));
        let token = issue_token(&secret());

        assert!(store.load(&token).await.is_none());

        let state = SessionState {
            survey: Some(SurveyData {
                gender: Gender::Male,
                height: 180.0,
                weight: 80.0,
                age: 25,
                activity_level: ActivityLevel::Sedentary,
                goal: "bulk".to_string(),
            }),
            preferences: None,
        };
        store.store(&token, state).await;

        let loaded = store.load(&token).await.unwrap();
        assert_eq!(loaded.survey.unwrap().age, 25);
        assert_eq!(store.session_count().await, 1);

        store.remove(&token).await;
        assert!(store.load(&token).await.is_none());
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_expired_entry_is_dropped_on_load() {
        let store = MemorySessionStore::new(Duration::from_millis(10));
        let token = issue_token(&secret());
        store.store(&token, SessionState::default()).await;

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(store.load(&token).await.is_none());
        assert_eq!(store.session_count().await, 0);
    }
}
