//! Per-browser-session state for the web front-end.
//!
//! The web flow collects UCS credentials once on `/` and reuses them on
//! `/vlans` and `/vnics`. Each browser gets its own token-keyed entry
//! here; nothing is shared between clients, so two administrators using
//! the tool at once cannot see each other's credentials or results.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

/// Name of the browser cookie carrying the session token.
pub const SESSION_COOKIE: &str = "ucsvlan_session";

/// UCS credentials held for one browser session.
#[derive(Debug, Clone)]
pub struct WebSession {
    pub host: String,
    pub username: String,
    pub password: String,
}

struct Entry {
    session: WebSession,
    last_seen: Instant,
}

/// Token-keyed in-memory session store with idle expiry.
pub struct SessionStore {
    entries: RwLock<HashMap<Uuid, Entry>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Store credentials under a fresh token.
    pub async fn create(&self, host: String, username: String, password: String) -> Uuid {
        let token = Uuid::new_v4();
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.last_seen.elapsed() < self.ttl);
        entries.insert(
            token,
            Entry {
                session: WebSession {
                    host,
                    username,
                    password,
                },
                last_seen: Instant::now(),
            },
        );
        token
    }

    /// Fetch the session for a token, refreshing its idle timer. `None`
    /// for unknown or expired tokens.
    pub async fn get(&self, token: Uuid) -> Option<WebSession> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(&token) {
            Some(entry) if entry.last_seen.elapsed() < self.ttl => {
                entry.last_seen = Instant::now();
                Some(entry.session.clone())
            }
            Some(_) => {
                entries.remove(&token);
                None
            }
            None => None,
        }
    }

    pub async fn remove(&self, token: Uuid) {
        self.entries.write().await.remove(&token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        tokio_test::block_on(async {
            let store = SessionStore::new(Duration::from_secs(60));
            let token = store
                .create("ucs1".into(), "admin".into(), "secret".into())
                .await;
            let session = store.get(token).await.unwrap();
            assert_eq!(session.host, "ucs1");
            assert_eq!(session.username, "admin");
        });
    }

    #[test]
    fn test_sessions_are_isolated() {
        tokio_test::block_on(async {
            let store = SessionStore::new(Duration::from_secs(60));
            let a = store.create("ucs-a".into(), "alice".into(), "pa".into()).await;
            let b = store.create("ucs-b".into(), "bob".into(), "pb".into()).await;
            assert_eq!(store.get(a).await.unwrap().host, "ucs-a");
            assert_eq!(store.get(b).await.unwrap().host, "ucs-b");
        });
    }

    #[test]
    fn test_expired_token_rejected() {
        tokio_test::block_on(async {
            let store = SessionStore::new(Duration::from_secs(0));
            let token = store.create("ucs1".into(), "admin".into(), "s".into()).await;
            assert!(store.get(token).await.is_none());
        });
    }

    #[test]
    fn test_remove() {
        tokio_test::block_on(async {
            let store = SessionStore::new(Duration::from_secs(60));
            let token = store.create("ucs1".into(), "admin".into(), "s".into()).await;
            store.remove(token).await;
            assert!(store.get(token).await.is_none());
        });
    }
}
