//! Per-conversation intake sessions and where they are kept.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::flow::Stage;

/// Identity of one conversation: a user inside a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub chat_id: i64,
    pub user_id: u64,
}

impl SessionKey {
    pub fn new(chat_id: i64, user_id: u64) -> Self {
        Self { chat_id, user_id }
    }
}

/// Answers collected so far. Each field is set by exactly one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    pub audience: Option<String>,
    pub language: Option<String>,
    pub goal: Option<String>,
    pub name: Option<String>,
    /// Normalized phone, set once the phone step accepted input.
    pub phone: Option<String>,
}

/// A conversation's position in the intake flow plus its answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub stage: Stage,
    pub answers: Answers,
}

impl Session {
    /// A fresh session at the first question.
    pub fn new() -> Self {
        Self {
            stage: Stage::AwaitingAudience,
            answers: Answers::default(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Storage for sessions keyed by conversation.
///
/// Callers never hold a session across events: every event is a
/// `get`, a pure transition, then a `put` or `clear`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: SessionKey) -> Option<Session>;

    async fn put(&self, key: SessionKey, session: Session);

    async fn clear(&self, key: SessionKey);
}

#[derive(Debug)]
struct Entry {
    session: Session,
    touched: Instant,
}

/// Default idle lifetime of a session.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Process-local session store with idle expiry.
#[derive(Debug)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<SessionKey, Entry>>,
    /// `None` keeps sessions until cleared.
    ttl: Option<Duration>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        self.ttl
            .map(|ttl| entry.touched.elapsed() > ttl)
            .unwrap_or(false)
    }

    /// Drop every session idle for longer than the TTL.
    /// Returns the number of sessions removed.
    pub async fn evict_expired(&self) -> usize {
        if self.ttl.is_none() {
            return 0;
        }
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, remaining = entries.len(), "Evicted expired sessions");
        }
        removed
    }

    /// Number of stored sessions, expired ones included until evicted.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(Some(DEFAULT_SESSION_TTL))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: SessionKey) -> Option<Session> {
        let entries = self.entries.read().await;
        entries
            .get(&key)
            .filter(|entry| !self.is_expired(entry))
            .map(|entry| entry.session.clone())
    }

    async fn put(&self, key: SessionKey, session: Session) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            Entry {
                session,
                touched: Instant::now(),
            },
        );
    }

    async fn clear(&self, key: SessionKey) {
        self.entries.write().await.remove(&key);
    }
}
