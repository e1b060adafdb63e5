// session/mod.rs — in-memory conversation state with TTL and capacity
// eviction.
//
// No background reaper: both eviction passes run opportunistically
// before each analyze request, in order (expired first, then capacity).
// The store is the only shared mutable state in the daemon; every
// read-modify-write sequence holds the write lock for its full span.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::crawl::CrawlResult;

/// Sessions older than this are dropped on the next eviction pass.
pub const SESSION_TTL_HOURS: i64 = 24;
/// Hard cap on concurrently stored sessions.
pub const MAX_SESSIONS: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub site: CrawlResult,
    pub first_output: String,
    pub last_followup: Option<String>,
    pub history: Vec<ChatTurn>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(site: CrawlResult, first_output: String) -> Self {
        Self {
            site,
            first_output,
            last_followup: None,
            history: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    /// Unconditional overwrite; a repeat analysis replaces the whole
    /// session, it never merges.
    pub async fn put(&self, id: String, session: Session) {
        self.sessions.write().await.insert(id, session);
    }

    pub async fn get(&self, id: &str) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Appends one user/assistant exchange and records the assistant
    /// text as the latest follow-up. `false` if the session is gone.
    pub async fn record_followup(&self, id: &str, user: String, assistant: String) -> bool {
        let mut sessions = self.sessions.write().await;
        let Some(sess) = sessions.get_mut(id) else {
            return false;
        };
        sess.last_followup = Some(assistant.clone());
        sess.history.push(ChatTurn {
            role: Role::User,
            content: user,
        });
        sess.history.push(ChatTurn {
            role: Role::Assistant,
            content: assistant,
        });
        true
    }

    /// Empties history and the last follow-up, keeping the crawl corpus
    /// and first output. Returns the prior history length, or `None` if
    /// the session is unknown.
    pub async fn clear_history(&self, id: &str) -> Option<usize> {
        let mut sessions = self.sessions.write().await;
        let sess = sessions.get_mut(id)?;
        let prior = sess.history.len();
        sess.history.clear();
        sess.last_followup = None;
        Some(prior)
    }

    /// Drops every session whose age at `now` exceeds the TTL.
    pub async fn evict_expired(&self, now: DateTime<Utc>) {
        let ttl = Duration::hours(SESSION_TTL_HOURS);
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, sess| now - sess.created_at <= ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, "expired sessions removed");
        }
    }

    /// Trims oldest-created sessions until at most [`MAX_SESSIONS`]
    /// remain. Stable sort: created_at ties keep insertion-sort order.
    pub async fn evict_over_capacity(&self) {
        let mut sessions = self.sessions.write().await;
        if sessions.len() <= MAX_SESSIONS {
            return;
        }
        let excess = sessions.len() - MAX_SESSIONS;
        let mut by_age: Vec<(String, DateTime<Utc>)> = sessions
            .iter()
            .map(|(id, sess)| (id.clone(), sess.created_at))
            .collect();
        by_age.sort_by_key(|(_, created_at)| *created_at);
        for (id, _) in by_age.into_iter().take(excess) {
            sessions.remove(&id);
        }
        info!(evicted = excess, "over-capacity sessions removed");
    }
}
