//! In-memory session store and per-request session handle.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::SessionConfig;

#[derive(Debug, Clone)]
struct SessionRecord {
    values: HashMap<String, Value>,
    fingerprint: [u8; 32],
    expires_at: Option<Instant>,
}

/// Owns every live session, keyed by id.
///
/// Concurrent by construction: `open` and `persist` take `&self`, so the
/// store can sit behind an `Arc` next to the router.
#[derive(Debug)]
pub struct SessionStore {
    config: SessionConfig,
    sessions: DashMap<Uuid, SessionRecord>,
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            sessions: DashMap::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Open the session for a request.
    ///
    /// `id` is the value of the session cookie, if any; `identity` is the
    /// client identity material (address + user agent) the session is
    /// bound to. A missing, expired or foreign session yields a fresh one
    /// with a new id.
    pub fn open(&self, id: Option<Uuid>, identity: &str) -> Session {
        self.purge_expired();

        let fingerprint = fingerprint_of(identity);
        if let Some(id) = id {
            if let Some(record) = self.sessions.get(&id) {
                if record.fingerprint == fingerprint {
                    return Session {
                        id,
                        previous_ids: Vec::new(),
                        fingerprint,
                        values: record.values.clone(),
                        fresh: false,
                    };
                }
                tracing::debug!(session = %id, "session fingerprint mismatch, starting fresh");
            }
        }

        Session {
            id: Uuid::new_v4(),
            previous_ids: Vec::new(),
            fingerprint,
            values: HashMap::new(),
            fresh: true,
        }
    }

    /// Write a session back to the store, retiring ids it abandoned via
    /// regeneration.
    pub fn persist(&self, session: &Session) {
        for old in &session.previous_ids {
            self.sessions.remove(old);
        }

        let expires_at = (self.config.lifetime_secs > 0)
            .then(|| Instant::now() + Duration::from_secs(self.config.lifetime_secs));

        self.sessions.insert(
            session.id,
            SessionRecord {
                values: session.values.clone(),
                fingerprint: session.fingerprint,
                expires_at,
            },
        );
    }

    pub fn destroy(&self, id: &Uuid) {
        self.sessions.remove(id);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn purge_expired(&self) {
        let now = Instant::now();
        self.sessions
            .retain(|_, record| record.expires_at.map(|at| at > now).unwrap_or(true));
    }
}

fn fingerprint_of(identity: &str) -> [u8; 32] {
    Sha256::digest(identity.as_bytes()).into()
}

/// A request's working copy of its session.
///
/// Values live here during dispatch and are written back through
/// [`SessionStore::persist`] when the request completes.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    previous_ids: Vec<Uuid>,
    fingerprint: [u8; 32],
    values: HashMap<String, Value>,
    fresh: bool,
}

impl Session {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// True when this session was created by the current request.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Swap the session id, keeping the values. The abandoned id is
    /// retired when the session is persisted.
    pub fn regenerate_id(&mut self) {
        self.previous_ids.push(self.id);
        self.id = Uuid::new_v4();
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Typed read. A missing key or a type mismatch both read as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
