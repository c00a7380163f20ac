//! One-request flash storage on top of a session.
//!
//! Flash values survive exactly one round trip: a handler opens the store
//! in write mode to leave messages for the next request, and the next
//! request opens it in read mode, which consumes them.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::storage::session::Session;

const PREFIX: &str = "_flash.";

/// Open mode for a flash store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashMode {
    Read,
    Write,
}

/// Misuse of a flash store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("flash store `{name}` is open for reading, not writing")]
    ReadOnly { name: String },

    #[error("flash store `{name}` is open for writing, not reading")]
    WriteOnly { name: String },
}

/// A named flash store bound to a session for the current request.
#[derive(Debug)]
pub struct Flash<'a> {
    session: &'a mut Session,
    name: String,
    key: String,
    mode: FlashMode,
    values: Map<String, Value>,
}

impl<'a> Flash<'a> {
    /// Open for reading: loads the stored values and purges them from the
    /// session, so they are gone on the next request either way.
    pub fn read(session: &'a mut Session, name: &str) -> Self {
        let name = name.to_lowercase();
        let key = format!("{PREFIX}{name}");
        let values = session.get::<Map<String, Value>>(&key).unwrap_or_default();
        session.remove(&key);
        Self {
            session,
            name,
            key,
            mode: FlashMode::Read,
            values,
        }
    }

    /// Open for writing: leftovers from a previous request are discarded
    /// first.
    pub fn write(session: &'a mut Session, name: &str) -> Self {
        let name = name.to_lowercase();
        let key = format!("{PREFIX}{name}");
        session.remove(&key);
        Self {
            session,
            name,
            key,
            mode: FlashMode::Write,
            values: Map::new(),
        }
    }

    /// Store a value for the next request.
    pub fn set(&mut self, label: &str, value: impl Into<Value>) -> Result<(), StorageError> {
        if self.mode != FlashMode::Write {
            return Err(StorageError::ReadOnly {
                name: self.name.clone(),
            });
        }
        self.values.insert(label.to_string(), value.into());
        self.session.set(&self.key, Value::Object(self.values.clone()));
        Ok(())
    }

    /// Read a value left by the previous request.
    pub fn get(&self, label: &str) -> Result<Option<&Value>, StorageError> {
        if self.mode != FlashMode::Read {
            return Err(StorageError::WriteOnly {
                name: self.name.clone(),
            });
        }
        Ok(self.values.get(label))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::storage::session::SessionStore;

    fn session() -> Session {
        SessionStore::new(SessionConfig::default()).open(None, "test")
    }

    #[test]
    fn write_then_read_consumes_values() {
        let mut session = session();

        let mut flash = Flash::write(&mut session, "alerts");
        flash.set("notice", "saved").unwrap();
        assert_eq!(flash.len(), 1);
        drop(flash);

        let flash = Flash::read(&mut session, "alerts");
        assert_eq!(flash.get("notice").unwrap(), Some(&Value::from("saved")));
        drop(flash);

        // Consumed: a second read sees nothing.
        let flash = Flash::read(&mut session, "alerts");
        assert!(flash.is_empty());
    }

    #[test]
    fn mode_misuse_is_an_error() {
        let mut session = session();

        let mut flash = Flash::write(&mut session, "alerts");
        assert!(matches!(flash.get("x"), Err(StorageError::WriteOnly { .. })));
        flash.set("x", 1).unwrap();
        drop(flash);

        let mut flash = Flash::read(&mut session, "alerts");
        assert!(matches!(flash.set("y", 2), Err(StorageError::ReadOnly { .. })));
    }

    #[test]
    fn write_mode_purges_leftovers() {
        let mut session = session();

        let mut flash = Flash::write(&mut session, "alerts");
        flash.set("stale", true).unwrap();
        drop(flash);

        let flash = Flash::write(&mut session, "alerts");
        assert!(flash.is_empty());
        drop(flash);

        let flash = Flash::read(&mut session, "alerts");
        assert!(flash.is_empty());
    }

    #[test]
    fn names_are_case_insensitive() {
        let mut session = session();

        let mut flash = Flash::write(&mut session, "Alerts");
        flash.set("k", "v").unwrap();
        drop(flash);

        let flash = Flash::read(&mut session, "ALERTS");
        assert_eq!(flash.len(), 1);
    }
}
