#![forbid(unsafe_code)]

//! Session-scoped key/value storage.
//!
//! The boot flag is the only state folio persists, and it only lives for the
//! browsing session. [`SessionStore`] abstracts the browser's session storage
//! so the boot sequencer can run against an in-memory map in tests and
//! against `sessionStorage` in the browser.
//!
//! Stores may be unavailable (storage disabled, quota, sandboxed frames).
//! Callers treat every [`StoreError`] as "flag absent" and keep going.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Storage failure reported by a [`SessionStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The host has no session storage (disabled, unsupported, sandboxed).
    Unavailable,
    /// The host rejected the operation.
    Rejected(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "session storage unavailable"),
            Self::Rejected(msg) => write!(f, "session storage rejected operation: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Session-scoped string storage.
///
/// Reads must be free of side effects.
pub trait SessionStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn clear(&mut self, key: &str) -> StoreResult<()>;
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn clear(&mut self, key: &str) -> StoreResult<()> {
        (**self).clear(key)
    }
}

/// Shared handle: several mounts reading and writing one session.
impl<S: SessionStore + ?Sized> SessionStore for Rc<RefCell<S>> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.borrow_mut().set(key, value)
    }

    fn clear(&mut self, key: &str) -> StoreResult<()> {
        self.borrow_mut().clear(key)
    }
}

/// In-memory store; one instance models one browsing session.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
    writes: u64,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls, for asserting write-once behaviour.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store that fails every operation, as when storage is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSessionStore;

impl SessionStore for UnavailableSessionStore {
    fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Unavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable)
    }

    fn clear(&mut self, _key: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemorySessionStore::new();
        assert_eq!(store.get("k"), Ok(None));
        store.set("k", "true").unwrap();
        assert_eq!(store.get("k"), Ok(Some("true".into())));
        store.clear("k").unwrap();
        assert_eq!(store.get("k"), Ok(None));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn reads_do_not_count_as_writes() {
        let mut store = MemorySessionStore::new();
        store.set("k", "v").unwrap();
        for _ in 0..5 {
            let _ = store.get("k");
        }
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unavailable_store_fails_everything() {
        let mut store = UnavailableSessionStore;
        assert_eq!(store.get("k"), Err(StoreError::Unavailable));
        assert_eq!(store.set("k", "v"), Err(StoreError::Unavailable));
        assert_eq!(store.clear("k"), Err(StoreError::Unavailable));
    }

    #[test]
    fn boxed_store_delegates() {
        let mut store: Box<dyn SessionStore> = Box::new(MemorySessionStore::new());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k"), Ok(Some("v".into())));
    }

    #[test]
    fn shared_store_is_one_session() {
        let session = Rc::new(RefCell::new(MemorySessionStore::new()));
        let mut first = Rc::clone(&session);
        let second = Rc::clone(&session);
        first.set("k", "v").unwrap();
        assert_eq!(second.get("k"), Ok(Some("v".into())));
        assert_eq!(session.borrow().write_count(), 1);
    }

    #[test]
    fn error_display() {
        assert_eq!(StoreError::Unavailable.to_string(), "session storage unavailable");
        assert!(
            StoreError::Rejected("quota".into())
                .to_string()
                .contains("quota")
        );
    }
}
