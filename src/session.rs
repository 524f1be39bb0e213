//! Key-value session storage for the host shell.
//!
//! The timeline itself never touches storage; only [`crate::scene::Scene`]
//! reads preferences and records milestones through an injected store.

use std::collections::HashMap;

/// Well-known keys.
pub mod keys {
    /// `"true"` when the visitor has muted cue audio.
    pub const AUDIO_MUTED: &str = "audio.muted";
    /// `"true"` once the final waypoint has been reached.
    pub const JOURNEY_COMPLETED: &str = "journey.completed";
}

/// String key-value storage scoped to a visitor session.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str);

    fn remove(&mut self, key: &str);

    fn clear(&mut self);

    /// Reads `key` as a boolean flag; anything but `"true"` is `false`.
    fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v == "true")
    }
}

impl<S: SessionStore + ?Sized> SessionStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value);
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

/// In-memory [`SessionStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove_clear() {
        let mut store = MemorySessionStore::new();
        store.set("a", "1");
        store.set(keys::AUDIO_MUTED, "true");
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert!(store.flag(keys::AUDIO_MUTED));
        store.remove("a");
        assert_eq!(store.get("a"), None);
        store.clear();
        assert!(store.is_empty());
        assert!(!store.flag(keys::AUDIO_MUTED));
    }

    fn complete(mut store: impl SessionStore) {
        store.set(keys::JOURNEY_COMPLETED, "true");
    }

    #[test]
    fn borrowed_store_writes_through() {
        let mut store = MemorySessionStore::new();
        complete(&mut store);
        assert!(store.flag(keys::JOURNEY_COMPLETED));
        assert_eq!(store.len(), 1);
    }
}
