//! Generic per-user session state store.
//!
//! The assessment and activity engines each hold at most one piece of live
//! state per user. Rather than reaching for ambient global maps, they are
//! handed an injected [`SessionStore`] so the concurrency discipline stays
//! explicit and the engines stay testable.

use std::collections::HashMap;
use std::sync::Mutex;

/// Keyed store holding at most one `T` per user.
pub trait SessionStore<T>: Send + Sync
where
    T: Clone + Send,
{
    /// Current state for a user, if any.
    fn get(&self, user_id: &str) -> Option<T>;

    /// Insert or replace the state for a user.
    fn upsert(&self, user_id: &str, value: T);

    /// Remove and return the state for a user.
    fn remove(&self, user_id: &str) -> Option<T>;
}

/// In-memory [`SessionStore`] backed by a mutex-guarded map.
pub struct MemorySessionStore<T> {
    entries: Mutex<HashMap<String, T>>,
}

impl<T> MemorySessionStore<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> Default for MemorySessionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SessionStore<T> for MemorySessionStore<T>
where
    T: Clone + Send,
{
    fn get(&self, user_id: &str) -> Option<T> {
        match self.entries.lock() {
            Ok(entries) => entries.get(user_id).cloned(),
            Err(e) => {
                tracing::error!("Session store lock poisoned: {}", e);
                None
            }
        }
    }

    fn upsert(&self, user_id: &str, value: T) {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(user_id.to_string(), value);
            }
            Err(e) => tracing::error!("Session store lock poisoned: {}", e),
        }
    }

    fn remove(&self, user_id: &str) -> Option<T> {
        match self.entries.lock() {
            Ok(mut entries) => entries.remove(user_id),
            Err(e) => {
                tracing::error!("Session store lock poisoned: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_empty() {
        let store: MemorySessionStore<u32> = MemorySessionStore::new();
        assert!(store.get("user-1").is_none());
    }

    #[test]
    fn test_upsert_then_get() {
        let store = MemorySessionStore::new();
        store.upsert("user-1", 7u32);
        assert_eq!(store.get("user-1"), Some(7));
    }

    #[test]
    fn test_upsert_replaces() {
        let store = MemorySessionStore::new();
        store.upsert("user-1", 7u32);
        store.upsert("user-1", 9u32);
        assert_eq!(store.get("user-1"), Some(9));
    }

    #[test]
    fn test_remove_returns_value() {
        let store = MemorySessionStore::new();
        store.upsert("user-1", "state".to_string());
        assert_eq!(store.remove("user-1"), Some("state".to_string()));
        assert!(store.get("user-1").is_none());
    }

    #[test]
    fn test_remove_missing_is_none() {
        let store: MemorySessionStore<u32> = MemorySessionStore::new();
        assert!(store.remove("user-1").is_none());
    }

    #[test]
    fn test_users_isolated() {
        let store = MemorySessionStore::new();
        store.upsert("user-1", 1u32);
        store.upsert("user-2", 2u32);
        store.remove("user-1");
        assert_eq!(store.get("user-2"), Some(2));
    }

    #[test]
    fn test_concurrent_upserts() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemorySessionStore::new());
        let mut handles = Vec::new();
        for i in 0..10u32 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                store.upsert(&format!("user-{}", i), i);
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        for i in 0..10u32 {
            assert_eq!(store.get(&format!("user-{}", i)), Some(i));
        }
    }
}
