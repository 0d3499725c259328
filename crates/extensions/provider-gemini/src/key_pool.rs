//! Round-robin API key pool.

use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Key pool errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyPoolError {
    #[error("No Gemini API keys configured. Please add API keys in settings.")]
    NoKeys,

    #[error("No active API keys available.")]
    NoActiveKeys,

    #[error("Unknown API key: {0}")]
    UnknownKey(String),
}

/// One API key and its usage statistics.
#[derive(Clone, Serialize)]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub key: String,
    pub active: bool,
    pub request_count: u64,
    pub last_used: Option<DateTime<Utc>>,
}

impl ApiKey {
    /// Key with only the last four characters visible.
    pub fn masked(&self) -> String {
        let visible: String = self
            .key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{}", visible)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("key", &self.masked())
            .field("active", &self.active)
            .field("request_count", &self.request_count)
            .field("last_used", &self.last_used)
            .finish()
    }
}

struct PoolState {
    keys: Vec<ApiKey>,
    cursor: usize,
}

/// Pool of API keys handed out round-robin over the active ones.
pub struct KeyPool {
    state: Mutex<PoolState>,
}

impl KeyPool {
    /// Create a pool from raw keys; blank entries are dropped.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = keys
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .enumerate()
            .map(|(index, key)| ApiKey {
                id: format!("key-{}", index),
                name: format!("API Key {}", index + 1),
                key,
                active: true,
                request_count: 0,
                last_used: None,
            })
            .collect();

        Self {
            state: Mutex::new(PoolState { keys, cursor: 0 }),
        }
    }

    /// Number of keys, active or not.
    pub fn len(&self) -> usize {
        self.state.lock().keys.len()
    }

    /// Check if the pool has no keys.
    pub fn is_empty(&self) -> bool {
        self.state.lock().keys.is_empty()
    }

    /// Next active key in round-robin order.
    pub fn acquire(&self) -> Result<ApiKey, KeyPoolError> {
        let mut state = self.state.lock();
        if state.keys.is_empty() {
            return Err(KeyPoolError::NoKeys);
        }

        let active: Vec<usize> = state
            .keys
            .iter()
            .enumerate()
            .filter(|(_, k)| k.active)
            .map(|(i, _)| i)
            .collect();
        if active.is_empty() {
            return Err(KeyPoolError::NoActiveKeys);
        }

        let index = active[state.cursor % active.len()];
        state.cursor = (state.cursor + 1) % active.len();

        let key = state.keys[index].clone();
        debug!("Acquired API key {} ({})", key.id, key.masked());
        Ok(key)
    }

    /// Count one request against `key_id`.
    pub fn record_usage(&self, key_id: &str) -> Result<(), KeyPoolError> {
        let mut state = self.state.lock();
        let key = state
            .keys
            .iter_mut()
            .find(|k| k.id == key_id)
            .ok_or_else(|| KeyPoolError::UnknownKey(key_id.to_string()))?;
        key.request_count += 1;
        key.last_used = Some(Utc::now());
        Ok(())
    }

    /// Enable or disable a key.
    pub fn set_active(&self, key_id: &str, active: bool) -> Result<(), KeyPoolError> {
        let mut state = self.state.lock();
        let key = state
            .keys
            .iter_mut()
            .find(|k| k.id == key_id)
            .ok_or_else(|| KeyPoolError::UnknownKey(key_id.to_string()))?;
        key.active = active;
        Ok(())
    }

    /// Copy of all keys with their statistics.
    pub fn snapshot(&self) -> Vec<ApiKey> {
        self.state.lock().keys.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assigns_ids_and_drops_blanks() {
        let pool = KeyPool::new([" alpha ", "", "beta"]);
        let keys = pool.snapshot();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].id, "key-0");
        assert_eq!(keys[0].key, "alpha");
        assert_eq!(keys[1].name, "API Key 2");
        assert!(keys.iter().all(|k| k.active && k.request_count == 0));
    }

    #[test]
    fn test_empty_pool() {
        let pool = KeyPool::new(Vec::<String>::new());
        assert!(pool.is_empty());
        assert_eq!(pool.acquire().unwrap_err(), KeyPoolError::NoKeys);
    }

    #[test]
    fn test_round_robin() {
        let pool = KeyPool::new(["a", "b", "c"]);
        let order: Vec<String> = (0..4).map(|_| pool.acquire().unwrap().key).collect();
        assert_eq!(order, vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn test_round_robin_skips_inactive() {
        let pool = KeyPool::new(["a", "b", "c"]);
        pool.set_active("key-1", false).unwrap();
        let order: Vec<String> = (0..4).map(|_| pool.acquire().unwrap().key).collect();
        assert_eq!(order, vec!["a", "c", "a", "c"]);
    }

    #[test]
    fn test_all_inactive() {
        let pool = KeyPool::new(["a"]);
        pool.set_active("key-0", false).unwrap();
        assert_eq!(pool.acquire().unwrap_err(), KeyPoolError::NoActiveKeys);
    }

    #[test]
    fn test_record_usage() {
        let pool = KeyPool::new(["a", "b"]);
        pool.record_usage("key-1").unwrap();
        pool.record_usage("key-1").unwrap();

        let keys = pool.snapshot();
        assert_eq!(keys[0].request_count, 0);
        assert_eq!(keys[1].request_count, 2);
        assert!(keys[1].last_used.is_some());
    }

    #[test]
    fn test_unknown_key() {
        let pool = KeyPool::new(["a"]);
        assert_eq!(
            pool.record_usage("key-9").unwrap_err(),
            KeyPoolError::UnknownKey("key-9".to_string())
        );
        assert!(pool.set_active("nope", true).is_err());
    }

    #[test]
    fn test_masked_and_debug_hide_key() {
        let pool = KeyPool::new(["AIzaSyVerySecret1234"]);
        let key = pool.acquire().unwrap();
        assert_eq!(key.masked(), "****1234");
        let debug = format!("{:?}", key);
        assert!(!debug.contains("VerySecret"));
    }

    #[test]
    fn test_serialize_omits_secret() {
        let pool = KeyPool::new(["secret-value"]);
        let json = serde_json::to_string(&pool.snapshot()).unwrap();
        assert!(!json.contains("secret-value"));
        assert!(json.contains("key-0"));
    }
}
