//! Rotating API key pool
//!
//! Holds an ordered, deduplicated set of opaque key strings and a cursor that
//! advances on demand. The cursor is a plain atomic counter: concurrent calls
//! may observe a slightly stale position, which is harmless because rotation
//! is advisory load-spreading, not a lock. Worst case is one extra failed
//! attempt against an exhausted key.

use super::source::KeySource;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use thiserror::Error;

/// Errors produced by the key pool
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// No usable key in the configuration. Fatal to any remote call and
    /// never retried: repeating an unauthenticated request cannot succeed.
    #[error("no API key configured")]
    Empty,
}

/// A pool of API keys with round-robin rotation
#[derive(Debug)]
pub struct KeyPool {
    keys: RwLock<Vec<String>>,
    cursor: AtomicUsize,
    source: KeySource,
}

impl KeyPool {
    /// Create a pool backed by the given source and load it once.
    pub fn new(source: KeySource) -> Self {
        let pool = Self {
            keys: RwLock::new(Vec::new()),
            cursor: AtomicUsize::new(0),
            source,
        };
        pool.refresh();
        pool
    }

    /// Create a pool from the process environment (`GEMINI_API_KEY` plus
    /// numbered variants).
    pub fn from_env() -> Self {
        Self::new(KeySource::Env)
    }

    /// Create a pool from a fixed key list. Mainly for tests.
    pub fn fixed<S: Into<String>>(keys: Vec<S>) -> Self {
        Self::new(KeySource::Fixed(keys.into_iter().map(Into::into).collect()))
    }

    /// Re-read the source, replace the key list, and reset the cursor.
    pub fn refresh(&self) {
        let loaded = self.source.load();
        if loaded.is_empty() {
            tracing::error!("no valid API keys found in configuration");
        } else {
            tracing::info!(key_count = loaded.len(), "key pool loaded");
        }
        *self.write_keys() = loaded;
        self.cursor.store(0, Ordering::SeqCst);
    }

    /// Return the key at the current cursor position.
    ///
    /// An empty pool triggers exactly one lazy refresh, covering keys that
    /// appear in the environment after process start. A pool that is still
    /// empty is a hard error, never an empty string handed to a client.
    pub fn active_key(&self) -> Result<String, PoolError> {
        if let Some(key) = self.key_at_cursor() {
            return Ok(key);
        }
        self.refresh();
        self.key_at_cursor().ok_or(PoolError::Empty)
    }

    /// Advance the cursor by one position, modulo pool size.
    ///
    /// A no-op (not an error) for pools of size zero or one; rotation only
    /// has observable effect with at least two keys.
    pub fn rotate(&self) {
        let len = self.len();
        if len > 1 {
            let next = (self.cursor.fetch_add(1, Ordering::SeqCst) + 1) % len;
            tracing::warn!(key_index = next + 1, "rotating to next API key");
        }
    }

    /// Number of keys currently in the pool.
    pub fn len(&self) -> usize {
        self.read_keys().len()
    }

    /// Whether the pool holds no keys.
    pub fn is_empty(&self) -> bool {
        self.read_keys().is_empty()
    }

    /// Current cursor position (unbounded; callers apply the modulo).
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    fn key_at_cursor(&self) -> Option<String> {
        let keys = self.read_keys();
        if keys.is_empty() {
            return None;
        }
        let idx = self.cursor.load(Ordering::SeqCst) % keys.len();
        Some(keys[idx].clone())
    }

    fn read_keys(&self) -> std::sync::RwLockReadGuard<'_, Vec<String>> {
        self.keys.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_keys(&self) -> std::sync::RwLockWriteGuard<'_, Vec<String>> {
        self.keys.write().unwrap_or_else(|e| e.into_inner())
    }
}
