//! Rate Limiting Infrastructure
//!
//! Attempt tracking for sensitive operations (login, signup,
//! activation). Entries are keyed by operation, identifier and client
//! address so one abusive client cannot lock out everyone else.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Rate limit configuration
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Failed attempts allowed before lockout
    pub max_attempts: u32,
    /// Lockout window duration
    pub lockout: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout: Duration::from_secs(60 * 60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_attempts: u32, lockout_secs: u64) -> Self {
        Self {
            max_attempts,
            lockout: Duration::from_secs(lockout_secs),
        }
    }
}

/// Rate limit check result
#[derive(Debug, Clone, Copy)]
pub struct RateLimitStatus {
    pub allowed: bool,
    pub attempts: u32,
    /// Remaining lockout time; zero unless `allowed` is false
    pub wait: Duration,
}

impl RateLimitStatus {
    fn clear() -> Self {
        Self {
            allowed: true,
            attempts: 0,
            wait: Duration::ZERO,
        }
    }

    /// Wait time rounded up to whole minutes, for user-facing messages
    pub fn wait_minutes(&self) -> u64 {
        wait_minutes(&self.wait)
    }
}

/// Round a wait duration up to whole minutes
pub fn wait_minutes(wait: &Duration) -> u64 {
    wait.as_secs().div_ceil(60)
}

/// Key identifying one attempt counter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttemptKey {
    pub operation: &'static str,
    pub identifier: String,
    pub client_addr: String,
}

impl AttemptKey {
    pub fn new(
        operation: &'static str,
        identifier: impl Into<String>,
        client_addr: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            identifier: identifier.into(),
            client_addr: client_addr.into(),
        }
    }
}

/// Trait for attempt-tracking backends
///
/// All methods are infallible: tracking failures must never take the
/// auth path down with them.
#[trait_variant::make(AttemptStore: Send)]
pub trait LocalAttemptStore {
    /// Check whether the key may attempt the operation
    async fn check(&self, key: &AttemptKey, config: &RateLimitConfig) -> RateLimitStatus;

    /// Record one failed attempt, refreshing the window
    async fn record_failure(&self, key: &AttemptKey);

    /// Reset the counter (called on operation success)
    async fn clear(&self, key: &AttemptKey);
}

#[derive(Debug, Clone, Copy)]
struct AttemptEntry {
    count: u32,
    last_attempt: Instant,
}

/// In-memory attempt store
///
/// A single coarse lock guards the map, so two concurrent failures on
/// the same key cannot both observe the pre-increment count. State is
/// per-process: it does not survive restarts and is not shared across
/// instances, and entries for keys that never succeed are only dropped
/// once their window expires and `check` sees them again.
#[derive(Debug, Default)]
pub struct InMemoryAttemptStore {
    entries: Mutex<HashMap<AttemptKey, AttemptEntry>>,
}

impl InMemoryAttemptStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn backdate(&self, key: &AttemptKey, by: Duration) {
        let mut entries = self.entries.lock().expect("attempt store lock poisoned");
        if let Some(entry) = entries.get_mut(key) {
            entry.last_attempt -= by;
        }
    }
}

impl AttemptStore for InMemoryAttemptStore {
    async fn check(&self, key: &AttemptKey, config: &RateLimitConfig) -> RateLimitStatus {
        let mut entries = self.entries.lock().expect("attempt store lock poisoned");

        let Some(entry) = entries.get(key).copied() else {
            return RateLimitStatus::clear();
        };

        let elapsed = entry.last_attempt.elapsed();

        // Lockout window has passed; drop the stale entry
        if elapsed > config.lockout {
            entries.remove(key);
            return RateLimitStatus::clear();
        }

        if entry.count >= config.max_attempts {
            return RateLimitStatus {
                allowed: false,
                attempts: entry.count,
                wait: config.lockout - elapsed,
            };
        }

        RateLimitStatus {
            allowed: true,
            attempts: entry.count,
            wait: Duration::ZERO,
        }
    }

    async fn record_failure(&self, key: &AttemptKey) {
        let mut entries = self.entries.lock().expect("attempt store lock poisoned");

        entries
            .entry(key.clone())
            .and_modify(|entry| {
                entry.count += 1;
                entry.last_attempt = Instant::now();
            })
            .or_insert(AttemptEntry {
                count: 1,
                last_attempt: Instant::now(),
            });
    }

    async fn clear(&self, key: &AttemptKey) {
        let mut entries = self.entries.lock().expect("attempt store lock poisoned");
        entries.remove(key);
    }
}
