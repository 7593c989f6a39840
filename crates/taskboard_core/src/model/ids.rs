//! Identifier and clock utilities.
//!
//! # Responsibility
//! - Generate opaque ids and session tokens.
//! - Provide the time source used for `createdAt`/`updatedAt` bookkeeping.
//!
//! # Invariants
//! - Generated ids are unique for the lifetime of a document.
//! - Ids are not security tokens; they are only required to be unique.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Opaque id shared by every entity kind.
pub type EntityId = String;
pub type UserId = EntityId;
pub type ProjectId = EntityId;
pub type TaskId = EntityId;

/// Unix epoch milliseconds.
pub type EpochMs = i64;

/// Generates a new opaque entity id.
pub fn new_id() -> EntityId {
    Uuid::new_v4().simple().to_string()
}

/// Generates a new session token.
///
/// Tokens share the id generator: they are unique, but carry no signature
/// and never expire.
pub fn new_token() -> String {
    new_id()
}

/// Time source for store timestamps.
pub trait Clock {
    /// Returns the current time in epoch milliseconds.
    fn now_ms(&self) -> EpochMs;
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now_ms(&self) -> EpochMs {
        (**self).now_ms()
    }
}

/// Wall clock backed by `SystemTime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> EpochMs {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
            })
    }
}

/// Manually driven clock for deterministic ordering.
///
/// Each call to `now_ms` returns the current value and then advances it by
/// `step_ms`, so consecutive writes get strictly increasing timestamps.
#[derive(Debug)]
pub struct ManualClock {
    current: AtomicI64,
    step_ms: i64,
}

impl ManualClock {
    pub fn new(start_ms: EpochMs, step_ms: i64) -> Self {
        Self {
            current: AtomicI64::new(start_ms),
            step_ms,
        }
    }

    /// Moves the clock to an absolute value, including backwards.
    pub fn set(&self, value_ms: EpochMs) {
        self.current.store(value_ms, Ordering::SeqCst);
    }

    /// Returns the value the next `now_ms` call will produce.
    pub fn peek(&self) -> EpochMs {
        self.current.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> EpochMs {
        self.current.fetch_add(self.step_ms, Ordering::SeqCst)
    }
}

/// Returns a refreshed timestamp that never moves backwards.
pub fn touch(previous: EpochMs, now: EpochMs) -> EpochMs {
    previous.max(now)
}
