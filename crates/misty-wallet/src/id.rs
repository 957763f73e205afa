//! Transaction id generation with monotonic guarantees.
//!
//! Ids come from a counter seeded with the wall clock in milliseconds, so
//! they stay unique within the process even if the clock steps backwards
//! and stay roughly time-ordered across restarts.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use misty_core::TransactionId;

/// Trait for obtaining current time, enabling testability.
pub trait Clock: Send + Sync {
    /// Returns current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using real time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Generates process-unique transaction ids.
///
/// # Guarantees
/// - Every call returns a value strictly greater than the previous one
/// - Thread-safe for concurrent access (CAS loop, no lock)
pub struct TransactionIdGenerator {
    /// Last issued sequence value.
    counter: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl TransactionIdGenerator {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            counter: AtomicU64::new(0),
            clock,
        }
    }

    /// Next sequence value: `max(last + 1, now_ms)`.
    pub fn next_sequence(&self) -> u64 {
        let target = self.clock.now_ms();

        loop {
            let current = self.counter.load(Ordering::Acquire);
            let next_val = current.saturating_add(1).max(target);

            match self.counter.compare_exchange_weak(
                current,
                next_val,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return next_val,
                Err(_) => continue,
            }
        }
    }

    pub fn next_id(&self) -> TransactionId {
        TransactionId::from_sequence(self.next_sequence())
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

impl Default for TransactionIdGenerator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
