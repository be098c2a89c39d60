//! Reuse pool for field maps

use super::fields::Fields;
use parking_lot::Mutex;

/// Capacity of a freshly allocated map; most entries carry a handful of fields.
pub const DEFAULT_FIELD_CAPACITY: usize = 5;

/// Upper bound on idle maps kept around after a burst.
pub const DEFAULT_MAX_IDLE: usize = 1024;

/// Thread-safe free list of field maps.
///
/// Every map handed out by [`EntryPool::acquire`] is empty. Maps come back
/// through [`EntryPool::release`], which clears them before they become
/// available again, so fields never leak from one log call into the next.
#[derive(Debug)]
pub struct EntryPool {
    free: Mutex<Vec<Fields>>,
    max_idle: usize,
}

impl EntryPool {
    pub fn new() -> Self {
        Self::with_max_idle(DEFAULT_MAX_IDLE)
    }

    pub fn with_max_idle(max_idle: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    /// Take an empty map, reusing a released one when available.
    pub fn acquire(&self) -> Fields {
        self.free
            .lock()
            .pop()
            .unwrap_or_else(|| Fields::with_capacity(DEFAULT_FIELD_CAPACITY))
    }

    /// Clear `fields` and make its storage available to later calls.
    /// Maps that never allocated are not worth keeping.
    pub fn release(&self, mut fields: Fields) {
        if fields.capacity() == 0 {
            return;
        }
        fields.clear();
        let mut free = self.free.lock();
        if free.len() < self.max_idle {
            free.push(fields);
        }
    }

    /// Number of idle maps waiting to be reused.
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }
}

impl Default for EntryPool {
    fn default() -> Self {
        Self::new()
    }
}
