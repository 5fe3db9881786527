use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Millisecond-timestamp ids that never repeat within a process.
///
/// Two calls in the same millisecond get consecutive values instead of the
/// same timestamp.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> i64 {
        self.next_at(Utc::now().timestamp_millis())
    }

    /// Make sure later ids are greater than `id`, e.g. the largest id already
    /// stored in a collection.
    pub fn observe(&self, id: Option<i64>) {
        if let Some(id) = id {
            self.last.fetch_max(id, Ordering::AcqRel);
        }
    }

    fn next_at(&self, now_ms: i64) -> i64 {
        let mut prev = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now_ms.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}
