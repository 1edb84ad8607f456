//! SKU assignment.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

pub const SKU_PREFIX: &str = "SKU-";

/// Issues `SKU-<millis>` identifiers.
///
/// Values are strictly increasing within one process, so two products
/// created in the same millisecond still get distinct SKUs. Uniqueness
/// across processes relies on the database constraint.
#[derive(Debug, Default)]
pub struct SkuGenerator {
    last: AtomicI64,
}

impl SkuGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_sku(&self) -> String {
        format!("{}{}", SKU_PREFIX, self.next_millis(Utc::now().timestamp_millis()))
    }

    fn next_millis(&self, now: i64) -> i64 {
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}
