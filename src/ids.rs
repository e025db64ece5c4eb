//! Id generation behind an injectable seam.
//!
//! Rule, boost, action and schedule-entry ids are client-generated and must
//! be unique within their array. Production uses UUIDv4; tests inject a
//! sequential generator so regenerated ids are deterministic.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of client-generated ids.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// UUIDv4 ids — the production generator.
#[derive(Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic `gen-1`, `gen-2`, ... ids for tests.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl IdGenerator for SequentialIds {
    fn generate(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("gen-{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_ids_are_unique() {
        let ids = UuidIds;
        let a = ids.generate();
        let b = ids.generate();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIds::default();
        assert_eq!(ids.generate(), "gen-1");
        assert_eq!(ids.generate(), "gen-2");
    }
}
