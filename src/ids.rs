//! Identifier minting.
//!
//! Every new category or transfer id comes from an [`IdGenerator`] so that
//! callers (and tests) decide how ids are produced.

use std::cell::Cell;

pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs, the production default.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic ids: `{prefix}-1`, `{prefix}-2`, ...
///
/// Plug it into [`Database::with_id_generator`](crate::Database::with_id_generator)
/// when ids must be reproducible, e.g. in tests or when seeding a store from a
/// legacy document whose output is compared against a fixture. Each generator
/// counts on its own; two generators with the same prefix hand out the same
/// ids, so never mix one with rows minted elsewhere under that prefix.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: Cell::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("{}-{n}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_ids_are_unique() {
        let ids = UuidGenerator;
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new("cat");
        assert_eq!(ids.next_id(), "cat-1");
        assert_eq!(ids.next_id(), "cat-2");
        assert_eq!(ids.next_id(), "cat-3");
    }

    #[test]
    fn test_sequential_ids_count_per_generator() {
        let a = SequentialIds::new("x");
        let b = SequentialIds::new("x");
        assert_eq!(a.next_id(), "x-1");
        assert_eq!(a.next_id(), "x-2");
        assert_eq!(b.next_id(), "x-1");
    }

    #[test]
    fn test_sequential_ids_drive_database_minting() {
        let db = crate::Database::open_in_memory()
            .unwrap()
            .with_id_generator(SequentialIds::new("seed"));
        assert_eq!(db.ids().next_id(), "seed-1");
        assert_eq!(db.ids().next_id(), "seed-2");
    }
}
