//! Within-cycle deduplication of canonical records.
//!
//! The scores page renders one match in several places (summary strip,
//! detail card) with varying completeness. One record per key survives.

use std::collections::HashMap;

use crate::types::{CanonicalKey, CanonicalRecord};

/// One record per canonical key, iterated in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct DedupedRecords {
    records: Vec<CanonicalRecord>,
    index: HashMap<CanonicalKey, usize>,
}

impl DedupedRecords {
    pub fn get(&self, key: &CanonicalKey) -> Option<&CanonicalRecord> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalRecord> {
        self.records.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &CanonicalKey> {
        self.records.iter().map(|r| &r.key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Keep the first record for each key, unless a later one has both a score
/// and a status, in which case the later one takes the slot.
pub fn dedupe<I>(records: I) -> DedupedRecords
where
    I: IntoIterator<Item = CanonicalRecord>,
{
    let mut out = DedupedRecords::default();
    for record in records {
        match out.index.get(&record.key) {
            Some(&i) => {
                if record.is_complete() {
                    out.records[i] = record;
                }
            }
            None => {
                out.index.insert(record.key.clone(), out.records.len());
                out.records.push(record);
            }
        }
    }
    out
}
