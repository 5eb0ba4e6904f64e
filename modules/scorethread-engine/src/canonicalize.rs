use tracing::debug;

use crate::patterns::{collapse_whitespace, PatternTable};
use crate::types::{CanonicalKey, CanonicalRecord, RawObservation};

/// Maps raw observations to canonical records, dropping non-match noise.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    patterns: PatternTable,
}

impl Canonicalizer {
    pub fn new(patterns: PatternTable) -> Self {
        Self { patterns }
    }

    /// Returns `None` for observations that are not a match of the configured
    /// team: empty titles, other teams, and denylisted content.
    pub fn canonicalize(&self, raw: &RawObservation) -> Option<CanonicalRecord> {
        let title = collapse_whitespace(&raw.display_title);
        if title.is_empty() {
            return None;
        }
        if !self.patterns.includes_team(&title) {
            return None;
        }

        let status = raw.status_text.trim();
        if let Some(rule) = self.patterns.denied(&title, status) {
            debug!(title = %title, rule, "Skipping non-match entry");
            return None;
        }

        let key = self.patterns.strip_suffix(&title);
        if key.is_empty() {
            return None;
        }

        Some(CanonicalRecord {
            key: CanonicalKey::new(key.clone()),
            title: key,
            status: status.to_string(),
            score: raw.score_text.trim().to_string(),
        })
    }

    pub fn canonicalize_all(&self, raw: &[RawObservation]) -> Vec<CanonicalRecord> {
        raw.iter().filter_map(|r| self.canonicalize(r)).collect()
    }
}
