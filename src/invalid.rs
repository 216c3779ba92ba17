// 🗑️ Invalid Collector - Every rejected string, with the reason it was rejected
// Deduplicated by (normalized text, reason); first-seen order is kept

use crate::records::{InvalidEntry, ReasonCode};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct InvalidCollector {
    entries: Vec<InvalidEntry>,
    seen: HashSet<(String, ReasonCode)>,
}

impl InvalidCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rejection. `normalized` is the TextNormalizer output for `raw`;
    /// the entry keeps the raw text. Returns false when an entry with the same
    /// normalized text and reason already exists.
    pub fn record(&mut self, raw: &str, normalized: &str, reason: ReasonCode) -> bool {
        let key = (dedup_key(normalized), reason);
        if !self.seen.insert(key) {
            tracing::debug!(raw, reason = %reason, "repeat rejection skipped");
            return false;
        }

        tracing::debug!(raw, reason = %reason, "rejected owner candidate");
        self.entries.push(InvalidEntry::new(raw.trim(), reason));
        true
    }

    pub fn entries(&self) -> &[InvalidEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<InvalidEntry> {
        self.entries
    }
}

/// Case and spacing never distinguish two rejections
fn dedup_key(normalized: &str) -> String {
    normalized
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::TextNormalizer;

    fn record(collector: &mut InvalidCollector, raw: &str, reason: ReasonCode) -> bool {
        let normalized = TextNormalizer::default().normalize(raw);
        collector.record(raw, &normalized, reason)
    }

    #[test]
    fn test_dedup_by_normalized_text_and_reason() {
        let mut collector = InvalidCollector::new();

        assert!(record(&mut collector, "123 MAIN ST", ReasonCode::AddressOrNoise));
        assert!(!record(&mut collector, "  123  main st ", ReasonCode::AddressOrNoise));
        assert!(record(&mut collector, "123 MAIN ST", ReasonCode::Unclassified));

        assert_eq!(collector.len(), 2);
        assert_eq!(collector.entries()[0].raw, "123 MAIN ST");
    }

    #[test]
    fn test_noise_tokens_do_not_split_entries() {
        let mut collector = InvalidCollector::new();

        assert!(record(&mut collector, "*123 MAIN ST", ReasonCode::AddressOrNoise));
        assert!(!record(&mut collector, "123 MAIN ST", ReasonCode::AddressOrNoise));
        assert!(!record(&mut collector, "123 MAIN ST ET AL", ReasonCode::AddressOrNoise));

        assert_eq!(collector.len(), 1);
        // First raw spelling is what gets reported
        assert_eq!(collector.entries()[0].raw, "*123 MAIN ST");
    }

    #[test]
    fn test_first_seen_order() {
        let mut collector = InvalidCollector::new();
        record(&mut collector, "UNKNOWN SELLER", ReasonCode::NonOwnerPlaceholder);
        record(&mut collector, "", ReasonCode::Empty);
        record(&mut collector, "UNKNOWN SELLER", ReasonCode::NonOwnerPlaceholder);

        let reasons: Vec<ReasonCode> = collector.entries().iter().map(|e| e.reason).collect();
        assert_eq!(reasons, vec![ReasonCode::NonOwnerPlaceholder, ReasonCode::Empty]);
        assert!(!collector.is_empty());
    }
}
