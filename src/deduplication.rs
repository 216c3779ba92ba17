// 🔍 Deduplication Engine - Collapse owners that canonicalize to the same key
// Applied per bucket; first occurrence wins, later ones are dropped (not merged)

use crate::company::CompanyNameCanonicalizer;
use crate::config::{CompanyCasing, KeywordTable};
use crate::records::{OwnerRecord, PersonName};
use std::collections::HashMap;

// ============================================================================
// DEDUPLICATION ENGINE
// ============================================================================

pub struct DeduplicationEngine {
    canonicalizer: CompanyNameCanonicalizer,

    /// Fill a kept record's missing optional fields from its duplicates
    pub backfill: bool,
}

impl DeduplicationEngine {
    pub fn new(keywords: &KeywordTable, backfill: bool) -> Self {
        DeduplicationEngine {
            // Casing is irrelevant for keys
            canonicalizer: CompanyNameCanonicalizer::new(keywords, CompanyCasing::Preserve),
            backfill,
        }
    }

    /// Canonical key: people by `first middle last`, companies by stripped name
    pub fn key(&self, record: &OwnerRecord) -> String {
        match record {
            OwnerRecord::Person(p) => format!("person:{}", person_key(p)),
            OwnerRecord::Company(c) => {
                format!("company:{}", self.canonicalizer.canonical_key(&c.name))
            }
        }
    }

    /// Remove duplicates, keeping the first occurrence of each key in order
    pub fn dedup(&self, records: Vec<OwnerRecord>) -> Vec<OwnerRecord> {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut kept: Vec<OwnerRecord> = Vec::with_capacity(records.len());

        for record in records {
            let key = self.key(&record);
            match positions.get(&key) {
                Some(&pos) => {
                    tracing::debug!(
                        key = %key,
                        kept = %kept[pos].display_name(),
                        dropped = %record.display_name(),
                        "dropping duplicate owner"
                    );
                    if self.backfill {
                        backfill(&mut kept[pos], &record);
                    }
                }
                None => {
                    positions.insert(key, kept.len());
                    kept.push(record);
                }
            }
        }

        kept
    }
}

impl Default for DeduplicationEngine {
    fn default() -> Self {
        Self::new(&KeywordTable::default(), true)
    }
}

/// Lowercased `first middle last`, punctuation stripped, whitespace collapsed
fn person_key(p: &PersonName) -> String {
    let mut parts = vec![p.first_name.as_str()];
    if let Some(middle) = &p.middle_name {
        parts.push(middle);
    }
    parts.push(&p.last_name);

    parts
        .join(" ")
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Copy absent optional fields from a duplicate; never overwrite populated ones
fn backfill(kept: &mut OwnerRecord, duplicate: &OwnerRecord) {
    if let (OwnerRecord::Person(k), OwnerRecord::Person(d)) = (kept, duplicate) {
        if k.middle_name.is_none() {
            k.middle_name = d.middle_name.clone();
        }
        if k.suffix_name.is_none() {
            k.suffix_name = d.suffix_name.clone();
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
