// ⏰ Timeline Assembler - Owners grouped by the date their ownership began
//
// Bucket order is fixed:
// 1. ISO dates, ascending (ISO-8601 sorts correctly as strings)
// 2. unknown_date_1, unknown_date_2, ... in discovery order
// 3. current (omitted when empty)
//
// Deduplication runs inside each bucket, never across buckets.

use crate::deduplication::DeduplicationEngine;
use crate::records::{OwnerRecord, SourceContext};
use chrono::{Datelike, NaiveDate};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

pub const CURRENT_BUCKET: &str = "current";
pub const UNKNOWN_BUCKET_PREFIX: &str = "unknown_date_";

// ============================================================================
// DATE PARSING
// ============================================================================

/// Parse a sales-row date (M/D/YYYY, MM-DD-YYYY, YYYY-MM-DD, or an ISO date-time).
/// Years outside 1000..=9999 are rejected so "1/5/20" is not read as year 20.
pub fn parse_sale_date(date_str: &str) -> Option<NaiveDate> {
    // Date-times ("2010-04-01T00:00:00", "4/1/2010 12:00"): keep the date part
    let candidate = date_str
        .trim()
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    ["%m/%d/%Y", "%Y-%m-%d", "%m-%d-%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(candidate, fmt).ok())
        .filter(|date| (1000..=9999).contains(&date.year()))
}

// ============================================================================
// ASSEMBLY CONTEXT
// ============================================================================

/// Caller-owned numbering for `unknown_date_N` buckets. One context per
/// property run keeps numbering repeatable without any global counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyContext {
    allocated: usize,
}

impl AssemblyContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next bucket key: `unknown_date_1`, `unknown_date_2`, ...
    pub fn allocate_unknown(&mut self) -> String {
        self.allocated += 1;
        format!("{}{}", UNKNOWN_BUCKET_PREFIX, self.allocated)
    }

    /// How many unknown buckets have been handed out
    pub fn allocated(&self) -> usize {
        self.allocated
    }
}

// ============================================================================
// TIMELINE
// ============================================================================

/// Records that were discovered together and share one context
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedBatch {
    pub context: SourceContext,
    pub records: Vec<OwnerRecord>,
}

/// Ordered bucket key → owners. Serializes as a JSON object in bucket order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnershipTimeline {
    buckets: Vec<(String, Vec<OwnerRecord>)>,
}

impl OwnershipTimeline {
    pub fn get(&self, key: &str) -> Option<&[OwnerRecord]> {
        self.buckets
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, records)| records.as_slice())
    }

    pub fn keys(&self) -> Vec<&str> {
        self.buckets.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn buckets(&self) -> &[(String, Vec<OwnerRecord>)] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn current(&self) -> Option<&[OwnerRecord]> {
        self.get(CURRENT_BUCKET)
    }

    /// Total records across all buckets
    pub fn record_count(&self) -> usize {
        self.buckets.iter().map(|(_, records)| records.len()).sum()
    }
}

impl Serialize for OwnershipTimeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (key, records) in &self.buckets {
            map.serialize_entry(key, records)?;
        }
        map.end()
    }
}

// ============================================================================
// ASSEMBLER
// ============================================================================

pub struct TimelineAssembler {
    dedup: DeduplicationEngine,
}

impl TimelineAssembler {
    pub fn new(dedup: DeduplicationEngine) -> Self {
        TimelineAssembler { dedup }
    }

    /// The key source used inside buckets
    pub fn deduplicator(&self) -> &DeduplicationEngine {
        &self.dedup
    }

    /// Group batches into buckets. Each undated batch with at least one record
    /// takes the next `unknown_date_N` key from `ctx`.
    pub fn assemble(
        &self,
        batches: Vec<ClassifiedBatch>,
        ctx: &mut AssemblyContext,
    ) -> OwnershipTimeline {
        let mut dated: BTreeMap<String, Vec<OwnerRecord>> = BTreeMap::new();
        let mut unknown: Vec<(String, Vec<OwnerRecord>)> = Vec::new();
        let mut current: Vec<OwnerRecord> = Vec::new();

        for batch in batches {
            if batch.records.is_empty() {
                continue;
            }

            match batch.context {
                SourceContext::Date(date) => {
                    let key = date.format("%Y-%m-%d").to_string();
                    dated.entry(key).or_default().extend(batch.records);
                }
                SourceContext::Current => current.extend(batch.records),
                SourceContext::Unknown => {
                    let key = ctx.allocate_unknown();
                    tracing::debug!(bucket = %key, records = batch.records.len(), "allocated undated bucket");
                    unknown.push((key, batch.records));
                }
            }
        }

        let mut buckets: Vec<(String, Vec<OwnerRecord>)> = dated.into_iter().collect();
        buckets.extend(unknown);
        if !current.is_empty() {
            buckets.push((CURRENT_BUCKET.to_string(), current));
        }

        let buckets = buckets
            .into_iter()
            .map(|(key, records)| (key, self.dedup.dedup(records)))
            .collect();

        OwnershipTimeline { buckets }
    }
}

impl Default for TimelineAssembler {
    fn default() -> Self {
        Self::new(DeduplicationEngine::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
