// 📤 Output Contract - owners_by_date + invalid_owners, keyed by property
//
// Serialization is deterministic: bucket order comes from the timeline,
// properties are sorted by id, so identical input gives byte-identical JSON.

use crate::error::ContractError;
use crate::records::{InvalidEntry, OwnerRecord};
use crate::temporal::OwnershipTimeline;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

// ============================================================================
// PROPERTY OWNERSHIP
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyOwnership {
    pub owners_by_date: OwnershipTimeline,
    pub invalid_owners: Vec<InvalidEntry>,
}

impl PropertyOwnership {
    pub fn new(owners_by_date: OwnershipTimeline, invalid_owners: Vec<InvalidEntry>) -> Self {
        PropertyOwnership {
            owners_by_date,
            invalid_owners,
        }
    }

    pub fn summary(&self) -> TimelineSummary {
        let mut summary = TimelineSummary {
            buckets: self.owners_by_date.len(),
            ..TimelineSummary::default()
        };

        for (_, records) in self.owners_by_date.buckets() {
            for record in records {
                match record {
                    OwnerRecord::Person(_) => summary.persons += 1,
                    OwnerRecord::Company(_) => summary.companies += 1,
                }
            }
        }

        for entry in &self.invalid_owners {
            summary.invalid += 1;
            *summary
                .invalid_by_reason
                .entry(entry.reason.as_str().to_string())
                .or_insert(0) += 1;
        }

        summary
    }
}

/// Counts for log lines and the CLI footer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimelineSummary {
    pub buckets: usize,
    pub persons: usize,
    pub companies: usize,
    pub invalid: usize,
    pub invalid_by_reason: BTreeMap<String, usize>,
}

impl TimelineSummary {
    pub fn summary(&self) -> String {
        format!(
            "Buckets: {}, Persons: {}, Companies: {}, Invalid: {}",
            self.buckets, self.persons, self.companies, self.invalid
        )
    }

    /// Fold another property's counts into this one
    pub fn absorb(&mut self, other: &TimelineSummary) {
        self.buckets += other.buckets;
        self.persons += other.persons;
        self.companies += other.companies;
        self.invalid += other.invalid;
        for (reason, count) in &other.invalid_by_reason {
            *self.invalid_by_reason.entry(reason.clone()).or_insert(0) += count;
        }
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// `{"property_<id>": PropertyOwnership, ...}`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OwnershipReport {
    properties: BTreeMap<String, PropertyOwnership>,
}

impl OwnershipReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report holding a single property
    pub fn single(property_id: &str, ownership: PropertyOwnership) -> Result<Self, ContractError> {
        let mut report = Self::new();
        report.insert(property_id, ownership)?;
        Ok(report)
    }

    pub fn insert(
        &mut self,
        property_id: &str,
        ownership: PropertyOwnership,
    ) -> Result<(), ContractError> {
        let id = property_id.trim();
        if id.is_empty() {
            return Err(ContractError::EmptyPropertyId);
        }

        self.properties.insert(format!("property_{}", id), ownership);
        Ok(())
    }

    /// Look up by bare id (`"123"`, not `"property_123"`)
    pub fn get(&self, property_id: &str) -> Option<&PropertyOwnership> {
        self.properties.get(&format!("property_{}", property_id.trim()))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Combined counts across every property
    pub fn summary(&self) -> TimelineSummary {
        let mut total = TimelineSummary::default();
        for ownership in self.properties.values() {
            total.absorb(&ownership.summary());
        }
        total
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// SHA-256 of the compact JSON form; changes iff the output changes
    pub fn fingerprint(&self) -> serde_json::Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(self.to_json()?);
        Ok(format!("{:x}", hasher.finalize()))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CompanyName, PersonName, ReasonCode, SourceContext};
    use crate::temporal::{AssemblyContext, ClassifiedBatch, TimelineAssembler};

    fn sample() -> PropertyOwnership {
        let timeline = TimelineAssembler::default().assemble(
            vec![ClassifiedBatch {
                context: SourceContext::Current,
                records: vec![
                    OwnerRecord::Person(
                        PersonName::new("Jane".into(), None, "Doe".into(), None).unwrap(),
                    ),
                    OwnerRecord::Company(CompanyName::new("ACME LLC".into()).unwrap()),
                ],
            }],
            &mut AssemblyContext::new(),
        );

        PropertyOwnership::new(
            timeline,
            vec![InvalidEntry::new("123 MAIN ST", ReasonCode::AddressOrNoise)],
        )
    }

    #[test]
    fn test_property_summary() {
        let summary = sample().summary();

        assert_eq!(summary.buckets, 1);
        assert_eq!(summary.persons, 1);
        assert_eq!(summary.companies, 1);
        assert_eq!(summary.invalid_by_reason.get("address_or_noise"), Some(&1));
    }

    #[test]
    fn test_report_json_shape() {
        let report = OwnershipReport::single("123", sample()).unwrap();
        let json = report.to_json().unwrap();

        assert_eq!(
            json,
            concat!(
                r#"{"property_123":{"owners_by_date":{"current":["#,
                r#"{"type":"person","first_name":"Jane","last_name":"Doe"},"#,
                r#"{"type":"company","name":"ACME LLC"}]},"#,
                r#""invalid_owners":[{"raw":"123 MAIN ST","reason":"address_or_noise"}]}}"#
            )
        );
    }

    #[test]
    fn test_empty_property_id_rejected() {
        let result = OwnershipReport::single("  ", sample());
        assert_eq!(result, Err(ContractError::EmptyPropertyId));
    }

    #[test]
    fn test_fingerprint_stable_and_sensitive() {
        let a = OwnershipReport::single("1", sample()).unwrap();
        let b = OwnershipReport::single("1", sample()).unwrap();
        let c = OwnershipReport::single("2", sample()).unwrap();

        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_ne!(a.fingerprint().unwrap(), c.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);
    }

    #[test]
    fn test_report_summary_totals() {
        let mut report = OwnershipReport::new();
        report.insert("1", sample()).unwrap();
        report.insert("2", sample()).unwrap();

        let total = report.summary();
        assert_eq!(total.persons, 2);
        assert_eq!(total.invalid, 2);
        assert!(report.get("1").is_some());
        assert_eq!(report.len(), 2);
    }
}
