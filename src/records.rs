// 🏠 Ownership Records - Data model shared by every pipeline stage
// Raw candidates come in, OwnerRecords and InvalidEntries come out

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// SOURCE CONTEXT
// ============================================================================

/// Where a raw candidate string was found on the assessor page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceContext {
    /// Current-owner block
    Current,

    /// A sales row whose date parsed
    Date(NaiveDate),

    /// No usable date (unparseable date, or an unmatched historical grantor)
    Unknown,
}

impl SourceContext {
    /// Bucket key for dated contexts, `None` otherwise
    pub fn date_key(&self) -> Option<String> {
        match self {
            SourceContext::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
            _ => None,
        }
    }
}

/// RawCandidate - one unprocessed owner string plus where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub text: String,
    pub context: SourceContext,
}

impl RawCandidate {
    pub fn new(text: impl Into<String>, context: SourceContext) -> Self {
        RawCandidate {
            text: text.into(),
            context,
        }
    }
}

/// Why a batch was collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchRole {
    /// Owner lines, sale grantees, undated sale sides
    #[default]
    Owner,

    /// Seller on a dated sale. Dropped when an earlier dated sale already
    /// named the same owner as its grantee; otherwise an undated owner.
    DatedGrantor,
}

/// A group of candidates discovered together (one owner block, one sales row).
/// Undated batches each get their own `unknown_date_N` bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateBatch {
    pub context: SourceContext,
    pub role: BatchRole,
    pub candidates: Vec<RawCandidate>,
}

impl CandidateBatch {
    pub fn new(context: SourceContext) -> Self {
        CandidateBatch {
            context,
            role: BatchRole::Owner,
            candidates: Vec::new(),
        }
    }

    /// Seller batch for a dated sale; bucketed as undated if it survives
    pub fn dated_grantor() -> Self {
        CandidateBatch {
            context: SourceContext::Unknown,
            role: BatchRole::DatedGrantor,
            candidates: Vec::new(),
        }
    }

    /// Add a candidate string; the candidate inherits the batch context
    pub fn push(&mut self, text: impl Into<String>) {
        self.candidates
            .push(RawCandidate::new(text, self.context.clone()));
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

// ============================================================================
// OWNER RECORD
// ============================================================================

/// A natural person. `first_name` and `last_name` are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub first_name: String,
    pub last_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix_name: Option<String>,
}

impl PersonName {
    /// Build a person, refusing empty first/last names
    pub fn new(
        first_name: String,
        middle_name: Option<String>,
        last_name: String,
        suffix_name: Option<String>,
    ) -> Option<Self> {
        if first_name.trim().is_empty() || last_name.trim().is_empty() {
            return None;
        }

        Some(PersonName {
            first_name,
            last_name,
            middle_name: middle_name.filter(|m| !m.trim().is_empty()),
            suffix_name: suffix_name.filter(|s| !s.trim().is_empty()),
        })
    }
}

/// A company, trust, bank or other non-person owner. `name` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyName {
    pub name: String,
}

impl CompanyName {
    pub fn new(name: String) -> Option<Self> {
        if name.trim().is_empty() {
            return None;
        }
        Some(CompanyName { name })
    }
}

/// OwnerRecord - serializes as `{"type": "person", ...}` or `{"type": "company", ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OwnerRecord {
    Person(PersonName),
    Company(CompanyName),
}

impl OwnerRecord {
    pub fn is_person(&self) -> bool {
        matches!(self, OwnerRecord::Person(_))
    }

    pub fn is_company(&self) -> bool {
        matches!(self, OwnerRecord::Company(_))
    }

    /// Human-readable name for log lines
    pub fn display_name(&self) -> String {
        match self {
            OwnerRecord::Person(p) => {
                let mut parts = vec![p.first_name.as_str()];
                if let Some(middle) = &p.middle_name {
                    parts.push(middle);
                }
                parts.push(&p.last_name);
                if let Some(suffix) = &p.suffix_name {
                    parts.push(suffix);
                }
                parts.join(" ")
            }
            OwnerRecord::Company(c) => c.name.clone(),
        }
    }
}

// ============================================================================
// INVALID ENTRIES
// ============================================================================

/// Why a raw string did not become an OwnerRecord
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Nothing left after normalization
    Empty,

    /// Looks like an address, ZIP, date fragment or abbreviation
    AddressOrNoise,

    /// No alphabetic name material to classify
    Unclassified,

    /// Person string without enough tokens for first + last name
    InsufficientNameParts,

    /// `UNKNOWN`, `UNKNOWN SELLER`, `CONVERSION` and friends
    NonOwnerPlaceholder,

    /// Comma present but the surname side is empty
    CommaButInsufficientParts,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::Empty => "empty",
            ReasonCode::AddressOrNoise => "address_or_noise",
            ReasonCode::Unclassified => "unclassified",
            ReasonCode::InsufficientNameParts => "insufficient_name_parts",
            ReasonCode::NonOwnerPlaceholder => "non_owner_placeholder",
            ReasonCode::CommaButInsufficientParts => "comma_but_insufficient_parts",
        }
    }

    pub fn all() -> [ReasonCode; 6] {
        [
            ReasonCode::Empty,
            ReasonCode::AddressOrNoise,
            ReasonCode::Unclassified,
            ReasonCode::InsufficientNameParts,
            ReasonCode::NonOwnerPlaceholder,
            ReasonCode::CommaButInsufficientParts,
        ]
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidEntry {
    pub raw: String,
    pub reason: ReasonCode,
}

impl InvalidEntry {
    pub fn new(raw: impl Into<String>, reason: ReasonCode) -> Self {
        InvalidEntry {
            raw: raw.into(),
            reason,
        }
    }
}

/// Outcome of classifying one string: records, or a rejection reason.
/// A single string can expand into several owners (`DOE, JANE=&JOHN`).
pub type Classification = Result<Vec<OwnerRecord>, ReasonCode>;

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_requires_first_and_last() {
        assert!(PersonName::new("John".into(), None, "".into(), None).is_none());
        assert!(PersonName::new(" ".into(), None, "Smith".into(), None).is_none());

        let p = PersonName::new("John".into(), Some("".into()), "Smith".into(), None).unwrap();
        assert_eq!(p.middle_name, None);
    }

    #[test]
    fn test_company_requires_name() {
        assert!(CompanyName::new("  ".into()).is_none());
        assert!(CompanyName::new("Acme LLC".into()).is_some());
    }

    #[test]
    fn test_person_serialization_shape() {
        let record = OwnerRecord::Person(
            PersonName::new("John".into(), Some("Q".into()), "Smith".into(), None).unwrap(),
        );
        let json = serde_json::to_string(&record).unwrap();

        assert_eq!(
            json,
            r#"{"type":"person","first_name":"John","last_name":"Smith","middle_name":"Q"}"#
        );
    }

    #[test]
    fn test_company_serialization_shape() {
        let record = OwnerRecord::Company(CompanyName::new("Acme Holdings LLC".into()).unwrap());
        let json = serde_json::to_string(&record).unwrap();

        assert_eq!(json, r#"{"type":"company","name":"Acme Holdings LLC"}"#);
    }

    #[test]
    fn test_reason_code_strings_match_serde() {
        for reason in ReasonCode::all() {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason.as_str()));
        }
    }

    #[test]
    fn test_date_key_is_iso() {
        let ctx = SourceContext::Date(NaiveDate::from_ymd_opt(2010, 4, 1).unwrap());
        assert_eq!(ctx.date_key(), Some("2010-04-01".to_string()));
        assert_eq!(SourceContext::Current.date_key(), None);
    }
}
