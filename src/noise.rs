// 🚧 Noise Filter - Reject addresses, ZIP fragments and placeholder owners
// Owner blocks on assessor pages mix mailing-address lines in with names

use crate::config::KeywordTable;
use crate::records::ReasonCode;
use regex::Regex;

/// Strings this short are city/state abbreviations, never owners
const MAX_NOISE_LEN: usize = 3;

/// This many digits means an address or a date, not a name
const MIN_NOISE_DIGITS: usize = 3;

pub struct NoiseFilter {
    bare_zip: Regex,
    state_zip: Regex,
    street_suffix: Option<Regex>,
    keywords: KeywordTable,
}

impl NoiseFilter {
    pub fn new(keywords: &KeywordTable) -> Result<Self, regex::Error> {
        Ok(NoiseFilter {
            bare_zip: Regex::new(r"^\d{5}(-\d{4})?$")?,
            state_zip: Regex::new(r"(?i)(^|[^A-Z])[A-Z]{2},?\s+\d{5}(-\d{4})?$")?,
            street_suffix: whole_word_regex(&keywords.street_suffixes)?,
            keywords: keywords.clone(),
        })
    }

    /// Rejection reason for a normalized string, `None` if it may be an owner
    pub fn verdict(&self, normalized: &str) -> Option<ReasonCode> {
        if self.keywords.is_placeholder(normalized) {
            return Some(ReasonCode::NonOwnerPlaceholder);
        }

        if self.is_noise(normalized) {
            return Some(ReasonCode::AddressOrNoise);
        }

        None
    }

    /// Address/noise heuristics, short-circuit OR
    pub fn is_noise(&self, normalized: &str) -> bool {
        let text = normalized.trim();

        if self.bare_zip.is_match(text) || self.state_zip.is_match(text) {
            return true;
        }

        if let Some(street) = &self.street_suffix {
            if street.is_match(text) {
                return true;
            }
        }

        if text.chars().filter(|c| c.is_ascii_digit()).count() >= MIN_NOISE_DIGITS {
            return true;
        }

        text.chars().count() <= MAX_NOISE_LEN
    }
}

/// Case-insensitive alternation matching any of `words` as a whole word.
/// Multi-word entries (`PO BOX`) tolerate any run of whitespace between words.
pub(crate) fn whole_word_regex(words: &[String]) -> Result<Option<Regex>, regex::Error> {
    let mut alternatives: Vec<String> = words
        .iter()
        .map(|w| w.split_whitespace().map(regex::escape).collect::<Vec<_>>())
        .filter(|parts| !parts.is_empty())
        .map(|parts| parts.join(r"\s+"))
        .collect();

    if alternatives.is_empty() {
        return Ok(None);
    }

    // Longest first so the alternation prefers "CORPORATION" over "CORP"
    alternatives.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let pattern = format!(
        r"(?i)(^|[^A-Z0-9])({})([^A-Z0-9]|$)",
        alternatives.join("|")
    );
    Regex::new(&pattern).map(Some)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> NoiseFilter {
        NoiseFilter::new(&KeywordTable::default()).unwrap()
    }

    #[test]
    fn test_zip_codes() {
        let f = filter();
        assert!(f.is_noise("33101"));
        assert!(f.is_noise("33101-1234"));
        assert!(f.is_noise("MIAMI FL 33101"));
        assert!(f.is_noise("MIAMI, FL 33101-4455"));
    }

    #[test]
    fn test_street_addresses() {
        let f = filter();
        assert!(f.is_noise("123 MAIN ST"));
        assert!(f.is_noise("MAIN ST"));
        assert!(f.is_noise("OCEAN BLVD"));
        assert!(f.is_noise("PO BOX 12"));
        assert!(f.is_noise("P O  BOX"));
        assert!(f.is_noise("SUNSET AVE."));
    }

    #[test]
    fn test_street_suffix_needs_whole_word() {
        let f = filter();
        assert!(!f.is_noise("STEVENS JOHN"));
        assert!(!f.is_noise("JOHN DRAKE"));
        assert!(!f.is_noise("CTRL HOLDINGS LLC"));
    }

    #[test]
    fn test_digit_and_length_heuristics() {
        let f = filter();
        assert!(f.is_noise("SMITH JOHN 1990"));
        assert!(f.is_noise("FL"));
        assert!(f.is_noise("USA"));
        assert!(!f.is_noise("JOHN SMITH"));
        assert!(!f.is_noise("SMITH 2ND JOHN"));
    }

    #[test]
    fn test_placeholder_verdict() {
        let f = filter();
        assert_eq!(f.verdict("UNKNOWN SELLER"), Some(ReasonCode::NonOwnerPlaceholder));
        assert_eq!(f.verdict("Conversion"), Some(ReasonCode::NonOwnerPlaceholder));
        assert_eq!(f.verdict("123 MAIN ST"), Some(ReasonCode::AddressOrNoise));
        assert_eq!(f.verdict("ACME HOLDINGS LLC"), None);
    }

    #[test]
    fn test_whole_word_regex_empty_list() {
        assert!(whole_word_regex(&[]).unwrap().is_none());
    }
}
