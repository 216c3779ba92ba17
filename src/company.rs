// 🏢 Company Name Canonicalizer - Matching keys for company owners
// "Acme Holdings, L.L.C." and "ACME HOLDINGS LLC" are the same owner.
// The key is only used for matching; the display name keeps its punctuation.

use crate::config::{CompanyCasing, KeywordTable};
use crate::person::title_case;
use crate::records::CompanyName;
use std::collections::HashSet;

pub struct CompanyNameCanonicalizer {
    /// Uppercase, punctuation-free corporate suffix words
    suffixes: HashSet<String>,
    casing: CompanyCasing,
}

impl CompanyNameCanonicalizer {
    pub fn new(keywords: &KeywordTable, casing: CompanyCasing) -> Self {
        CompanyNameCanonicalizer {
            suffixes: keywords
                .corporate_suffixes
                .iter()
                .map(|s| alphanumeric_upper(s))
                .filter(|s| !s.is_empty())
                .collect(),
            casing,
        }
    }

    /// Build the display record for a normalized company string
    pub fn company(&self, normalized: &str) -> Option<CompanyName> {
        let collapsed = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
        let name = match self.casing {
            CompanyCasing::Preserve => collapsed,
            CompanyCasing::Title => title_case(&collapsed),
        };
        CompanyName::new(name)
    }

    /// Uppercase, corporate suffixes dropped, everything but letters and digits removed.
    /// `Acme Holdings, L.L.C.` → `ACMEHOLDINGS`
    pub fn canonical_key(&self, name: &str) -> String {
        let key: String = name
            .split_whitespace()
            .map(alphanumeric_upper)
            .filter(|word| !word.is_empty() && !self.suffixes.contains(word))
            .collect();

        // A name made only of suffix words ("CO LLC") still needs a key
        if key.is_empty() {
            alphanumeric_upper(name)
        } else {
            key
        }
    }
}

fn alphanumeric_upper(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn canonicalizer(casing: CompanyCasing) -> CompanyNameCanonicalizer {
        CompanyNameCanonicalizer::new(&KeywordTable::default(), casing)
    }

    #[test]
    fn test_canonical_key_strips_suffixes() {
        let c = canonicalizer(CompanyCasing::Preserve);

        assert_eq!(c.canonical_key("ACME HOLDINGS LLC"), "ACMEHOLDINGS");
        assert_eq!(c.canonical_key("Acme Holdings, L.L.C."), "ACMEHOLDINGS");
        assert_eq!(c.canonical_key("acme   holdings inc."), "ACMEHOLDINGS");
        assert_eq!(c.canonical_key("SMITH & SONS CO"), "SMITHSONS");
    }

    #[test]
    fn test_canonical_key_keeps_suffix_substrings() {
        let c = canonicalizer(CompanyCasing::Preserve);
        assert_eq!(c.canonical_key("COLONIAL BANK"), "COLONIALBANK");
        assert_eq!(c.canonical_key("INCA PROPERTIES LTD"), "INCAPROPERTIES");
    }

    #[test]
    fn test_canonical_key_of_only_suffixes() {
        let c = canonicalizer(CompanyCasing::Preserve);
        assert_eq!(c.canonical_key("CO LLC"), "COLLC");
    }

    #[test]
    fn test_display_preserve() {
        let c = canonicalizer(CompanyCasing::Preserve);
        let company = c.company("ACME  HOLDINGS,  LLC").unwrap();
        assert_eq!(company.name, "ACME HOLDINGS, LLC");
    }

    #[test]
    fn test_display_title() {
        let c = canonicalizer(CompanyCasing::Title);
        let company = c.company("ACME HOLDINGS LLC").unwrap();
        assert_eq!(company.name, "Acme Holdings Llc");
    }

    #[test]
    fn test_display_empty() {
        let c = canonicalizer(CompanyCasing::Preserve);
        assert!(c.company("   ").is_none());
    }
}
