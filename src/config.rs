// ⚙️ Engine Configuration - Keyword tables as data
// Jurisdictions override the tables (or the token order) without code changes

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// ============================================================================
// NAME CONVENTIONS
// ============================================================================

/// Token order for person names written without a comma
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenOrder {
    /// `JOHN Q SMITH` - first token is the first name, last token the surname
    #[default]
    FirstLast,

    /// `SMITH JOHN Q` - first token is the surname
    LastFirst,
}

/// How company display names are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyCasing {
    /// Keep the casing found on the page (whitespace still collapsed)
    #[default]
    Preserve,

    /// `ACME HOLDINGS LLC` → `Acme Holdings Llc`
    Title,
}

// ============================================================================
// KEYWORD TABLE
// ============================================================================

/// Every word list the pipeline consults. All matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordTable {
    /// Any whole-word hit classifies the string as a company
    pub company_keywords: Vec<String>,

    /// Dropped when building a company canonical key
    pub corporate_suffixes: Vec<String>,

    /// Generational/professional suffix token → canonical spelling
    pub person_suffixes: BTreeMap<String, String>,

    /// Whole-word hits mark the string as an address
    pub street_suffixes: Vec<String>,

    /// Strings that stand in for a missing owner
    pub placeholders: Vec<String>,

    /// Phrases removed by the normalizer wherever they appear as whole words
    pub strip_phrases: Vec<String>,
}

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for KeywordTable {
    fn default() -> Self {
        KeywordTable {
            company_keywords: strings(&[
                "INC", "LLC", "LTD", "CORP", "CORPORATION", "CO", "COMPANY", "TRUST", "TR",
                "LP", "LLP", "LLLP", "PLC", "HOLDINGS", "BANK", "ASSOCIATION", "ASSN",
                "REALTY", "PROPERTIES", "PARTNERS", "PARTNERSHIP", "INVESTMENTS", "GROUP",
                "ENTERPRISES", "FOUNDATION", "ALLIANCE", "SOLUTIONS", "SERVICES", "LIMITED",
                "CHURCH", "MINISTRIES", "AUTHORITY", "DEVELOPMENT", "MANAGEMENT", "CAPITAL",
                "FUND", "VENTURES", "HOMES", "BUILDERS", "MORTGAGE", "FEDERAL", "NATIONAL",
                "UNIVERSITY", "COUNTY", "CITY OF", "STATE OF",
            ]),
            corporate_suffixes: strings(&[
                "LLC", "LTD", "INC", "CO", "CORP", "LP", "LLP", "LLLP", "COMPANY",
                "CORPORATION", "LIMITED",
            ]),
            person_suffixes: [
                ("JR", "Jr."),
                ("SR", "Sr."),
                ("II", "II"),
                ("III", "III"),
                ("IV", "IV"),
                ("ESQ", "Esq."),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            street_suffixes: strings(&[
                "ST", "STREET", "AVE", "AVENUE", "BLVD", "BOULEVARD", "RD", "ROAD", "LN",
                "DR", "CT", "HWY", "HIGHWAY", "PKWY", "PARKWAY", "PL", "TRL", "CIR", "TER",
                "UNIT", "APT", "SUITE", "STE", "PO BOX", "P O BOX",
            ]),
            placeholders: strings(&[
                "UNKNOWN",
                "UNKNOWN SELLER",
                "UNKNOWN OWNER",
                "UNKNOWN BUYER",
                "CONVERSION",
                "NONE",
            ]),
            strip_phrases: strings(&[
                "H&W", "H/W", "C/O", "ET AL", "ETAL", "AS TTEE", "TTEE", "TR U/A", "AND",
            ]),
        }
    }
}

impl KeywordTable {
    /// Canonical suffix for a token (`jr.` → `Jr.`), `None` if not a suffix
    pub fn canonical_suffix(&self, token: &str) -> Option<&str> {
        let bare = token.trim_end_matches('.').to_uppercase();
        self.person_suffixes.get(&bare).map(|s| s.as_str())
    }

    pub fn is_placeholder(&self, text: &str) -> bool {
        self.placeholders
            .iter()
            .any(|p| p.eq_ignore_ascii_case(text.trim()))
    }
}

// ============================================================================
// ENGINE CONFIG
// ============================================================================

/// Per-source (per-county) overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceOverrides {
    #[serde(default)]
    pub token_order: Option<TokenOrder>,

    #[serde(default)]
    pub company_casing: Option<CompanyCasing>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub keywords: KeywordTable,

    /// Convention for person names without a comma
    pub token_order: TokenOrder,

    pub company_casing: CompanyCasing,

    /// Copy a duplicate's middle/suffix into the kept record when it has none
    pub backfill_duplicates: bool,

    /// Source name → overrides, applied by `for_source`
    pub sources: BTreeMap<String, SourceOverrides>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            keywords: KeywordTable::default(),
            token_order: TokenOrder::default(),
            company_casing: CompanyCasing::default(),
            backfill_duplicates: true,
            sources: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file; missing fields take defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: EngineConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        Ok(config)
    }

    /// Builder: set the no-comma token order
    pub fn with_token_order(mut self, order: TokenOrder) -> Self {
        self.token_order = order;
        self
    }

    /// Builder: set company display casing
    pub fn with_company_casing(mut self, casing: CompanyCasing) -> Self {
        self.company_casing = casing;
        self
    }

    /// Effective configuration for one source. Unknown sources get the base config.
    pub fn for_source(&self, source: &str) -> EngineConfig {
        let mut effective = self.clone();

        match self.sources.get(source) {
            Some(overrides) => {
                if let Some(order) = overrides.token_order {
                    effective.token_order = order;
                }
                if let Some(casing) = overrides.company_casing {
                    effective.company_casing = casing;
                }
            }
            None => {
                tracing::debug!(source, "no overrides configured for source");
            }
        }

        effective
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();

        assert_eq!(config.token_order, TokenOrder::FirstLast);
        assert_eq!(config.company_casing, CompanyCasing::Preserve);
        assert!(config.backfill_duplicates);
        assert!(config.keywords.company_keywords.contains(&"LLC".to_string()));
    }

    #[test]
    fn test_canonical_suffix() {
        let table = KeywordTable::default();

        assert_eq!(table.canonical_suffix("JR"), Some("Jr."));
        assert_eq!(table.canonical_suffix("jr."), Some("Jr."));
        assert_eq!(table.canonical_suffix("III"), Some("III"));
        assert_eq!(table.canonical_suffix("SMITH"), None);
    }

    #[test]
    fn test_placeholder_match_is_exact() {
        let table = KeywordTable::default();

        assert!(table.is_placeholder("UNKNOWN SELLER"));
        assert!(table.is_placeholder("unknown"));
        assert!(!table.is_placeholder("UNKNOWN SMITH"));
    }

    #[test]
    fn test_for_source_applies_overrides() {
        let mut config = EngineConfig::default();
        config.sources.insert(
            "broward".to_string(),
            SourceOverrides {
                token_order: Some(TokenOrder::LastFirst),
                company_casing: None,
            },
        );

        assert_eq!(config.for_source("broward").token_order, TokenOrder::LastFirst);
        assert_eq!(config.for_source("broward").company_casing, CompanyCasing::Preserve);
        assert_eq!(config.for_source("lee").token_order, TokenOrder::FirstLast);
    }

    #[test]
    fn test_from_file_partial_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"token_order": "last_first", "sources": {{"palm_beach": {{"company_casing": "title"}}}}}}"#
        )
        .unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();

        assert_eq!(config.token_order, TokenOrder::LastFirst);
        assert_eq!(config.keywords, KeywordTable::default());
        assert_eq!(
            config.for_source("palm_beach").company_casing,
            CompanyCasing::Title
        );
    }

    #[test]
    fn test_from_file_missing() {
        let result = EngineConfig::from_file("/nonexistent/owner-config.json");
        assert!(result.is_err());
    }
}
