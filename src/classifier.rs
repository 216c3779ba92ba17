// 🏷️ Entity Classifier - Person or company?
// Ordered rules over keyword tables; the first matching rule decides.
// With no match the string is treated as a person name.

use crate::config::KeywordTable;
use crate::noise::whole_word_regex;
use crate::records::ReasonCode;
use regex::Regex;

// ============================================================================
// ENTITY KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Person,
    Company,
}

/// Which kind, and which rule decided it (`None` = fell through to person)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityVerdict {
    pub kind: EntityKind,
    pub rule_id: Option<String>,

    /// Text the deciding rule matched on, when it can say
    pub matched: Option<String>,
}

// ============================================================================
// RULES
// ============================================================================

/// One classification rule. Higher priority rules are consulted first.
pub trait EntityRule: Send + Sync {
    fn id(&self) -> &str;

    fn priority(&self) -> i32 {
        0
    }

    /// `Some(kind)` if this rule recognises the string
    fn evaluate(&self, text: &str) -> Option<EntityKind>;

    /// The part of `text` that triggered the rule
    fn matched<'t>(&self, _text: &'t str) -> Option<&'t str> {
        None
    }
}

/// Whole-word, case-insensitive keyword rule: `(^|[^A-Z])KEYWORD([^A-Z]|$)`
pub struct KeywordRule {
    id: String,
    kind: EntityKind,
    priority: i32,
    pattern: Regex,
}

impl KeywordRule {
    /// `None` when `keywords` is empty
    pub fn new(
        id: impl Into<String>,
        kind: EntityKind,
        keywords: &[String],
        priority: i32,
    ) -> Result<Option<Self>, regex::Error> {
        let id = id.into();
        Ok(whole_word_regex(keywords)?.map(|pattern| KeywordRule {
            id,
            kind,
            priority,
            pattern,
        }))
    }

    /// The keyword that matched
    pub fn matched_keyword<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str())
    }
}

impl EntityRule for KeywordRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn evaluate(&self, text: &str) -> Option<EntityKind> {
        self.pattern.is_match(text).then_some(self.kind)
    }

    fn matched<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.matched_keyword(text)
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

pub struct EntityClassifier {
    rules: Vec<Box<dyn EntityRule>>,
}

impl EntityClassifier {
    /// Classifier with no rules: everything is a person
    pub fn empty() -> Self {
        EntityClassifier { rules: Vec::new() }
    }

    /// Default rule set: the company keyword table
    pub fn new(keywords: &KeywordTable) -> Result<Self, regex::Error> {
        let mut classifier = EntityClassifier::empty();

        if let Some(rule) = KeywordRule::new(
            "company_keywords",
            EntityKind::Company,
            &keywords.company_keywords,
            0,
        )? {
            classifier.add_rule(Box::new(rule));
        }

        Ok(classifier)
    }

    /// Add a rule, keeping the list sorted by priority (higher first, stable)
    pub fn add_rule(&mut self, rule: Box<dyn EntityRule>) {
        self.rules.push(rule);
        self.rules.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Decide person vs company for a normalized, non-noise string
    pub fn classify(&self, text: &str) -> Result<EntityVerdict, ReasonCode> {
        if !text.chars().any(|c| c.is_alphabetic()) {
            return Err(ReasonCode::Unclassified);
        }

        for rule in &self.rules {
            if let Some(kind) = rule.evaluate(text) {
                return Ok(EntityVerdict {
                    kind,
                    rule_id: Some(rule.id().to_string()),
                    matched: rule.matched(text).map(String::from),
                });
            }
        }

        Ok(EntityVerdict {
            kind: EntityKind::Person,
            rule_id: None,
            matched: None,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
