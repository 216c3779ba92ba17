// 👤 Person Name Parser - "LAST [SUFFIX], FIRST [MIDDLE]" or bare token lists
//
// Two shapes:
// - Comma present: surname (plus optional suffix) on the left, given names on
//   the right, several owners joined with "=&" sharing the surname
// - No comma: token order is a per-source convention (see TokenOrder)

use crate::config::{KeywordTable, TokenOrder};
use crate::records::{PersonName, ReasonCode};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Multi-owner separator: "=&" in comma names, a bare "&" anywhere
static OWNER_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*=?&\s*").expect("owner separator pattern"));

// ============================================================================
// TITLE CASE
// ============================================================================

/// Capitalize each sub-word (split on whitespace, hyphen, apostrophe), lowercase the rest.
/// `O'BRIEN-SMITH` → `O'Brien-Smith`
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_word_start = c.is_whitespace() || c == '-' || c == '\'';
    }

    out
}

// ============================================================================
// PARSER
// ============================================================================

pub struct PersonNameParser {
    token_order: TokenOrder,
    suffixes: BTreeMap<String, String>,
}

impl PersonNameParser {
    pub fn new(token_order: TokenOrder, keywords: &KeywordTable) -> Self {
        PersonNameParser {
            token_order,
            suffixes: keywords.person_suffixes.clone(),
        }
    }

    /// Parse a normalized, non-company string into one or more people
    pub fn parse(&self, text: &str) -> Result<Vec<PersonName>, ReasonCode> {
        match text.split_once(',') {
            Some((left, right)) => self.parse_comma(left, right),
            None => self.parse_plain(text),
        }
    }

    /// `LAST [SUFFIX], FIRST [MIDDLE] [=& FIRST [MIDDLE]]...`
    fn parse_comma(&self, left: &str, right: &str) -> Result<Vec<PersonName>, ReasonCode> {
        let mut surname = name_tokens(left);
        let mut shared_suffix = None;

        if surname.len() > 1 {
            if let Some(suffix) = surname.last().and_then(|t| self.suffix(t)) {
                shared_suffix = Some(suffix);
                surname.pop();
            }
        }

        if surname.is_empty() {
            return Err(ReasonCode::CommaButInsufficientParts);
        }
        let last_name = self.render(&surname);

        // Stray extra commas ("DOE, JOHN, JR") are just separators
        let right = right.replace(',', " ");
        let segments: Vec<Vec<&str>> = OWNER_SEPARATOR
            .split(&right)
            .map(name_tokens)
            .filter(|tokens| !tokens.is_empty())
            .collect();

        if segments.is_empty() {
            return Err(ReasonCode::InsufficientNameParts);
        }

        let mut people = Vec::with_capacity(segments.len());
        for mut given in segments {
            let mut suffix = shared_suffix.clone();
            if given.len() > 1 {
                if let Some(own) = given.last().and_then(|t| self.suffix(t)) {
                    suffix = Some(own);
                    given.pop();
                }
            }

            let first_name = self.render(&given[..1]);
            let middle_name = (given.len() > 1).then(|| self.render(&given[1..]));

            let person = PersonName::new(first_name, middle_name, last_name.clone(), suffix)
                .ok_or(ReasonCode::InsufficientNameParts)?;
            people.push(person);
        }

        Ok(people)
    }

    /// No comma: split on "&" and apply the configured token order to each part
    fn parse_plain(&self, text: &str) -> Result<Vec<PersonName>, ReasonCode> {
        let segments: Vec<(Vec<&str>, Option<String>)> = OWNER_SEPARATOR
            .split(text)
            .map(name_tokens)
            .filter(|tokens| !tokens.is_empty())
            .map(|tokens| self.split_suffix(tokens))
            .collect();

        if segments.is_empty() {
            return Err(ReasonCode::InsufficientNameParts);
        }

        // Surname lent to one-token parts: "JOHN & MARY SMITH", "SMITH JOHN & MARY"
        let shared_surname: Option<&str> = match self.token_order {
            TokenOrder::FirstLast => segments
                .last()
                .filter(|(tokens, _)| tokens.len() >= 2)
                .and_then(|(tokens, _)| tokens.last().copied()),
            TokenOrder::LastFirst => segments
                .first()
                .filter(|(tokens, _)| tokens.len() >= 2)
                .and_then(|(tokens, _)| tokens.first().copied()),
        };

        let no_middle: &[&str] = &[];
        let mut people = Vec::with_capacity(segments.len());
        for (tokens, suffix) in &segments {
            let (first, middle, last): (&[&str], &[&str], Vec<&str>) = match tokens.len() {
                0 => return Err(ReasonCode::InsufficientNameParts),
                1 => match (segments.len() > 1, shared_surname) {
                    (true, Some(surname)) => (&tokens[..1], no_middle, vec![surname]),
                    _ => return Err(ReasonCode::InsufficientNameParts),
                },
                n => match self.token_order {
                    TokenOrder::FirstLast => (&tokens[..1], &tokens[1..n - 1], vec![tokens[n - 1]]),
                    TokenOrder::LastFirst => (&tokens[1..2], &tokens[2..], vec![tokens[0]]),
                },
            };

            let middle_name = (!middle.is_empty()).then(|| self.render(middle));
            let person = PersonName::new(
                self.render(first),
                middle_name,
                self.render(&last),
                suffix.clone(),
            )
            .ok_or(ReasonCode::InsufficientNameParts)?;
            people.push(person);
        }

        Ok(people)
    }

    /// Pull a suffix token out of a no-comma segment: the final token, or under
    /// `LastFirst` the token right after the surname. Two name tokens must remain.
    fn split_suffix<'a>(&self, mut tokens: Vec<&'a str>) -> (Vec<&'a str>, Option<String>) {
        if tokens.len() < 3 {
            return (tokens, None);
        }

        if let Some(suffix) = tokens.last().and_then(|t| self.suffix(t)) {
            tokens.pop();
            return (tokens, Some(suffix));
        }

        if self.token_order == TokenOrder::LastFirst {
            if let Some(suffix) = self.suffix(tokens[1]) {
                tokens.remove(1);
                return (tokens, Some(suffix));
            }
        }

        (tokens, None)
    }

    fn suffix(&self, token: &str) -> Option<String> {
        let bare = token.trim_end_matches('.').to_uppercase();
        self.suffixes.get(&bare).cloned()
    }

    /// Title-case a run of tokens, keeping suffix tokens in canonical form
    fn render(&self, tokens: &[&str]) -> String {
        tokens
            .iter()
            .map(|t| self.suffix(t).unwrap_or_else(|| title_case(t)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Whitespace tokens that carry at least one letter or digit
fn name_tokens(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .filter(|t| t.chars().any(|c| c.is_alphanumeric()))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(order: TokenOrder) -> PersonNameParser {
        PersonNameParser::new(order, &KeywordTable::default())
    }

    fn person(first: &str, middle: Option<&str>, last: &str, suffix: Option<&str>) -> PersonName {
        PersonName::new(
            first.to_string(),
            middle.map(String::from),
            last.to_string(),
            suffix.map(String::from),
        )
        .unwrap()
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("SMITH"), "Smith");
        assert_eq!(title_case("o'brien-SMITH"), "O'Brien-Smith");
        assert_eq!(title_case("MARY ANN"), "Mary Ann");
        assert_eq!(title_case("Q."), "Q.");
    }

    #[test]
    fn test_comma_basic() {
        let people = parser(TokenOrder::FirstLast).parse("SMITH, JOHN A").unwrap();
        assert_eq!(people, vec![person("John", Some("A"), "Smith", None)]);
    }

    #[test]
    fn test_comma_with_suffix() {
        let people = parser(TokenOrder::FirstLast)
            .parse("CARLUCCI JR, CARL PETER")
            .unwrap();
        assert_eq!(people, vec![person("Carl", Some("Peter"), "Carlucci", Some("Jr."))]);
    }

    #[test]
    fn test_comma_multi_owner() {
        let people = parser(TokenOrder::FirstLast).parse("DOE, JANE=&JOHN").unwrap();
        assert_eq!(
            people,
            vec![person("Jane", None, "Doe", None), person("John", None, "Doe", None)]
        );

        let people = parser(TokenOrder::FirstLast)
            .parse("CARLUCCI, CARL =& PATRICIA ANN")
            .unwrap();
        assert_eq!(people.len(), 2);
        assert_eq!(people[1], person("Patricia", Some("Ann"), "Carlucci", None));
    }

    #[test]
    fn test_comma_suffix_on_given_side() {
        let people = parser(TokenOrder::FirstLast).parse("DOE, JOHN, JR.").unwrap();
        assert_eq!(people, vec![person("John", None, "Doe", Some("Jr."))]);
    }

    #[test]
    fn test_comma_failures() {
        let p = parser(TokenOrder::FirstLast);
        assert_eq!(p.parse("DOE,"), Err(ReasonCode::InsufficientNameParts));
        assert_eq!(p.parse("DOE, &"), Err(ReasonCode::InsufficientNameParts));
        assert_eq!(p.parse(", JOHN"), Err(ReasonCode::CommaButInsufficientParts));
    }

    #[test]
    fn test_plain_first_last() {
        let people = parser(TokenOrder::FirstLast).parse("JOHN Q SMITH").unwrap();
        assert_eq!(people, vec![person("John", Some("Q"), "Smith", None)]);

        let people = parser(TokenOrder::FirstLast).parse("JOHN SMITH").unwrap();
        assert_eq!(people, vec![person("John", None, "Smith", None)]);
    }

    #[test]
    fn test_plain_last_first() {
        let people = parser(TokenOrder::LastFirst).parse("SMITH JOHN A").unwrap();
        assert_eq!(people, vec![person("John", Some("A"), "Smith", None)]);
    }

    #[test]
    fn test_plain_suffix() {
        let people = parser(TokenOrder::FirstLast).parse("JOHN SMITH JR").unwrap();
        assert_eq!(people, vec![person("John", None, "Smith", Some("Jr."))]);

        let people = parser(TokenOrder::LastFirst).parse("SMITH III JOHN").unwrap();
        assert_eq!(people, vec![person("John", None, "Smith", Some("III"))]);

        // Too short to give up a token
        let people = parser(TokenOrder::FirstLast).parse("JOHN JR").unwrap();
        assert_eq!(people, vec![person("John", None, "Jr.", None)]);
    }

    #[test]
    fn test_plain_shared_surname() {
        let people = parser(TokenOrder::FirstLast).parse("JOHN & MARY SMITH").unwrap();
        assert_eq!(
            people,
            vec![person("John", None, "Smith", None), person("Mary", None, "Smith", None)]
        );

        let people = parser(TokenOrder::LastFirst).parse("SMITH JOHN & MARY").unwrap();
        assert_eq!(
            people,
            vec![person("John", None, "Smith", None), person("Mary", None, "Smith", None)]
        );
    }

    #[test]
    fn test_plain_two_full_names() {
        let people = parser(TokenOrder::FirstLast)
            .parse("JOHN SMITH & MARY JONES")
            .unwrap();
        assert_eq!(
            people,
            vec![person("John", None, "Smith", None), person("Mary", None, "Jones", None)]
        );
    }

    #[test]
    fn test_plain_insufficient() {
        let p = parser(TokenOrder::FirstLast);
        assert_eq!(p.parse("MADONNA"), Err(ReasonCode::InsufficientNameParts));
        assert_eq!(p.parse("JOHN & MARY"), Err(ReasonCode::InsufficientNameParts));
    }

    #[test]
    fn test_hyphen_and_apostrophe_names() {
        let people = parser(TokenOrder::FirstLast)
            .parse("O'BRIEN-KELLY, MARY-KATE")
            .unwrap();
        assert_eq!(people, vec![person("Mary-Kate", None, "O'Brien-Kelly", None)]);
    }
}
