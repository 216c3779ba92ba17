// 🧹 Text Normalizer - First pipeline stage
// Whitespace cleanup and removal of tokens that never belong to an owner name
// ("ET AL", "H&W", "C/O", leading "*", dangling "&")

use crate::config::KeywordTable;
use regex::Regex;
use std::sync::LazyLock;

static LEADING_JUNK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[*&;\s]+").expect("leading junk pattern"));

static TRAILING_JUNK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[=&,;\s]+$").expect("trailing junk pattern"));

/// Pure string → string cleanup. Never fails; garbage degrades to "".
pub struct TextNormalizer {
    /// Strip phrases split into uppercase tokens, longest phrase first
    strip_phrases: Vec<Vec<String>>,
}

impl TextNormalizer {
    pub fn new(keywords: &KeywordTable) -> Self {
        let mut strip_phrases: Vec<Vec<String>> = keywords
            .strip_phrases
            .iter()
            .map(|p| p.split_whitespace().map(|t| t.to_uppercase()).collect::<Vec<_>>())
            .filter(|p: &Vec<String>| !p.is_empty())
            .collect();

        // "AS TTEE" must win over "TTEE"
        strip_phrases.sort_by(|a, b| b.len().cmp(&a.len()));

        TextNormalizer { strip_phrases }
    }

    /// Normalize one raw owner string
    pub fn normalize(&self, raw: &str) -> String {
        let cleaned: String = raw
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();

        let tokens: Vec<&str> = cleaned.split_whitespace().collect();
        let mut kept: Vec<&str> = Vec::with_capacity(tokens.len());

        let mut i = 0;
        while i < tokens.len() {
            if let Some(len) = self.phrase_at(&tokens[i..]) {
                i += len;
                continue;
            }

            let token = tokens[i];
            // Collapse "& &" left behind by a stripped phrase
            if token == "&" && kept.last() == Some(&"&") {
                i += 1;
                continue;
            }

            kept.push(token);
            i += 1;
        }

        let joined = kept.join(" ");
        let joined = LEADING_JUNK.replace(&joined, "");
        let joined = TRAILING_JUNK.replace(&joined, "");

        joined.trim().to_string()
    }

    /// Length (in tokens) of the strip phrase starting at `tokens[0]`, if any
    fn phrase_at(&self, tokens: &[&str]) -> Option<usize> {
        self.strip_phrases
            .iter()
            .find(|phrase| {
                phrase.len() <= tokens.len()
                    && phrase
                        .iter()
                        .zip(tokens)
                        .all(|(p, t)| p.eq_ignore_ascii_case(t))
            })
            .map(|phrase| phrase.len())
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(&KeywordTable::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(s: &str) -> String {
        TextNormalizer::default().normalize(s)
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  SMITH\u{00A0}\u{00A0}JOHN \t A  "), "SMITH JOHN A");
        assert_eq!(normalize("DOE,\nJANE"), "DOE, JANE");
    }

    #[test]
    fn test_strips_noise_tokens() {
        assert_eq!(normalize("SMITH JOHN ET AL"), "SMITH JOHN");
        assert_eq!(normalize("SMITH JOHN ETAL"), "SMITH JOHN");
        assert_eq!(normalize("SMITH JOHN & MARY H&W"), "SMITH JOHN & MARY");
        assert_eq!(normalize("C/O JOHN SMITH"), "JOHN SMITH");
        assert_eq!(normalize("JOHN SMITH AS TTEE"), "JOHN SMITH");
        assert_eq!(normalize("JOHN SMITH TTEE"), "JOHN SMITH");
        assert_eq!(normalize("JOHN AND MARY SMITH"), "JOHN MARY SMITH");
    }

    #[test]
    fn test_keeps_words_containing_noise() {
        assert_eq!(normalize("ANDERSON JOHN"), "ANDERSON JOHN");
        assert_eq!(normalize("ETALON HOLDINGS LLC"), "ETALON HOLDINGS LLC");
    }

    #[test]
    fn test_strips_leading_star_and_dangling_ampersands() {
        assert_eq!(normalize("*SMITH JOHN"), "SMITH JOHN");
        assert_eq!(normalize("** SMITH JOHN &"), "SMITH JOHN");
        assert_eq!(normalize("& DOE JANE"), "DOE JANE");
        assert_eq!(normalize("DOE, JANE=&"), "DOE, JANE");
        assert_eq!(normalize("JOHN & H/W & MARY"), "JOHN & MARY");
    }

    #[test]
    fn test_preserves_case() {
        assert_eq!(normalize("Acme Holdings, LLC"), "Acme Holdings, LLC");
    }

    #[test]
    fn test_garbage_degrades_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("\u{0007}\u{0000}"), "");
        assert_eq!(normalize("ET AL"), "");
        assert_eq!(normalize("* & &"), "");
    }
}
