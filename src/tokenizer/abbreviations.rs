// WHY: a period after a title abbreviation followed by a capitalized name is not a sentence end

use std::collections::HashSet;

/// Title abbreviations that precede proper nouns, e.g. "Dr. Smith"
pub const TITLE_ABBREVIATIONS: &[&str] = &[
    "Dr.", "Mr.", "Mrs.", "Ms.", "Prof.", "Sr.", "Jr.", "St.", "Mt.", "Gen.", "Capt.",
];

/// Set lookup over the title abbreviations
pub struct AbbreviationChecker {
    title_abbreviations: HashSet<&'static str>,
}

impl AbbreviationChecker {
    pub fn new() -> Self {
        Self {
            title_abbreviations: TITLE_ABBREVIATIONS.iter().copied().collect(),
        }
    }

    pub fn is_title_abbreviation(&self, word: &str) -> bool {
        self.title_abbreviations.contains(word)
    }

    /// Check whether the last word of `text`, quotes stripped, is a title abbreviation
    pub fn ends_with_title_abbreviation(&self, text: &str) -> bool {
        text.split_whitespace()
            .last()
            .map(|last_word| {
                last_word.trim_matches(|c: char| {
                    matches!(c, '"' | '\'' | '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}' | '(')
                })
            })
            .is_some_and(|word| self.is_title_abbreviation(word))
    }
}

impl Default for AbbreviationChecker {
    fn default() -> Self {
        Self::new()
    }
}
