// WHY: sentence splitting runs on the newline-collapsed text, so returned sentences
// contain spaces where the raw text had line breaks and alignment must recover them

use anyhow::Result;
use regex_automata::meta::Regex;
use tracing::trace;

use super::abbreviations::AbbreviationChecker;
use super::normalization::collapse_newlines;

/// Terminal punctuation, optional closers, whitespace, then a capital letter or an opener
const BOUNDARY_PATTERN: &str =
    r#"[.!?]+["'\u{201D}\u{2019})\]]*\s+["'\u{201C}\u{2018}(\[\p{Lu}]"#;

/// Regex sentence splitter with title-abbreviation suppression
pub struct SentenceSplitter {
    boundary: Regex,
    abbreviations: AbbreviationChecker,
}

impl SentenceSplitter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            boundary: Regex::new(BOUNDARY_PATTERN)?,
            abbreviations: AbbreviationChecker::new(),
        })
    }

    /// Trimmed, non-empty sentences of the newline-collapsed `text`
    pub fn split(&self, text: &str) -> Vec<String> {
        let collapsed = collapse_newlines(text);
        let mut sentences = Vec::new();
        let mut sentence_start = 0;

        for found in self.boundary.find_iter(&collapsed) {
            let matched = &collapsed[found.range()];
            // Sentence ends where the whitespace after the punctuation begins
            let sentence_end = matched
                .find(char::is_whitespace)
                .map_or(found.end(), |offset| found.start() + offset);

            let candidate = &collapsed[sentence_start..sentence_end];
            if self.abbreviations.ends_with_title_abbreviation(candidate) {
                trace!(candidate, "Boundary suppressed after title abbreviation");
                continue;
            }
            push_trimmed(&mut sentences, candidate);

            // Next sentence begins at the capital letter or opener closing the match
            let opener_len = matched.chars().next_back().map_or(0, char::len_utf8);
            sentence_start = found.end() - opener_len;
        }

        push_trimmed(&mut sentences, &collapsed[sentence_start..]);
        sentences
    }
}

fn push_trimmed(sentences: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}
