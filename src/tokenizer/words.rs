// WHY: word tokens follow Treebank surface conventions, so straight double quotes are
// rewritten to `` / '' and contractions are split, exactly the cases alignment must recover

use anyhow::Result;
use regex_automata::meta::Regex;

/// Alternatives are tried leftmost-first, so order matters:
/// dotted abbreviations, separated numbers, words, multi-char punctuation, single chars
const WORD_PATTERN: &str = r#"(?:\p{L}\.){2,}|\p{N}+(?:[.,]\p{N}+)+|[\p{L}\p{N}]+(?:[-'\u{2019}][\p{L}\p{N}]+)*|\.\.\.|--|[^\s\p{L}\p{N}]"#;

/// Clitic suffixes split off after an apostrophe
const CONTRACTION_SUFFIXES: &[&str] = &["'s", "'m", "'d", "'ll", "'re", "'ve"];

pub const OPENING_QUOTE: &str = "``";
pub const CLOSING_QUOTE: &str = "''";

/// Regex word tokenizer
pub struct WordTokenizer {
    pattern: Regex,
}

impl WordTokenizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(WORD_PATTERN)?,
        })
    }

    /// Split `text` into surface tokens; whitespace, newlines included, is never emitted
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut words = Vec::new();
        for found in self.pattern.find_iter(text) {
            let piece = &text[found.range()];
            if piece == "\"" {
                let quote = if opens_quote(text, found.start()) {
                    OPENING_QUOTE
                } else {
                    CLOSING_QUOTE
                };
                words.push(quote.to_string());
                continue;
            }
            split_contraction(piece, &mut words);
        }
        words
    }
}

/// A double quote opens when it starts the text or follows whitespace or an opening bracket
fn opens_quote(text: &str, byte_pos: usize) -> bool {
    text[..byte_pos]
        .chars()
        .next_back()
        .map_or(true, |prev| prev.is_whitespace() || matches!(prev, '(' | '[' | '{' | '<'))
}

fn split_contraction(word: &str, out: &mut Vec<String>) {
    // ASCII lowering keeps byte offsets identical to `word`
    let lower = word.to_ascii_lowercase();

    if lower.len() > 3 && lower.ends_with("n't") {
        let cut = word.len() - 3;
        out.push(word[..cut].to_string());
        out.push(word[cut..].to_string());
        return;
    }

    if let Some(apostrophe) = lower.rfind('\'') {
        if apostrophe > 0 && CONTRACTION_SUFFIXES.contains(&&lower[apostrophe..]) {
            out.push(word[..apostrophe].to_string());
            out.push(word[apostrophe..].to_string());
            return;
        }
    }

    out.push(word.to_string());
}
