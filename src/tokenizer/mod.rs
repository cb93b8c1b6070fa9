// WHY: tokenization, tagging and sentence splitting are external capabilities behind one trait
// The alignment core only assumes fragments arrive in left-to-right document order

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod abbreviations;
pub mod normalization;
pub mod sentences;
pub mod tagger;
pub mod words;

pub use abbreviations::AbbreviationChecker;
pub use normalization::{collapse_newlines, collapse_newlines_into};
pub use sentences::SentenceSplitter;
pub use tagger::RuleTagger;
pub use words::WordTokenizer;

/// Tokenizer output: surface form plus part-of-speech tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub surface: String,
    pub pos_tag: String,
}

impl TaggedToken {
    pub fn new(surface: impl Into<String>, pos_tag: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            pos_tag: pos_tag.into(),
        }
    }
}

/// Pluggable word tokenizer, tagger and sentence splitter
///
/// Surface tokens may be normalized (e.g. quotes rewritten) and need not be
/// verbatim substrings of the input.
pub trait Tokenizer: Send + Sync {
    /// Ordered `(surface, pos_tag)` pairs for `text`
    fn tag_tokens(&self, text: &str) -> Result<Vec<TaggedToken>>;

    /// Ordered sentence substrings, computed on a newline-collapsed copy of `text`
    fn split_sentences(&self, text: &str) -> Result<Vec<String>>;
}

/// Rule-based baseline tokenizer following Treebank surface conventions
pub struct RegexTokenizer {
    words: WordTokenizer,
    tagger: RuleTagger,
    splitter: SentenceSplitter,
}

impl RegexTokenizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            words: WordTokenizer::new()?,
            tagger: RuleTagger::new(),
            splitter: SentenceSplitter::new()?,
        })
    }
}

impl Tokenizer for RegexTokenizer {
    fn tag_tokens(&self, text: &str) -> Result<Vec<TaggedToken>> {
        let words = self.words.tokenize(text);
        Ok(self.tagger.tag(&words))
    }

    fn split_sentences(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.splitter.split(text))
    }
}
