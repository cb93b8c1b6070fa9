// WHY: deterministic part-of-speech tagging over the Penn Treebank tag set
// Punctuation, numbers and closed-class words are exact; open-class words use suffix heuristics

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::shape::{classify, ShapeCategory};
use crate::tokenizer::TaggedToken;

const LEXICON: &[(&str, &[&str])] = &[
    ("DT", &["the", "a", "an", "this", "that", "these", "those", "every", "each", "some", "any", "no", "all", "both", "another"]),
    ("IN", &["of", "in", "on", "at", "by", "for", "with", "from", "about", "into", "over", "after", "before", "under", "between", "through", "during", "without", "within", "against", "among", "than", "because", "if", "while", "since", "until", "though", "although", "upon"]),
    ("CC", &["and", "or", "but", "nor"]),
    ("PRP", &["i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "myself", "yourself", "itself", "themselves"]),
    ("PRP$", &["my", "your", "his", "her", "its", "our", "their"]),
    ("MD", &["can", "could", "will", "would", "shall", "should", "may", "might", "must", "'ll", "'d"]),
    ("TO", &["to"]),
    ("WDT", &["which", "whatever"]),
    ("WP", &["who", "whom", "what"]),
    ("WP$", &["whose"]),
    ("WRB", &["when", "where", "why", "how"]),
    ("RB", &["not", "n't", "very", "too", "also", "just", "so", "never", "always", "often", "only", "really", "still", "even", "again"]),
    ("VBZ", &["is", "has", "does", "'s"]),
    ("VBP", &["are", "am", "have", "do", "'m", "'re", "'ve"]),
    ("VBD", &["was", "were", "had", "did"]),
    ("VB", &["be"]),
    ("VBN", &["been"]),
    ("VBG", &["being"]),
    ("UH", &["oh", "wow", "yes"]),
    ("JJS", &["best", "worst", "most", "least"]),
    ("JJR", &["better", "worse", "more", "less"]),
    ("JJ", &["good", "great", "bad", "new", "old", "nice", "happy", "easy", "cheap"]),
];

const PUNCTUATION: &[(&str, &str)] = &[
    (".", "."), ("!", "."), ("?", "."),
    (",", ","),
    (":", ":"), (";", ":"), ("...", ":"), ("--", ":"), ("-", ":"),
    ("(", "("), ("[", "("), ("{", "("),
    (")", ")"), ("]", ")"), ("}", ")"),
    ("``", "``"), ("''", "''"), ("'", "''"),
    ("$", "$"),
];

/// Ordered suffix rules for lowercase open-class words
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ly", "RB"),
    ("ing", "VBG"),
    ("ed", "VBD"),
    ("est", "JJS"),
    ("ous", "JJ"),
    ("ful", "JJ"),
    ("able", "JJ"),
];

static LEXICON_INDEX: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn lexicon() -> &'static HashMap<&'static str, &'static str> {
    LEXICON_INDEX.get_or_init(|| {
        LEXICON
            .iter()
            .flat_map(|&(tag, words)| words.iter().map(move |&word| (word, tag)))
            .chain(PUNCTUATION.iter().copied())
            .collect()
    })
}

/// Rule-based Treebank tagger
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleTagger;

impl RuleTagger {
    pub fn new() -> Self {
        Self
    }

    /// Tag each word; output has one entry per input word, in order
    pub fn tag(&self, words: &[String]) -> Vec<TaggedToken> {
        words
            .iter()
            .map(|word| TaggedToken::new(word.as_str(), self.tag_word(word)))
            .collect()
    }

    pub fn tag_word(&self, word: &str) -> &'static str {
        let lower = word.to_lowercase();
        if let Some(&tag) = lexicon().get(lower.as_str()) {
            return tag;
        }

        match classify(word) {
            ShapeCategory::Number => return "CD",
            ShapeCategory::Special => return "SYM",
            _ => {}
        }

        if word.chars().next().is_some_and(char::is_uppercase) {
            return "NNP";
        }

        if let Some(&(_, tag)) = SUFFIX_RULES
            .iter()
            .find(|(suffix, _)| lower.len() > suffix.len() + 2 && lower.ends_with(suffix))
        {
            return tag;
        }

        if lower.len() > 3 && lower.ends_with('s') && !lower.ends_with("ss") {
            return "NNS";
        }

        "NN"
    }
}
