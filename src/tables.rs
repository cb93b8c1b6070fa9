// WHY: encoder lookup tables are immutable process-wide data, built once and shared by reference

use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::document::Document;

/// Part-of-speech tags in encoder index order; index 0 is padding and the unknown-tag fallback
pub const POS_TAGS: [&str; 46] = [
    "PAD", "TO", "VBN", "''", "WP", "UH", "VBG", "JJ", "VBZ", "--", "VBP", "NN", "DT", "PRP",
    ":", "WP$", "NNPS", "PRP$", "WDT", "(", ")", ".", ",", "``", "$", "RB", "RBR", "RBS", "VBD",
    "IN", "FW", "RP", "JJR", "JJS", "PDT", "MD", "VB", "WRB", "NNP", "EX", "NNS", "SYM", "CC",
    "CD", "POS", "LS",
];

/// Reserved index for padding and unknown tags
pub const UNKNOWN_INDEX: u8 = 0;

static POS_INDEX: OnceLock<HashMap<&'static str, u8>> = OnceLock::new();

fn pos_table() -> &'static HashMap<&'static str, u8> {
    POS_INDEX.get_or_init(|| {
        POS_TAGS
            .iter()
            .enumerate()
            .map(|(index, &tag)| (tag, index as u8))
            .collect()
    })
}

/// Encoder index of a part-of-speech tag; unknown tags map to [`UNKNOWN_INDEX`]
pub fn pos_index(tag: &str) -> u8 {
    pos_table().get(tag).copied().unwrap_or(UNKNOWN_INDEX)
}

/// Binary sentiment label: ratings 1-3 are negative (0), 4-5 positive (1)
pub fn rating_label(rating: f64) -> Option<u8> {
    match rating {
        r if r == 1.0 || r == 2.0 || r == 3.0 => Some(0),
        r if r == 4.0 || r == 5.0 => Some(1),
        _ => None,
    }
}

/// Numeric features of one document that need no embedding table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedDocument {
    pub pos: Vec<u8>,
    pub shapes: Vec<u8>,
    pub label: Option<u8>,
}

/// One POS index and one shape index per token, plus the rating label
pub fn encode_document(document: &Document) -> EncodedDocument {
    let (pos, shapes) = document
        .tokens()
        .iter()
        .map(|token| (pos_index(token.pos_tag()), token.shape().index()))
        .unzip();
    EncodedDocument {
        pos,
        shapes,
        label: document.rating().and_then(rating_label),
    }
}
