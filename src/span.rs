// WHY: tokens and sentences are distinct records around an embedded Interval
// They point back at their Document through a DocumentId, never through ownership

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::document::Document;
use crate::interval::{Interval, Spanned};
use crate::shape::ShapeCategory;

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Document`], used as a non-owning back-reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentId(u64);

impl DocumentId {
    pub(crate) fn next() -> Self {
        Self(NEXT_DOCUMENT_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// Word-like unit of text with its lexical features
///
/// A token has two text representations: the raw slice of the document at
/// `[start, end)` and `surface_text`, the tokenizer's (possibly rewritten)
/// form, e.g. a straight double quote reported as ``` `` ```.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    #[serde(flatten)]
    span: Interval,
    pos_tag: String,
    shape: ShapeCategory,
    surface_text: String,
    /// Placed by the recovery heuristic, not by an exact match
    recovered: bool,
    #[serde(skip)]
    document: DocumentId,
}

impl Token {
    pub fn new(
        document: DocumentId,
        span: Interval,
        pos_tag: impl Into<String>,
        shape: ShapeCategory,
        surface_text: impl Into<String>,
    ) -> Self {
        Self {
            span,
            pos_tag: pos_tag.into(),
            shape,
            surface_text: surface_text.into(),
            recovered: false,
            document,
        }
    }

    pub fn with_recovered(mut self, recovered: bool) -> Self {
        self.recovered = recovered;
        self
    }

    pub fn recovered(&self) -> bool {
        self.recovered
    }

    pub fn pos_tag(&self) -> &str {
        &self.pos_tag
    }

    pub fn shape(&self) -> ShapeCategory {
        self.shape
    }

    pub fn surface_text(&self) -> &str {
        &self.surface_text
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({}, {}, {})", self.surface_text, self.span.start(), self.span.end())
    }
}

/// Sentence span; its tokens are derived from the owning document by overlap
#[derive(Debug, Clone, Serialize)]
pub struct Sentence {
    #[serde(flatten)]
    span: Interval,
    recovered: bool,
    #[serde(skip)]
    document: DocumentId,
}

impl Sentence {
    pub fn new(document: DocumentId, span: Interval) -> Self {
        Self { span, recovered: false, document }
    }

    pub fn with_recovered(mut self, recovered: bool) -> Self {
        self.recovered = recovered;
        self
    }

    /// Span was inferred from the next located sentence
    pub fn recovered(&self) -> bool {
        self.recovered
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }

    /// Tokens of `document` overlapping this sentence, in document order
    ///
    /// Linear scan over all tokens; a document other than the owning one
    /// yields nothing. Use [`Document::sentence_tokens`] for repeated queries.
    pub fn tokens<'d>(&self, document: &'d Document) -> Vec<&'d Token> {
        if document.id() != self.document {
            return Vec::new();
        }
        document
            .tokens()
            .iter()
            .filter(|token| self.overlaps(*token))
            .collect()
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sentence({}, {})", self.span.start(), self.span.end())
    }
}

// Identity of a span record is its interval, like the interval itself
macro_rules! impl_span_identity {
    ($($record:ty),* $(,)?) => {
        $(
            impl Spanned for $record {
                fn interval(&self) -> Interval {
                    self.span
                }
            }

            impl PartialEq for $record {
                fn eq(&self, other: &Self) -> bool {
                    self.span == other.span
                }
            }

            impl Eq for $record {}

            impl Hash for $record {
                fn hash<H: Hasher>(&self, state: &mut H) {
                    self.span.hash(state);
                }
            }

            impl PartialOrd for $record {
                fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                    Some(self.cmp(other))
                }
            }

            impl Ord for $record {
                fn cmp(&self, other: &Self) -> Ordering {
                    self.span.cmp(&other.span)
                }
            }
        )*
    };
}

impl_span_identity!(Token, Sentence);
