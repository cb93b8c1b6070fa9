// WHY: a Document owns the raw text and every Token/Sentence aligned onto it
// Construction is one shot; the rating is the only value assigned afterwards

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::sync::OnceLock;
use tracing::debug;

use crate::alignment::{align_sentences, align_tokens, AlignmentConfig, CharIndex};
use crate::interval::{Interval, Spanned};
use crate::shape::classify;
use crate::span::{DocumentId, Sentence, Token};
use crate::tokenizer::{TaggedToken, Tokenizer};

/// Raw text plus its aligned tokens and sentences
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    text: String,
    tokens: Vec<Token>,
    sentences: Vec<Sentence>,
    rating: Option<f64>,
    /// Char-to-byte table of `text`, kept from alignment for slicing
    byte_offsets: Vec<usize>,
    /// Per-sentence positions into `tokens`, built on first query
    sentence_index: OnceLock<Vec<Vec<usize>>>,
}

impl Document {
    /// Tokenize `text` and align the result with default settings
    pub fn from_text(text: impl Into<String>, tokenizer: &dyn Tokenizer) -> Result<Self> {
        Self::from_text_with_config(text, tokenizer, &AlignmentConfig::default())
    }

    /// Tokenize `text` with `tokenizer` and align with `config`
    pub fn from_text_with_config(
        text: impl Into<String>,
        tokenizer: &dyn Tokenizer,
        config: &AlignmentConfig,
    ) -> Result<Self> {
        let text = text.into();
        let tagged = tokenizer.tag_tokens(&text).context("Tokenizer failed")?;
        let sentences = tokenizer
            .split_sentences(&text)
            .context("Sentence splitter failed")?;
        Self::from_parts(text, tagged, sentences, config)
    }

    /// Build a document from already tokenized output
    ///
    /// Fragments that cannot be placed are dropped; a recovered span that would
    /// start before the text aborts construction.
    pub fn from_parts(
        text: impl Into<String>,
        tagged: Vec<TaggedToken>,
        sentences: Vec<String>,
        config: &AlignmentConfig,
    ) -> Result<Self> {
        let text = text.into();
        let id = DocumentId::next();
        let token_count = tagged.len();
        let sentence_count = sentences.len();

        let index = CharIndex::new(&text);
        let tokens: Vec<Token> = align_tokens(&index, tagged, config)?
            .into_iter()
            .map(|aligned| {
                let TaggedToken { surface, pos_tag } = aligned.fragment;
                let shape = classify(&surface);
                Token::new(id, aligned.span, pos_tag, shape, surface).with_recovered(aligned.recovered)
            })
            .collect();
        let sentences: Vec<Sentence> = align_sentences(&index, sentences, config)?
            .into_iter()
            .map(|aligned| Sentence::new(id, aligned.span).with_recovered(aligned.recovered))
            .collect();
        let byte_offsets = index.into_offsets();

        debug!(
            document = %id,
            tokens = tokens.len(),
            dropped_tokens = token_count.saturating_sub(tokens.len()),
            sentences = sentences.len(),
            dropped_sentences = sentence_count.saturating_sub(sentences.len()),
            recovered_tokens = tokens.iter().filter(|t| t.recovered()).count(),
            "Aligned document"
        );

        Ok(Self {
            id,
            text,
            tokens,
            sentences,
            rating: None,
            byte_offsets,
            sentence_index: OnceLock::new(),
        })
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn rating(&self) -> Option<f64> {
        self.rating
    }

    /// Assign the label; a document's rating can be set only once
    pub fn set_rating(&mut self, rating: f64) -> Result<()> {
        if let Some(existing) = self.rating {
            bail!("Rating of {} already set to {existing}", self.id);
        }
        self.rating = Some(rating);
        Ok(())
    }

    /// Raw text covered by `span`, in character offsets
    pub fn slice<S: Spanned + ?Sized>(&self, span: &S) -> &str {
        CharIndex::with_offsets(&self.text, &self.byte_offsets).slice(span.interval())
    }

    /// Token positions overlapping each sentence, in token order
    pub fn sentence_token_indices(&self) -> &[Vec<usize>] {
        self.sentence_index.get_or_init(|| {
            self.sentences
                .iter()
                .map(|sentence| {
                    self.tokens
                        .iter()
                        .enumerate()
                        .filter(|(_, token)| sentence.overlaps(*token))
                        .map(|(position, _)| position)
                        .collect()
                })
                .collect()
        })
    }

    /// Tokens of the sentence at `sentence`, or `None` when out of range
    pub fn sentence_tokens(&self, sentence: usize) -> Option<Vec<&Token>> {
        self.sentence_token_indices()
            .get(sentence)
            .map(|positions| positions.iter().map(|&position| &self.tokens[position]).collect())
    }

    /// Serializable view for downstream consumers
    pub fn to_record(&self) -> DocumentRecord<'_> {
        DocumentRecord {
            id: self.id,
            text: &self.text,
            rating: self.rating,
            tokens: &self.tokens,
            sentences: self
                .sentences
                .iter()
                .zip(self.sentence_token_indices())
                .map(|(sentence, tokens)| SentenceRecord {
                    span: sentence.interval(),
                    tokens,
                })
                .collect(),
        }
    }
}

/// JSON shape of a document
#[derive(Debug, Serialize)]
pub struct DocumentRecord<'a> {
    pub id: DocumentId,
    pub text: &'a str,
    pub rating: Option<f64>,
    pub tokens: &'a [Token],
    pub sentences: Vec<SentenceRecord<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SentenceRecord<'a> {
    #[serde(flatten)]
    pub span: Interval,
    /// Positions into the document's token list
    pub tokens: &'a [usize],
}
