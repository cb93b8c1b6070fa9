// WHY: tokenizer output is normalized text without offsets; this module places each
// fragment back onto the raw text with a bounded forward search and one-step recovery
//
// All positions are character offsets. The search cursor advances by the length of
// each located fragment, so it tracks consumed length rather than the true text position.

use std::borrow::Cow;

use anyhow::{Context, Result};
use tracing::{debug, trace};

use crate::interval::Interval;
use crate::tokenizer::TaggedToken;

/// Tokenizer rendering of an opening double quote
pub const OPEN_QUOTE_MARKER: &str = "``";

/// Search window and recovery settings for the two alignment passes
#[derive(Debug, Clone)]
pub struct AlignmentConfig {
    /// Minimum forward window for token searches
    pub token_window: usize,
    /// Minimum forward window for sentence searches
    pub sentence_window: usize,
    /// Surface form that stands for a one-character opening quote
    pub open_quote_marker: String,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            token_window: 50,
            sentence_window: 500,
            open_quote_marker: OPEN_QUOTE_MARKER.to_string(),
        }
    }
}

/// A fragment placed on the raw text
#[derive(Debug, Clone, PartialEq)]
pub struct Aligned<T> {
    pub span: Interval,
    pub fragment: T,
    /// Span came from the recovery heuristic rather than an exact match
    pub recovered: bool,
}

/// Character-offset view of a text for bounded substring search
pub struct CharIndex<'a> {
    text: &'a str,
    /// Byte offset of every char, plus `text.len()` as a sentinel
    byte_offsets: Cow<'a, [usize]>,
}

impl<'a> CharIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut byte_offsets: Vec<usize> = text.char_indices().map(|(byte, _)| byte).collect();
        byte_offsets.push(text.len());
        Self { text, byte_offsets: Cow::Owned(byte_offsets) }
    }

    /// Reuse a table previously taken from `into_offsets` on the same text
    pub fn with_offsets(text: &'a str, byte_offsets: &'a [usize]) -> Self {
        debug_assert_eq!(byte_offsets.last(), Some(&text.len()));
        Self { text, byte_offsets: Cow::Borrowed(byte_offsets) }
    }

    /// Give up the offset table so it can outlive this view
    pub fn into_offsets(self) -> Vec<usize> {
        self.byte_offsets.into_owned()
    }

    /// Number of chars in the text
    pub fn char_len(&self) -> usize {
        self.byte_offsets.len() - 1
    }

    fn byte_at(&self, char_pos: usize) -> usize {
        self.byte_offsets[char_pos.min(self.char_len())]
    }

    fn char_at_byte(&self, byte: usize) -> usize {
        // Match starts always fall on char boundaries
        self.byte_offsets.partition_point(|&offset| offset < byte)
    }

    /// First occurrence of `needle` lying entirely inside chars `[start, end)`
    ///
    /// `end` is clamped to the text length; a `start` beyond the text finds nothing.
    pub fn find_within(&self, needle: &str, start: usize, end: usize) -> Option<usize> {
        let end = end.min(self.char_len());
        if start > end {
            return None;
        }
        let window_start = self.byte_at(start);
        let window = &self.text[window_start..self.byte_at(end)];
        window
            .find(needle)
            .map(|found| self.char_at_byte(window_start + found))
    }

    /// Raw text covered by `span`
    pub fn slice(&self, span: Interval) -> &'a str {
        &self.text[self.byte_at(span.start())..self.byte_at(span.end())]
    }
}

/// Best-effort span for a token that was never located
///
/// Assumes the missing token sits right before the next located token at
/// `next_start`, with its span ending at `next_start - 1`. Its length is 1 for
/// the open-quote marker and the surface length otherwise. A span that would
/// start before the text is an error and aborts the enclosing construction.
pub fn recover_token_span(pending_surface: &str, next_start: usize, open_quote_marker: &str) -> Result<Interval> {
    let len = if pending_surface == open_quote_marker {
        1
    } else {
        pending_surface.chars().count()
    };
    let end = next_start as i64 - 1;
    Interval::try_from_signed(end - len as i64, end)
        .with_context(|| format!("Cannot recover token {pending_surface:?} before offset {next_start}"))
}

/// Best-effort span for a sentence that was never located: `[next_start - len, next_start)`
pub fn recover_sentence_span(pending_sentence: &str, next_start: usize) -> Result<Interval> {
    let end = next_start as i64;
    Interval::try_from_signed(end - pending_sentence.chars().count() as i64, end)
        .with_context(|| format!("Cannot recover sentence {pending_sentence:?} before offset {next_start}"))
}

/// Two-phase bounded search shared by the token and sentence passes
///
/// Each fragment is searched within `[cursor, cursor + max(window_floor, len))`.
/// A fragment that is not found becomes pending (replacing any earlier pending
/// one) and is emitted through `recover` just before the next located fragment.
/// A fragment still pending at the end is dropped; a failed recovery is an error.
pub fn align_fragments<T, S, R>(
    index: &CharIndex<'_>,
    fragments: Vec<T>,
    window_floor: usize,
    surface: S,
    recover: R,
) -> Result<Vec<Aligned<T>>>
where
    S: Fn(&T) -> &str,
    R: Fn(&T, usize) -> Result<Interval>,
{
    let mut cursor = 0usize;
    let mut pending: Option<T> = None;
    let mut aligned = Vec::with_capacity(fragments.len());

    for fragment in fragments {
        let needle = surface(&fragment);
        let needle_len = needle.chars().count();
        let window_end = cursor.saturating_add(window_floor.max(needle_len));

        let Some(found) = index.find_within(needle, cursor, window_end) else {
            trace!(fragment = needle, cursor, "Fragment not found in search window");
            if let Some(replaced) = pending.replace(fragment) {
                debug!(fragment = surface(&replaced), "Dropping unresolved fragment replaced by a newer one");
            }
            continue;
        };

        if let Some(missing) = pending.take() {
            let span = recover(&missing, found)?;
            trace!(fragment = surface(&missing), %span, "Recovered unresolved fragment");
            aligned.push(Aligned { span, fragment: missing, recovered: true });
        }

        let span = Interval::new(found, found + needle_len)?;
        aligned.push(Aligned { span, fragment, recovered: false });
        cursor += needle_len;
    }

    if let Some(missing) = pending {
        debug!(fragment = surface(&missing), "Dropping fragment still unresolved at end of input");
    }

    Ok(aligned)
}

/// Place tagged tokens on the raw text
pub fn align_tokens(
    index: &CharIndex<'_>,
    tokens: Vec<TaggedToken>,
    config: &AlignmentConfig,
) -> Result<Vec<Aligned<TaggedToken>>> {
    align_fragments(
        index,
        tokens,
        config.token_window,
        |token: &TaggedToken| token.surface.as_str(),
        |token: &TaggedToken, next_start| {
            recover_token_span(&token.surface, next_start, &config.open_quote_marker)
        },
    )
}

/// Place sentence substrings on the raw text
pub fn align_sentences(
    index: &CharIndex<'_>,
    sentences: Vec<String>,
    config: &AlignmentConfig,
) -> Result<Vec<Aligned<String>>> {
    align_fragments(
        index,
        sentences,
        config.sentence_window,
        |sentence: &String| sentence.as_str(),
        |sentence: &String, next_start| recover_sentence_span(sentence, next_start),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(pairs: &[(&str, &str)]) -> Vec<TaggedToken> {
        pairs.iter().map(|&(surface, tag)| TaggedToken::new(surface, tag)).collect()
    }

    fn spans<T>(aligned: &[Aligned<T>]) -> Vec<(usize, usize)> {
        aligned.iter().map(|a| (a.span.start(), a.span.end())).collect()
    }

    #[test]
    fn test_find_within_respects_window() {
        let index = CharIndex::new("abc abc abc");
        assert_eq!(index.find_within("abc", 0, 50), Some(0));
        assert_eq!(index.find_within("abc", 1, 50), Some(4));
        // Match must fit entirely inside the window
        assert_eq!(index.find_within("abc", 1, 6), None);
        assert_eq!(index.find_within("abc", 1, 7), Some(4));
        assert_eq!(index.find_within("abc", 20, 70), None);
        assert_eq!(index.find_within("", 11, 20), Some(11));
    }

    #[test]
    fn test_find_within_uses_char_offsets() {
        let index = CharIndex::new("déjà vu, très bien");
        assert_eq!(index.char_len(), 18);
        assert_eq!(index.find_within("vu", 0, 50), Some(5));
        assert_eq!(index.find_within("bien", 0, 50), Some(14));
        let span = Interval::new(9, 13).unwrap();
        assert_eq!(index.slice(span), "très");
    }

    #[test]
    fn test_simple_token_alignment() {
        let index = CharIndex::new("Hello world !");
        let aligned = align_tokens(
            &index,
            tagged(&[("Hello", "NNP"), ("world", "NN"), ("!", ".")]),
            &AlignmentConfig::default(),
        )
        .unwrap();
        assert_eq!(spans(&aligned), vec![(0, 5), (6, 11), (12, 13)]);
        assert!(aligned.iter().all(|a| !a.recovered));
    }

    #[test]
    fn test_open_quote_recovered_as_single_char() {
        let index = CharIndex::new("He said \"Hi\" twice");
        let aligned = align_tokens(
            &index,
            tagged(&[("He", "PRP"), ("said", "VBD"), ("``", "``"), ("Hi", "UH"), ("''", "''"), ("twice", "RB")]),
            &AlignmentConfig::default(),
        )
        .unwrap();

        let surfaces: Vec<&str> = aligned.iter().map(|a| a.fragment.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["He", "said", "``", "Hi", "''", "twice"]);
        // Opening quote is one char wide and ends one char before "Hi" at 9
        assert_eq!((aligned[2].span.start(), aligned[2].span.end()), (7, 8));
        assert!(aligned[2].recovered);
        assert_eq!((aligned[3].span.start(), aligned[3].span.end()), (9, 11));
        // Closing marker has surface length 2 and ends one char before "twice" at 13
        assert_eq!((aligned[4].span.start(), aligned[4].span.end()), (10, 12));
        assert!(aligned[4].recovered);
    }

    #[test]
    fn test_unresolved_token_dropped_at_end() {
        let index = CharIndex::new("Hello world");
        let aligned = align_tokens(
            &index,
            tagged(&[("Hello", "UH"), ("world", "NN"), ("zzz", "NN")]),
            &AlignmentConfig::default(),
        )
        .unwrap();
        assert_eq!(spans(&aligned), vec![(0, 5), (6, 11)]);
    }

    #[test]
    fn test_pending_slot_keeps_only_latest() {
        let index = CharIndex::new("one two three");
        let aligned = align_tokens(
            &index,
            tagged(&[("one", "CD"), ("xx", "NN"), ("yyy", "NN"), ("three", "CD")]),
            &AlignmentConfig::default(),
        )
        .unwrap();
        let surfaces: Vec<&str> = aligned.iter().map(|a| a.fragment.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["one", "yyy", "three"]);
        // "yyy" ends one char before "three" at 8
        assert_eq!((aligned[1].span.start(), aligned[1].span.end()), (4, 7));
        assert_eq!(index.slice(aligned[1].span), "two");
    }

    #[test]
    fn test_cursor_tracks_consumed_length() {
        // Cursor after "a" is 1, so the second "a" is searched from offset 1
        let index = CharIndex::new("a   a");
        let aligned = align_tokens(
            &index,
            tagged(&[("a", "DT"), ("a", "DT")]),
            &AlignmentConfig::default(),
        )
        .unwrap();
        assert_eq!(spans(&aligned), vec![(0, 1), (4, 5)]);
    }

    #[test]
    fn test_bounded_window_skips_distant_match() {
        let text = format!("start {}target", " ".repeat(60));
        let index = CharIndex::new(&text);
        let aligned = align_tokens(
            &index,
            tagged(&[("start", "NN"), ("target", "NN")]),
            &AlignmentConfig::default(),
        )
        .unwrap();
        assert_eq!(spans(&aligned), vec![(0, 5)]);
    }

    #[test]
    fn test_recovery_span_arithmetic() {
        assert_eq!(recover_token_span("``", 2, OPEN_QUOTE_MARKER).unwrap(), Interval::new(0, 1).unwrap());
        assert_eq!(recover_token_span("abc", 10, OPEN_QUOTE_MARKER).unwrap(), Interval::new(6, 9).unwrap());
        // Length counts chars, not bytes
        assert_eq!(recover_token_span("été", 5, OPEN_QUOTE_MARKER).unwrap(), Interval::new(1, 4).unwrap());
        assert_eq!(recover_sentence_span("Two words.", 25).unwrap(), Interval::new(15, 25).unwrap());
    }

    #[test]
    fn test_recovery_before_text_start_is_an_error() {
        assert!(recover_token_span("``", 0, OPEN_QUOTE_MARKER).is_err());
        assert!(recover_token_span("``", 1, OPEN_QUOTE_MARKER).is_err());
        assert!(recover_token_span("abc", 2, OPEN_QUOTE_MARKER).is_err());
        assert!(recover_sentence_span("Two words.", 5).is_err());
    }

    #[test]
    fn test_failed_recovery_aborts_alignment() {
        // "xyz" is never found; "A" sits at 0, so the recovered span would start at -4
        let index = CharIndex::new("A b");
        let err = align_tokens(&index, tagged(&[("xyz", "NN"), ("A", "DT")]), &AlignmentConfig::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("xyz"));
    }

    #[test]
    fn test_borrowed_offsets_slice_like_owned() {
        let text = "naïve café";
        let offsets = CharIndex::new(text).into_offsets();
        let index = CharIndex::with_offsets(text, &offsets);
        assert_eq!(index.char_len(), 10);
        assert_eq!(index.slice(Interval::new(6, 10).unwrap()), "café");
        assert_eq!(index.find_within("café", 0, 50), Some(6));
    }

    #[test]
    fn test_sentence_alignment_with_newline_recovery() {
        let text = "First one here.\nSecond\nline here. Third.";
        let index = CharIndex::new(text);
        let sentences = vec![
            "First one here.".to_string(),
            "Second line here.".to_string(),
            "Third.".to_string(),
        ];
        let aligned = align_sentences(&index, sentences, &AlignmentConfig::default()).unwrap();
        // Recovered span is the 17 chars before "Third.", one off from the raw sentence
        assert_eq!(spans(&aligned), vec![(0, 15), (17, 34), (34, 40)]);
        assert!(aligned[1].recovered);
        assert_eq!(index.slice(aligned[2].span), "Third.");
    }
}
