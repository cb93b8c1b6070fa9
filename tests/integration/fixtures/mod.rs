// Test fixtures with known review texts and expected alignments
// WHY: Golden-file testing requires deterministic input/output pairs for validation

/// Two usable reviews, one per line
pub const SIMPLE_REVIEWS: &str = r#"{"reviewText":"Doudoux le doux !","overall":5}
{"reviewText":"Flo le deglingo !","overall":4}
"#;

/// Usable reviews mixed with empty fields, extra fields and blank lines
pub const MIXED_REVIEWS: &str = r#"{"reviewerID":"A1","asin":"B0001","reviewText":"Great product. Works fine.","overall":5.0,"summary":"Great"}
{"reviewText":"","overall":3}

{"reviewText":"Not rated at all","overall":0}
{"reviewerID":"A2","overall":2}
{"reviewText":"Broke after a week.","overall":1.0}
"#;

/// One good line followed by a truncated one
pub const MALFORMED_REVIEWS: &str = r#"{"reviewText":"Fine.","overall":4}
{"reviewText":"Truncated
"#;

/// Raw text with a line break between sentences
pub const MULTILINE_TEXT: &str = "Hello world !\n    I'm Thomas, nice to meet you.";

/// Expected token alignment for MULTILINE_TEXT
/// Format: index<TAB>surface<TAB>shape<TAB>(start,end)
pub const MULTILINE_TOKENS_EXPECTED: &str = "0\tHello\t1ST-CAP\t(0,5)
1\tworld\tLOWER\t(6,11)
2\t!\tSPECIAL\t(12,13)
3\tI\tALL-CAPS\t(18,19)
4\t'm\tMISC\t(19,21)
5\tThomas\t1ST-CAP\t(22,28)
6\t,\tSPECIAL\t(28,29)
7\tnice\tLOWER\t(30,34)
8\tto\tLOWER\t(35,37)
9\tmeet\tLOWER\t(38,42)
10\tyou\tLOWER\t(43,46)
11\t.\tSPECIAL\t(46,47)";

/// Expected sentence alignment for MULTILINE_TEXT
/// Format: index<TAB>raw slice<TAB>(start,end)
pub const MULTILINE_SENTENCES_EXPECTED: &str = "0\tHello world !\t(0,13)
1\tI'm Thomas, nice to meet you.\t(18,47)";

/// Text whose opening quote is rewritten by the tokenizer
pub const QUOTED_TEXT: &str = "He said \"great\" twice.";

/// Build a review line for ad-hoc fixtures
pub fn review_line(text: &str, rating: f64) -> String {
    serde_json::json!({ "reviewText": text, "overall": rating }).to_string()
}

/// Generate a large JSON-lines corpus for order and throughput tests
pub fn generate_large_reviews(count: usize) -> String {
    (0..count)
        .map(|i| {
            let rating = (i % 5 + 1) as f64;
            review_line(&format!("Review {i} says it works. Rated {rating} overall."), rating) + "\n"
        })
        .collect()
}
