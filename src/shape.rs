// WHY: shape categories are evaluated as ordered, anchored patterns; first match wins

use anyhow::{anyhow, Result};
use regex_automata::meta::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Surface-form category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeCategory {
    #[serde(rename = "NL")]
    Newline,
    #[serde(rename = "NUMBER")]
    Number,
    #[serde(rename = "SPECIAL")]
    Special,
    #[serde(rename = "ALL-CAPS")]
    AllCaps,
    #[serde(rename = "1ST-CAP")]
    FirstCap,
    #[serde(rename = "LOWER")]
    Lower,
    #[serde(rename = "MISC")]
    Misc,
}

impl ShapeCategory {
    /// All categories in encoder index order
    pub const ALL: [ShapeCategory; 7] = [
        ShapeCategory::Newline,
        ShapeCategory::Number,
        ShapeCategory::Special,
        ShapeCategory::AllCaps,
        ShapeCategory::FirstCap,
        ShapeCategory::Lower,
        ShapeCategory::Misc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeCategory::Newline => "NL",
            ShapeCategory::Number => "NUMBER",
            ShapeCategory::Special => "SPECIAL",
            ShapeCategory::AllCaps => "ALL-CAPS",
            ShapeCategory::FirstCap => "1ST-CAP",
            ShapeCategory::Lower => "LOWER",
            ShapeCategory::Misc => "MISC",
        }
    }

    /// Position in the encoder's shape table
    pub fn index(&self) -> u8 {
        match self {
            ShapeCategory::Newline => 0,
            ShapeCategory::Number => 1,
            ShapeCategory::Special => 2,
            ShapeCategory::AllCaps => 3,
            ShapeCategory::FirstCap => 4,
            ShapeCategory::Lower => 5,
            ShapeCategory::Misc => 6,
        }
    }
}

impl fmt::Display for ShapeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeCategory {
    type Err = anyhow::Error;

    fn from_str(label: &str) -> Result<Self> {
        ShapeCategory::ALL
            .into_iter()
            .find(|shape| shape.as_str() == label)
            .ok_or_else(|| anyhow!("Unknown shape category: {label}"))
    }
}

/// Ordered (category, pattern) rules; MISC is the fallback and has no pattern
///
/// Letter, digit and whitespace classes are Unicode-aware.
const SHAPE_PATTERNS: &[(ShapeCategory, &str)] = &[
    (ShapeCategory::Newline, r"^\n+$"),
    (ShapeCategory::Number, r"^[\d.,]*\d[\d.,]*$"),
    (ShapeCategory::Special, r"^[^\p{L}\p{N}\s]+$"),
    (ShapeCategory::AllCaps, r"^[\p{Lu}.\-]+$"),
    (ShapeCategory::FirstCap, r"^\p{Lu}[\p{Ll}.\-]+$"),
    (ShapeCategory::Lower, r"^[\p{Ll}.\-]+$"),
];

static SHAPE_RULES: OnceLock<Vec<(ShapeCategory, Regex)>> = OnceLock::new();

fn shape_rules() -> &'static [(ShapeCategory, Regex)] {
    SHAPE_RULES.get_or_init(|| {
        SHAPE_PATTERNS
            .iter()
            .map(|&(shape, pattern)| {
                let regex = Regex::new(pattern).expect("shape patterns are valid regular expressions");
                (shape, regex)
            })
            .collect()
    })
}

/// Map a token's surface string to its shape category
pub fn classify(surface: &str) -> ShapeCategory {
    shape_rules()
        .iter()
        .find(|(_, regex)| regex.is_match(surface))
        .map(|&(shape, _)| shape)
        .unwrap_or(ShapeCategory::Misc)
}
