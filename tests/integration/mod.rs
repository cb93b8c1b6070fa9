// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

pub mod fixtures;

use seams_align::{Document, Spanned};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture helper for creating temporary directories with review files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Create a JSON-lines review file with given content
    pub fn create_review_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        // Create parent directories if needed
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Glob pattern matching every `.json` file under the fixture root
    pub fn json_pattern(&self) -> String {
        format!("{}/**/*.json", self.root_path.display())
    }
}

/// Token alignment in golden format: index, surface, shape, span
pub fn format_tokens(document: &Document) -> String {
    document
        .tokens()
        .iter()
        .enumerate()
        .map(|(i, token)| format!("{i}\t{}\t{}\t({},{})", token.surface_text(), token.shape(), token.start(), token.end()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sentence alignment in golden format: index, raw slice, span
pub fn format_sentences(document: &Document) -> String {
    document
        .sentences()
        .iter()
        .enumerate()
        .map(|(i, sentence)| format!("{i}\t{}\t({},{})", document.slice(sentence), sentence.start(), sentence.end()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Compare two strings line by line, providing detailed diff on mismatch
pub fn assert_golden_file(actual: &str, expected: &str, context: &str) {
    let actual_lines: Vec<&str> = actual.lines().collect();
    let expected_lines: Vec<&str> = expected.lines().collect();

    if actual_lines.len() != expected_lines.len() {
        panic!(
            "{}: Line count mismatch. Expected {} lines, got {} lines\nActual:\n{}",
            context,
            expected_lines.len(),
            actual_lines.len(),
            actual
        );
    }

    for (i, (actual_line, expected_line)) in actual_lines.iter().zip(expected_lines.iter()).enumerate() {
        if actual_line != expected_line {
            panic!(
                "{}: Line {} mismatch\nExpected: {}\nActual:   {}",
                context,
                i + 1,
                expected_line,
                actual_line
            );
        }
    }
}
