// WHY: output writing is shared by the CLI and benchmarks; documents stream out as
// JSON lines through an async buffered writer, run statistics land in one JSON file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::document::Document;
use crate::reader::LoadStats;
use crate::tables::encode_document;

/// What each output line carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Text, rating, token spans and sentence spans
    #[default]
    Spans,
    /// POS indices, shape indices and rating label
    Encoded,
}

/// Per-input statistics
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FileStats {
    /// Input file path as given or matched
    pub path: String,
    #[serde(flatten)]
    pub load: LoadStats,
    /// Throughput in documents per second
    pub documents_per_sec: f64,
    /// Processing status (success, failed)
    pub status: String,
    /// Error message if processing failed
    pub error: Option<String>,
}

impl FileStats {
    pub fn success(path: &Path, load: LoadStats) -> Self {
        let documents_per_sec = if load.duration_ms > 0 {
            load.documents as f64 * 1000.0 / load.duration_ms as f64
        } else {
            0.0
        };
        Self {
            path: path.display().to_string(),
            load,
            documents_per_sec,
            status: "success".to_string(),
            error: None,
        }
    }

    pub fn failed(path: &Path, error: &anyhow::Error) -> Self {
        Self {
            path: path.display().to_string(),
            load: LoadStats::default(),
            documents_per_sec: 0.0,
            status: "failed".to_string(),
            error: Some(format!("{error:#}")),
        }
    }
}

/// Aggregate statistics for one CLI run
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    /// Seconds since the Unix epoch when the run began
    pub run_start: u64,
    pub total_processing_time_ms: u64,
    pub files_processed: u64,
    pub files_failed: u64,
    pub total_documents: u64,
    pub total_tokens: u64,
    pub total_sentences: u64,
    pub files: Vec<FileStats>,
}

impl RunStats {
    pub fn started_now() -> Self {
        Self {
            run_start: std::time::SystemTime::now()
                .duration_since(std::time::SystemTime::UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or(0),
            ..Default::default()
        }
    }

    pub fn record(&mut self, file: FileStats) {
        if file.error.is_some() {
            self.files_failed += 1;
        } else {
            self.files_processed += 1;
        }
        self.total_documents += file.load.documents;
        self.total_tokens += file.load.tokens;
        self.total_sentences += file.load.sentences;
        self.files.push(file);
    }
}

/// Write one JSON object per document, each followed by a newline
pub async fn write_documents<W>(writer: &mut BufWriter<W>, documents: &[Document], mode: OutputMode) -> Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    for document in documents {
        let line = match mode {
            OutputMode::Spans => serde_json::to_string(&document.to_record())?,
            OutputMode::Encoded => serde_json::to_string(&encode_document(document))?,
        };
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        written += 1;
    }
    Ok(written)
}

/// Serialize run statistics to a pretty-printed JSON file
pub async fn write_stats(stats_path: &Path, stats: &RunStats) -> Result<()> {
    let json = serde_json::to_string_pretty(stats)?;
    tokio::fs::write(stats_path, json)
        .await
        .with_context(|| format!("Failed to write stats to {}", stats_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::RegexTokenizer;
    use tempfile::TempDir;

    fn rated(text: &str, rating: f64) -> Document {
        let tokenizer = RegexTokenizer::new().unwrap();
        let mut document = Document::from_text(text, &tokenizer).unwrap();
        document.set_rating(rating).unwrap();
        document
    }

    #[tokio::test]
    async fn test_write_span_lines() {
        let documents = vec![rated("Hello world !", 5.0), rated("Bad. Very bad.", 1.0)];
        let mut writer = BufWriter::new(Vec::new());
        let written = write_documents(&mut writer, &documents, OutputMode::Spans).await.unwrap();
        writer.flush().await.unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = output.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(written, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["text"], "Hello world !");
        assert_eq!(lines[0]["tokens"][0]["surface_text"], "Hello");
        assert_eq!(lines[1]["sentences"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_write_encoded_lines() {
        let documents = vec![rated("Hello world !", 2.0)];
        let mut writer = BufWriter::new(Vec::new());
        write_documents(&mut writer, &documents, OutputMode::Encoded).await.unwrap();
        writer.flush().await.unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let line: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(line["label"], 0);
        assert_eq!(line["shapes"], serde_json::json!([4, 5, 2]));
    }

    #[tokio::test]
    async fn test_stats_round_trip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let stats_path = temp_dir.path().join("run_stats.json");

        let mut stats = RunStats::default();
        let load = LoadStats { documents: 2, tokens: 8, sentences: 2, duration_ms: 4, ..Default::default() };
        stats.record(FileStats::success(Path::new("reviews.json"), load));
        stats.record(FileStats::failed(Path::new("broken.json"), &anyhow::anyhow!("Malformed record at line 3")));
        write_stats(&stats_path, &stats).await.unwrap();

        let reloaded: RunStats = serde_json::from_str(&std::fs::read_to_string(&stats_path).unwrap()).unwrap();
        assert_eq!(reloaded.files_processed, 1);
        assert_eq!(reloaded.files_failed, 1);
        assert_eq!(reloaded.total_documents, 2);
        assert_eq!(reloaded.files[0].documents_per_sec, 500.0);
        assert_eq!(reloaded.files[1].status, "failed");
    }
}
