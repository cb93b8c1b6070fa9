use anyhow::{bail, Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::alignment::AlignmentConfig;
use crate::document::Document;
use crate::tokenizer::Tokenizer;

/// Configuration for review loading behavior
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Skip lines that are not valid JSON instead of failing the whole load
    pub skip_malformed: bool,
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
    /// Maximum number of documents built concurrently
    pub concurrency: usize,
    /// Search windows used while aligning each document
    pub alignment: AlignmentConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            skip_malformed: false,
            buffer_size: 8192, // WHY: 8KB is optimal for most filesystems and network storage
            concurrency: num_cpus::get(),
            alignment: AlignmentConfig::default(),
        }
    }
}

/// One review line: `{"reviewText": ..., "overall": ...}`; other fields are ignored
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReviewRecord {
    #[serde(rename = "reviewText", default)]
    pub review_text: Option<String>,
    /// Kept loose: any falsy value means "unrated", whatever its JSON type
    #[serde(default)]
    pub overall: Option<Value>,
}

impl ReviewRecord {
    /// Text and rating when both are present and truthy
    ///
    /// Falsy ratings (`null`, `false`, `0`, `""`, `[]`, `{}`) mark the record
    /// unusable. A truthy rating that is not numeric is an error.
    pub fn usable(self) -> Result<Option<(String, f64)>> {
        let Some(text) = self.review_text.filter(|text| !text.is_empty()) else {
            return Ok(None);
        };
        let rating = match self.overall {
            None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(None),
            Some(Value::Bool(true)) => 1.0,
            Some(Value::Number(number)) => number
                .as_f64()
                .with_context(|| format!("Rating {number} is not representable as f64"))?,
            Some(Value::String(rating)) if rating.is_empty() => return Ok(None),
            Some(Value::String(rating)) => rating
                .trim()
                .parse::<f64>()
                .with_context(|| format!("Rating {rating:?} is not a number"))?,
            Some(Value::Array(items)) if items.is_empty() => return Ok(None),
            Some(Value::Object(fields)) if fields.is_empty() => return Ok(None),
            Some(other) => bail!("Rating {other} is not a number"),
        };
        Ok((rating != 0.0).then_some((text, rating)))
    }
}

/// Parse one JSON line; `Ok(None)` for records without usable text and rating
pub fn parse_record(line: &str) -> Result<Option<(String, f64)>> {
    let record: ReviewRecord = serde_json::from_str(line)?;
    record.usable()
}

/// Statistics for one load operation
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LoadStats {
    pub lines_read: u64,
    pub bytes_read: u64,
    pub documents: u64,
    pub skipped_empty: u64,
    pub malformed: u64,
    pub tokens: u64,
    pub sentences: u64,
    pub duration_ms: u64,
}

/// Builds Documents from JSON-lines review files, many documents at a time
pub struct ReviewLoader {
    tokenizer: Arc<dyn Tokenizer>,
    config: LoaderConfig,
}

impl ReviewLoader {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, config: LoaderConfig) -> Self {
        Self { tokenizer, config }
    }

    /// Load documents from in-memory JSON lines
    pub async fn load_str(&self, content: &str) -> Result<(Vec<Document>, LoadStats)> {
        let start_time = std::time::Instant::now();
        let mut stats = LoadStats {
            bytes_read: content.len() as u64,
            ..Default::default()
        };
        let lines: Vec<String> = content.lines().map(str::to_string).collect();
        stats.lines_read = lines.len() as u64;

        let documents = self.build_documents(lines, &mut stats).await?;
        stats.duration_ms = start_time.elapsed().as_millis() as u64;
        Ok((documents, stats))
    }

    /// Read a JSON-lines file line-by-line with async buffered I/O and build its documents
    pub async fn load_file<P: AsRef<Path>>(&self, file_path: P) -> Result<(Vec<Document>, LoadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting async read of file: {}", path.display());

        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open file {}", path.display()))?;

        // WHY: BufReader with custom buffer size reduces syscalls and improves throughput
        let reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut lines = reader.lines();
        let mut result_lines = Vec::new();
        let mut stats = LoadStats::default();

        while let Some(line) = lines
            .next_line()
            .await
            .with_context(|| format!("UTF-8 decoding error in {} at line {}", path.display(), stats.lines_read + 1))?
        {
            stats.bytes_read += line.len() as u64 + 1; // +1 for newline
            stats.lines_read += 1;
            result_lines.push(line);
        }

        let documents = self
            .build_documents(result_lines, &mut stats)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?;
        stats.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Loaded {}: {} documents from {} lines in {}ms",
            path.display(),
            stats.documents,
            stats.lines_read,
            stats.duration_ms
        );
        Ok((documents, stats))
    }

    /// Memory-map a JSON-lines file and build its documents
    pub async fn load_file_mmap<P: AsRef<Path>>(&self, file_path: P) -> Result<(Vec<Document>, LoadStats)> {
        let path = file_path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open file {}", path.display()))?;
        // SAFETY: the mapping is read-only and dropped before this function returns
        let mmap = unsafe { memmap2::Mmap::map(&file) }
            .with_context(|| format!("Failed to memory-map {}", path.display()))?;
        let content = std::str::from_utf8(&mmap)
            .with_context(|| format!("UTF-8 decoding error in {}", path.display()))?;

        let (documents, stats) = self
            .load_str(content)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?;
        info!(
            "Loaded {} via mmap: {} documents from {} lines in {}ms",
            path.display(),
            stats.documents,
            stats.lines_read,
            stats.duration_ms
        );
        Ok((documents, stats))
    }

    /// Parse records in order, then align documents concurrently on the blocking pool
    ///
    /// Output order follows input line order; lines without usable text or
    /// rating are filtered out. A line that fails to parse or to build a
    /// document aborts the load, unless `skip_malformed` is set.
    async fn build_documents(&self, lines: Vec<String>, stats: &mut LoadStats) -> Result<Vec<Document>> {
        let mut records = Vec::with_capacity(lines.len());

        for (line_index, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_record(line) {
                Ok(Some((text, rating))) => records.push((line_index + 1, text, rating)),
                Ok(None) => stats.skipped_empty += 1,
                Err(e) if self.config.skip_malformed => {
                    warn!("Skipping malformed record at line {}: {}", line_index + 1, e);
                    stats.malformed += 1;
                }
                Err(e) => {
                    return Err(e.context(format!("Malformed record at line {}", line_index + 1)));
                }
            }
        }

        let alignment = Arc::new(self.config.alignment.clone());
        let skip_malformed = self.config.skip_malformed;
        let mut unbuildable = 0u64;
        let documents: Vec<Option<Document>> = stream::iter(records)
            .map(|(line_number, text, rating)| {
                let tokenizer = Arc::clone(&self.tokenizer);
                let alignment = Arc::clone(&alignment);
                let task = tokio::task::spawn_blocking(move || -> Result<Document> {
                    let mut document = Document::from_text_with_config(text, tokenizer.as_ref(), &alignment)?;
                    document.set_rating(rating)?;
                    Ok(document)
                });
                async move {
                    let built = match task.await {
                        Ok(built) => built,
                        Err(e) => Err(anyhow::Error::new(e).context("Document construction task failed")),
                    };
                    (line_number, built)
                }
            })
            // WHY: buffered (not buffer_unordered) keeps documents in input order
            .buffered(self.config.concurrency.max(1))
            .map(|(line_number, built)| match built {
                Ok(document) => Ok(Some(document)),
                Err(e) if skip_malformed => {
                    warn!("Skipping unbuildable document at line {}: {:#}", line_number, e);
                    unbuildable += 1;
                    Ok(None)
                }
                Err(e) => Err(e.context(format!("Failed to build document at line {line_number}"))),
            })
            .try_collect()
            .await?;
        let documents: Vec<Document> = documents.into_iter().flatten().collect();

        stats.malformed += unbuildable;
        stats.documents += documents.len() as u64;
        stats.tokens += documents.iter().map(|d| d.tokens().len() as u64).sum::<u64>();
        stats.sentences += documents.iter().map(|d| d.sentences().len() as u64).sum::<u64>();
        Ok(documents)
    }
}
