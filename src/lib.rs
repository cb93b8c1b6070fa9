pub mod alignment;
pub mod discovery;
pub mod document;
pub mod interval;
pub mod output;
pub mod reader;
pub mod shape;
pub mod span;
pub mod tables;
pub mod tokenizer;

// Re-export main types for convenient access
pub use alignment::{AlignmentConfig, OPEN_QUOTE_MARKER};
pub use document::{Document, DocumentRecord};
pub use interval::{Interval, Spanned};
pub use shape::{classify, ShapeCategory};
pub use span::{DocumentId, Sentence, Token};
pub use tokenizer::{RegexTokenizer, TaggedToken, Tokenizer};

// Re-export loading and output types for the CLI and benchmarks
pub use discovery::{resolve_inputs, DiscoveryConfig};
pub use output::{write_documents, write_stats, FileStats, OutputMode, RunStats};
pub use reader::{parse_record, LoadStats, LoaderConfig, ReviewLoader, ReviewRecord};
pub use tables::{encode_document, pos_index, rating_label, EncodedDocument, POS_TAGS};
