//! recall-store: Persistence for the recall knowledge graph.
//!
//! The whole graph lives in one newline-delimited JSON file. Each line is a
//! record tagged by `type`:
//!
//! ```text
//! {"type":"entity","name":"Alice","entityType":"person","observations":["likes tea"]}
//! {"type":"relation","from":"Alice","to":"Bob","relationType":"knows"}
//! ```
//!
//! Stores hold no graph state between calls: every `load` reads the file and
//! every `save` regenerates it in full.

pub mod jsonl;
pub mod record;

use std::future::Future;
use std::path::PathBuf;

use recall_core::KnowledgeGraph;

pub use jsonl::JsonlGraphStore;
pub use record::Record;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record at {path}:{line}: {source}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Trait for knowledge graph persistence backends.
pub trait GraphStore: Send + Sync {
    /// Read the full graph. A store that has never been written yields an empty graph.
    fn load(&self) -> impl Future<Output = Result<KnowledgeGraph, StoreError>> + Send;

    /// Replace the stored graph with `graph`.
    fn save(&self, graph: &KnowledgeGraph) -> impl Future<Output = Result<(), StoreError>> + Send;
}
