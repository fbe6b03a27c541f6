//! recall-graph: Knowledge graph manager.
//!
//! This crate is the single mutation point for the knowledge graph. Every
//! operation loads the graph fresh from its store, works on it in memory,
//! and (for writes) saves it back in full. The manager serializes all
//! operations against one store so concurrent callers never lose updates.

pub mod error;
pub mod manager;
pub mod mutations;
pub mod queries;

pub use error::GraphError;
pub use manager::KnowledgeGraphManager;
