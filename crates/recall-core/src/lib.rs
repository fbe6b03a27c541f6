//! recall-core: Shared types, configuration, and error handling for the recall knowledge graph.
//!
//! This crate provides the foundational types used across all recall components:
//! - Entities, relations, and the graph that holds them
//! - Observation batch inputs and results
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::MemoryConfig;
pub use error::RecallError;
pub use types::{
    Entity, KnowledgeGraph, ObservationDeletion, ObservationInput, ObservationResult, Relation,
};
