//! Error types for the recall-graph crate.

use thiserror::Error;

use recall_store::StoreError;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Entity with name {0} not found")]
    EntityNotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, GraphError>;
