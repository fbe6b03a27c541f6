//! Error types for the recall-server crate.

use rmcp::model::ErrorCode;
use rmcp::ErrorData;
use thiserror::Error;

use recall_graph::GraphError;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("No arguments provided for tool: {0}")]
    MissingArguments(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for tool {tool}: {source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Graph(#[from] GraphError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DispatchError {
    /// JSON-RPC error code reported to the caller.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingArguments(_) | Self::UnknownTool(_) | Self::InvalidArguments { .. } => {
                ErrorCode::INVALID_PARAMS
            }
            Self::Graph(_) | Self::Serialization(_) => ErrorCode::INTERNAL_ERROR,
        }
    }
}

impl From<DispatchError> for ErrorData {
    fn from(err: DispatchError) -> Self {
        ErrorData::new(err.code(), err.to_string(), None)
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
