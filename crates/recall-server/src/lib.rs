//! recall-server: MCP tool server for the recall knowledge graph.
//!
//! Exposes nine graph operations as tools, dispatches calls to the
//! [`KnowledgeGraphManager`](recall_graph::KnowledgeGraphManager), and
//! serves them over stdio through an rmcp session.

pub mod dispatch;
pub mod error;
pub mod handler;
pub mod rpc;
pub mod tools;

pub use dispatch::{Dispatcher, ToolOutput};
pub use error::DispatchError;
pub use handler::RecallHandler;
pub use rpc::McpServer;
