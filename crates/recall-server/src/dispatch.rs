//! Routes a tool name plus JSON arguments to the graph manager.
//!
//! Arguments are validated by deserializing into typed structs before any
//! store access. Structured results come back as pretty-printed JSON text;
//! delete operations answer with a fixed confirmation line.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use recall_core::{Entity, ObservationDeletion, ObservationInput, Relation};
use recall_graph::KnowledgeGraphManager;
use recall_store::{GraphStore, JsonlGraphStore};

use crate::error::{DispatchError, Result};
use crate::tools;

/// Text payload returned to the caller for a successful tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
}

impl ToolOutput {
    fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self {
            text: serde_json::to_string_pretty(value)?,
        })
    }

    fn message(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

// ── Tool Arguments ───────────────────────────────────────────────

#[derive(Deserialize)]
struct CreateEntitiesArgs {
    entities: Vec<Entity>,
}

#[derive(Deserialize)]
struct RelationsArgs {
    relations: Vec<Relation>,
}

#[derive(Deserialize)]
struct AddObservationsArgs {
    observations: Vec<ObservationInput>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteEntitiesArgs {
    entity_names: Vec<String>,
}

#[derive(Deserialize)]
struct DeleteObservationsArgs {
    deletions: Vec<ObservationDeletion>,
}

#[derive(Deserialize)]
struct SearchNodesArgs {
    query: String,
}

#[derive(Deserialize)]
struct OpenNodesArgs {
    names: Vec<String>,
}

/// Dispatches tool calls to a shared [`KnowledgeGraphManager`].
///
/// Clone is cheap (inner Arc).
pub struct Dispatcher<S = JsonlGraphStore> {
    manager: Arc<KnowledgeGraphManager<S>>,
}

impl<S> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
        }
    }
}

impl<S: GraphStore> Dispatcher<S> {
    pub fn new(manager: Arc<KnowledgeGraphManager<S>>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &KnowledgeGraphManager<S> {
        &self.manager
    }

    /// Invoke tool `name` with `arguments`.
    ///
    /// A missing (or null) arguments payload is rejected before the name is
    /// even looked at.
    pub async fn call(&self, name: &str, arguments: Option<Value>) -> Result<ToolOutput> {
        let Some(args) = arguments.filter(|a| !a.is_null()) else {
            return Err(DispatchError::MissingArguments(name.to_string()));
        };

        tracing::debug!(tool = name, "Dispatching tool call");

        match name {
            tools::CREATE_ENTITIES => {
                let args: CreateEntitiesArgs = parse_args(name, args)?;
                ToolOutput::json(&self.manager.create_entities(args.entities).await?)
            }
            tools::CREATE_RELATIONS => {
                let args: RelationsArgs = parse_args(name, args)?;
                ToolOutput::json(&self.manager.create_relations(args.relations).await?)
            }
            tools::ADD_OBSERVATIONS => {
                let args: AddObservationsArgs = parse_args(name, args)?;
                ToolOutput::json(&self.manager.add_observations(args.observations).await?)
            }
            tools::DELETE_ENTITIES => {
                let args: DeleteEntitiesArgs = parse_args(name, args)?;
                self.manager.delete_entities(args.entity_names).await?;
                Ok(ToolOutput::message("Entities deleted successfully"))
            }
            tools::DELETE_OBSERVATIONS => {
                let args: DeleteObservationsArgs = parse_args(name, args)?;
                self.manager.delete_observations(args.deletions).await?;
                Ok(ToolOutput::message("Observations deleted successfully"))
            }
            tools::DELETE_RELATIONS => {
                let args: RelationsArgs = parse_args(name, args)?;
                self.manager.delete_relations(args.relations).await?;
                Ok(ToolOutput::message("Relations deleted successfully"))
            }
            tools::READ_GRAPH => ToolOutput::json(&self.manager.read_graph().await?),
            tools::SEARCH_NODES => {
                let args: SearchNodesArgs = parse_args(name, args)?;
                ToolOutput::json(&self.manager.search_nodes(&args.query).await?)
            }
            tools::OPEN_NODES => {
                let args: OpenNodesArgs = parse_args(name, args)?;
                ToolOutput::json(&self.manager.open_nodes(&args.names).await?)
            }
            _ => Err(DispatchError::UnknownTool(name.to_string())),
        }
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|source| DispatchError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}
