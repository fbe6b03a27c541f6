//! The knowledge graph manager: load, mutate or query, save.

use std::path::PathBuf;

use tokio::sync::Mutex;

use recall_core::{
    Entity, KnowledgeGraph, ObservationDeletion, ObservationInput, ObservationResult, Relation,
};
use recall_store::{GraphStore, JsonlGraphStore};

use crate::error::Result;
use crate::{mutations, queries};

/// Runs graph operations against a store, one at a time.
///
/// The store sits behind an async mutex held across each operation's whole
/// load-mutate-save span. Reads take the same lock, so every operation
/// observes the result of every operation that completed before it.
pub struct KnowledgeGraphManager<S = JsonlGraphStore> {
    store: Mutex<S>,
}

impl KnowledgeGraphManager<JsonlGraphStore> {
    /// Manager over a newline-delimited JSON file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(JsonlGraphStore::new(path))
    }
}

impl<S: GraphStore> KnowledgeGraphManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Create entities, skipping names that already exist. Returns the ones added.
    pub async fn create_entities(&self, entities: Vec<Entity>) -> Result<Vec<Entity>> {
        let requested = entities.len();
        let added = self
            .mutate(|graph| Ok(mutations::insert_entities(graph, entities)))
            .await?;

        tracing::info!(requested, added = added.len(), "Entities created");
        Ok(added)
    }

    /// Create relations, skipping triples that already exist. Returns the ones added.
    pub async fn create_relations(&self, relations: Vec<Relation>) -> Result<Vec<Relation>> {
        let requested = relations.len();
        let added = self
            .mutate(|graph| Ok(mutations::insert_relations(graph, relations)))
            .await?;

        tracing::info!(requested, added = added.len(), "Relations created");
        Ok(added)
    }

    /// Append observations to existing entities.
    ///
    /// Fails with [`GraphError::EntityNotFound`](crate::GraphError::EntityNotFound)
    /// if any referenced entity is missing, in which case nothing is saved.
    pub async fn add_observations(
        &self,
        inputs: Vec<ObservationInput>,
    ) -> Result<Vec<ObservationResult>> {
        let results = self
            .mutate(|graph| mutations::append_observations(graph, &inputs))
            .await?;

        let added: usize = results.iter().map(|r| r.added_observations.len()).sum();
        tracing::info!(entities = results.len(), added, "Observations added");
        Ok(results)
    }

    /// Delete entities and every relation that touches them.
    pub async fn delete_entities(&self, names: Vec<String>) -> Result<()> {
        let removed = self
            .mutate(|graph| Ok(mutations::remove_entities(graph, &names)))
            .await?;

        tracing::info!(
            entities = removed.entities,
            relations = removed.relations,
            "Entities deleted"
        );
        Ok(())
    }

    /// Delete observation strings from entities; unknown entities are ignored.
    pub async fn delete_observations(&self, deletions: Vec<ObservationDeletion>) -> Result<()> {
        let removed = self
            .mutate(|graph| Ok(mutations::remove_observations(graph, &deletions)))
            .await?;

        tracing::info!(observations = removed.observations, "Observations deleted");
        Ok(())
    }

    /// Delete relations matching the given triples exactly.
    pub async fn delete_relations(&self, relations: Vec<Relation>) -> Result<()> {
        let removed = self
            .mutate(|graph| Ok(mutations::remove_relations(graph, &relations)))
            .await?;

        tracing::info!(relations = removed.relations, "Relations deleted");
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────

    /// The entire graph.
    pub async fn read_graph(&self) -> Result<KnowledgeGraph> {
        let graph = self.store.lock().await.load().await?;
        tracing::debug!(
            entities = graph.entities.len(),
            relations = graph.relations.len(),
            "Graph read"
        );
        Ok(graph)
    }

    /// Entities matching `query` in name, type, or observations, plus the
    /// relations among them.
    pub async fn search_nodes(&self, query: &str) -> Result<KnowledgeGraph> {
        let graph = self.store.lock().await.load().await?;
        let result = queries::search(graph, query);
        tracing::debug!(query, matched = result.entities.len(), "Search completed");
        Ok(result)
    }

    /// Entities with exactly the given names, plus the relations among them.
    pub async fn open_nodes(&self, names: &[String]) -> Result<KnowledgeGraph> {
        let graph = self.store.lock().await.load().await?;
        let result = queries::open(graph, names);
        tracing::debug!(
            requested = names.len(),
            found = result.entities.len(),
            "Nodes opened"
        );
        Ok(result)
    }

    /// Load, apply `f`, and save if `f` succeeded, all under the store lock.
    async fn mutate<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut KnowledgeGraph) -> Result<T>,
    {
        let store = self.store.lock().await;
        let mut graph = store.load().await?;
        let out = f(&mut graph)?;
        store.save(&graph).await?;
        Ok(out)
    }
}
