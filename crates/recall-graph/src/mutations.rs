//! Write operations on an in-memory knowledge graph.
//!
//! Inserts are deduplicating: entities by name, relations by their
//! `(from, to, relation_type)` triple, observations by exact content. The
//! functions return what actually changed so callers can report it.

use std::collections::HashSet;

use recall_core::{
    Entity, KnowledgeGraph, ObservationDeletion, ObservationInput, ObservationResult, Relation,
};

use crate::error::{GraphError, Result};

// ── Inserts ──────────────────────────────────────────────────────

/// Add entities whose names are not yet taken. Returns the entities added.
///
/// Later duplicates within the same batch are skipped as well, and repeated
/// observations inside one entity are collapsed.
pub fn insert_entities(graph: &mut KnowledgeGraph, entities: Vec<Entity>) -> Vec<Entity> {
    let mut names: HashSet<String> = graph.entities.iter().map(|e| e.name.clone()).collect();
    let mut added = Vec::new();

    for mut entity in entities {
        if !names.insert(entity.name.clone()) {
            continue;
        }
        entity.observations = dedup_preserving_order(entity.observations);
        graph.entities.push(entity.clone());
        added.push(entity);
    }

    added
}

/// Add relations whose triple is not yet present. Returns the relations added.
///
/// Endpoints are not checked against existing entities.
pub fn insert_relations(graph: &mut KnowledgeGraph, relations: Vec<Relation>) -> Vec<Relation> {
    let mut existing: HashSet<Relation> = graph.relations.iter().cloned().collect();
    let mut added = Vec::new();

    for relation in relations {
        if existing.insert(relation.clone()) {
            graph.relations.push(relation.clone());
            added.push(relation);
        }
    }

    added
}

/// Append new observation strings to existing entities.
///
/// All-or-nothing: every referenced entity is checked before anything is
/// touched, and the first missing name fails the whole batch.
pub fn append_observations(
    graph: &mut KnowledgeGraph,
    inputs: &[ObservationInput],
) -> Result<Vec<ObservationResult>> {
    {
        let names = graph.entity_names();
        if let Some(missing) = inputs.iter().find(|i| !names.contains(i.entity_name.as_str())) {
            return Err(GraphError::EntityNotFound(missing.entity_name.clone()));
        }
    }

    let mut results = Vec::with_capacity(inputs.len());
    for input in inputs {
        let entity = graph
            .find_entity_mut(&input.entity_name)
            .ok_or_else(|| GraphError::EntityNotFound(input.entity_name.clone()))?;

        let mut present: HashSet<String> = entity.observations.iter().cloned().collect();
        let mut added = Vec::new();
        for content in &input.contents {
            if present.insert(content.clone()) {
                entity.observations.push(content.clone());
                added.push(content.clone());
            }
        }

        results.push(ObservationResult {
            entity_name: input.entity_name.clone(),
            added_observations: added,
        });
    }

    Ok(results)
}

// ── Deletes ──────────────────────────────────────────────────────

/// Counts of what a delete removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Removed {
    pub entities: usize,
    pub relations: usize,
    pub observations: usize,
}

/// Remove entities by name, cascading to every relation that touches them.
pub fn remove_entities(graph: &mut KnowledgeGraph, names: &[String]) -> Removed {
    let doomed: HashSet<&str> = names.iter().map(String::as_str).collect();

    let entities_before = graph.entities.len();
    graph.entities.retain(|e| !doomed.contains(e.name.as_str()));

    let relations_before = graph.relations.len();
    graph
        .relations
        .retain(|r| !doomed.contains(r.from.as_str()) && !doomed.contains(r.to.as_str()));

    Removed {
        entities: entities_before - graph.entities.len(),
        relations: relations_before - graph.relations.len(),
        observations: 0,
    }
}

/// Remove observation strings from entities. Unknown entity names are skipped.
pub fn remove_observations(graph: &mut KnowledgeGraph, deletions: &[ObservationDeletion]) -> Removed {
    let mut removed = 0;

    for deletion in deletions {
        let Some(entity) = graph.find_entity_mut(&deletion.entity_name) else {
            tracing::debug!(entity = %deletion.entity_name, "Skipping deletion for unknown entity");
            continue;
        };
        let doomed: HashSet<&str> = deletion.observations.iter().map(String::as_str).collect();
        let before = entity.observations.len();
        entity.observations.retain(|o| !doomed.contains(o.as_str()));
        removed += before - entity.observations.len();
    }

    Removed {
        observations: removed,
        ..Default::default()
    }
}

/// Remove relations whose triple exactly matches one of `relations`.
pub fn remove_relations(graph: &mut KnowledgeGraph, relations: &[Relation]) -> Removed {
    let doomed: HashSet<&Relation> = relations.iter().collect();
    let before = graph.relations.len();
    graph.relations.retain(|r| !doomed.contains(r));

    Removed {
        relations: before - graph.relations.len(),
        ..Default::default()
    }
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
