//! Core domain types for the recall knowledge graph.
//!
//! Field names serialize in camelCase (`entityType`, `relationType`,
//! `entityName`) because that is the shape both the store file and the
//! tool payloads use.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// ── Graph Elements ───────────────────────────────────────────────

/// A named, typed node carrying free-text observations.
///
/// `name` is the primary key across the whole graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    pub entity_type: String,
    pub observations: Vec<String>,
}

impl Entity {
    pub fn new(name: &str, entity_type: &str, observations: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            entity_type: entity_type.to_string(),
            observations: observations.iter().map(|o| o.to_string()).collect(),
        }
    }
}

/// A directed, typed edge between two entity names.
///
/// The `(from, to, relation_type)` triple is the relation's identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub from: String,
    pub to: String,
    pub relation_type: String,
}

impl Relation {
    pub fn new(from: &str, to: &str, relation_type: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            relation_type: relation_type.to_string(),
        }
    }

    /// Whether this relation touches the named entity at either end.
    pub fn touches(&self, name: &str) -> bool {
        self.from == name || self.to == name
    }
}

/// The complete set of entities and relations at a point in time.
///
/// Both vectors keep insertion order, which is also the order records
/// appear in the store file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnowledgeGraph {
    pub entities: Vec<Entity>,
    pub relations: Vec<Relation>,
}

impl KnowledgeGraph {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relations.is_empty()
    }

    /// Names of every entity currently in the graph.
    pub fn entity_names(&self) -> HashSet<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn find_entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn find_entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.name == name)
    }
}

// ── Observation Batches ──────────────────────────────────────────

/// Observations to append to one entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationInput {
    pub entity_name: String,
    pub contents: Vec<String>,
}

/// The observations actually appended to one entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationResult {
    pub entity_name: String,
    pub added_observations: Vec<String>,
}

/// Observations to remove from one entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationDeletion {
    pub entity_name: String,
    pub observations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_uses_camel_case_fields() {
        let entity = Entity::new("Alice", "person", &["likes tea"]);
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Alice",
                "entityType": "person",
                "observations": ["likes tea"]
            })
        );
    }

    #[test]
    fn entity_requires_observations() {
        let result = serde_json::from_str::<Entity>(r#"{"name":"Bob","entityType":"person"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn relation_triple_is_identity() {
        let a = Relation::new("Alice", "Bob", "knows");
        let b = Relation::new("Alice", "Bob", "knows");
        let c = Relation::new("Alice", "Bob", "employs");

        let set: HashSet<Relation> = [a.clone(), b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(a.touches("Bob"));
        assert!(!a.touches("Carol"));
    }

    #[test]
    fn observation_result_serializes_added_observations() {
        let result = ObservationResult {
            entity_name: "Alice".to_string(),
            added_observations: vec!["x".to_string()],
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"entityName":"Alice","addedObservations":["x"]}"#);
    }

    #[test]
    fn find_entity_by_exact_name() {
        let mut graph = KnowledgeGraph {
            entities: vec![Entity::new("Alice", "person", &[])],
            relations: vec![],
        };
        assert!(graph.find_entity("alice").is_none());
        graph
            .find_entity_mut("Alice")
            .unwrap()
            .observations
            .push("new".to_string());
        assert_eq!(graph.find_entity("Alice").unwrap().observations, vec!["new"]);
        assert!(graph.entity_names().contains("Alice"));
    }
}
