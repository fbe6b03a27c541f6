//! Read operations: filtered subgraphs of a knowledge graph.
//!
//! A filtered result keeps a relation only when both of its endpoints are
//! among the selected entities, so no returned relation points outside
//! the returned entity set.

use std::collections::HashSet;

use recall_core::{Entity, KnowledgeGraph};

/// Entities whose name, type, or any observation contains `query`,
/// compared case-insensitively.
pub fn search(graph: KnowledgeGraph, query: &str) -> KnowledgeGraph {
    let needle = query.to_lowercase();
    induce(graph, |e| entity_matches(e, &needle))
}

/// Entities whose name is exactly one of `names`.
pub fn open(graph: KnowledgeGraph, names: &[String]) -> KnowledgeGraph {
    let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
    induce(graph, |e| wanted.contains(e.name.as_str()))
}

/// Keep entities that satisfy `keep` and the relations between them.
pub fn induce<F>(graph: KnowledgeGraph, keep: F) -> KnowledgeGraph
where
    F: Fn(&Entity) -> bool,
{
    let entities: Vec<Entity> = graph.entities.into_iter().filter(|e| keep(e)).collect();

    let relations = {
        let names: HashSet<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        graph
            .relations
            .into_iter()
            .filter(|r| names.contains(r.from.as_str()) && names.contains(r.to.as_str()))
            .collect()
    };

    KnowledgeGraph {
        entities,
        relations,
    }
}

fn entity_matches(entity: &Entity, needle: &str) -> bool {
    entity.name.to_lowercase().contains(needle)
        || entity.entity_type.to_lowercase().contains(needle)
        || entity
            .observations
            .iter()
            .any(|o| o.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::Relation;

    fn people() -> KnowledgeGraph {
        KnowledgeGraph {
            entities: vec![
                Entity::new("Alice", "person", &["likes tea"]),
                Entity::new("Bob", "person", &[]),
                Entity::new("alice-2", "robot", &["Built in 2020"]),
            ],
            relations: vec![
                Relation::new("Alice", "Bob", "knows"),
                Relation::new("Alice", "alice-2", "built"),
            ],
        }
    }

    #[test]
    fn search_excludes_relations_to_unmatched_entities() {
        let result = search(people(), "tea");

        assert_eq!(result.entities.len(), 1);
        assert_eq!(result.entities[0].name, "Alice");
        assert!(result.relations.is_empty());
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let by_name = search(people(), "ALICE");
        assert_eq!(by_name.entities.len(), 2);
        assert_eq!(
            by_name.relations,
            vec![Relation::new("Alice", "alice-2", "built")]
        );

        let by_type = search(people(), "Robot");
        assert_eq!(by_type.entities[0].name, "alice-2");

        let by_observation = search(people(), "built IN");
        assert_eq!(by_observation.entities[0].name, "alice-2");
    }

    #[test]
    fn search_keeps_relations_between_matches() {
        let result = search(people(), "person");
        assert_eq!(result.entities.len(), 2);
        assert_eq!(result.relations, vec![Relation::new("Alice", "Bob", "knows")]);
    }

    #[test]
    fn empty_query_matches_everything() {
        let graph = people();
        assert_eq!(search(graph.clone(), ""), graph);
    }

    #[test]
    fn open_matches_exact_names_only() {
        let result = open(people(), &["Alice".to_string()]);

        assert_eq!(result.entities.len(), 1);
        assert_eq!(result.entities[0].name, "Alice");
        assert!(result.relations.is_empty());
    }

    #[test]
    fn open_ignores_unknown_names() {
        let result = open(people(), &["Alice".to_string(), "Bob".to_string(), "Zed".to_string()]);
        assert_eq!(result.entities.len(), 2);
        assert_eq!(result.relations, vec![Relation::new("Alice", "Bob", "knows")]);
    }

    #[test]
    fn induce_drops_dangling_relations() {
        let graph = KnowledgeGraph {
            entities: vec![Entity::new("Alice", "person", &[])],
            relations: vec![Relation::new("Alice", "Ghost", "haunts")],
        };
        let result = induce(graph, |_| true);
        assert_eq!(result.entities.len(), 1);
        assert!(result.relations.is_empty());
    }
}
