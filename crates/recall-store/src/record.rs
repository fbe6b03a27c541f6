//! On-disk record format: one tagged JSON object per line.

use serde::{Deserialize, Serialize};

use recall_core::{Entity, KnowledgeGraph, Relation};

/// A single line of the store file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Entity(Entity),
    Relation(Relation),
    /// Any other `type` tag. Skipped on load, never written.
    #[serde(other)]
    Unknown,
}

/// Serialize a graph to store-file text: entities first, then relations.
pub fn encode_graph(graph: &KnowledgeGraph) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for entity in &graph.entities {
        out.push_str(&serde_json::to_string(&TaggedRef::Entity(entity))?);
        out.push('\n');
    }
    for relation in &graph.relations {
        out.push_str(&serde_json::to_string(&TaggedRef::Relation(relation))?);
        out.push('\n');
    }
    Ok(out)
}

/// Borrowing twin of [`Record`] so saving does not clone the graph.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum TaggedRef<'a> {
    Entity(&'a Entity),
    Relation(&'a Relation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_record_carries_type_tag() {
        let entity = Entity::new("Alice", "person", &["likes tea"]);
        let line = serde_json::to_string(&Record::Entity(entity)).unwrap();
        assert_eq!(
            line,
            r#"{"type":"entity","name":"Alice","entityType":"person","observations":["likes tea"]}"#
        );
    }

    #[test]
    fn relation_record_carries_type_tag() {
        let line =
            serde_json::to_string(&Record::Relation(Relation::new("Alice", "Bob", "knows")))
                .unwrap();
        assert_eq!(
            line,
            r#"{"type":"relation","from":"Alice","to":"Bob","relationType":"knows"}"#
        );
    }

    #[test]
    fn unknown_type_parses_as_unknown() {
        let record: Record =
            serde_json::from_str(r#"{"type":"comment","text":"ignore me"}"#).unwrap();
        assert_eq!(record, Record::Unknown);
    }

    #[test]
    fn encode_writes_entities_before_relations() {
        let graph = KnowledgeGraph {
            entities: vec![Entity::new("Alice", "person", &[])],
            relations: vec![Relation::new("Alice", "Bob", "knows")],
        };
        let text = encode_graph(&graph).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(r#"{"type":"entity""#));
        assert!(lines[1].starts_with(r#"{"type":"relation""#));
        assert!(text.ends_with('\n'));
    }
}
