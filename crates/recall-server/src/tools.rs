//! Tool catalog: names, descriptions, and input schemas advertised by `tools/list`.

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde_json::{json, Value};

pub const CREATE_ENTITIES: &str = "create_entities";
pub const CREATE_RELATIONS: &str = "create_relations";
pub const ADD_OBSERVATIONS: &str = "add_observations";
pub const DELETE_ENTITIES: &str = "delete_entities";
pub const DELETE_OBSERVATIONS: &str = "delete_observations";
pub const DELETE_RELATIONS: &str = "delete_relations";
pub const READ_GRAPH: &str = "read_graph";
pub const SEARCH_NODES: &str = "search_nodes";
pub const OPEN_NODES: &str = "open_nodes";

/// A tool as described to MCP clients.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

impl ToolDescriptor {
    /// Convert into the rmcp model advertised by `tools/list`.
    pub fn into_tool(self) -> Tool {
        let schema = match self.input_schema {
            Value::Object(map) => map,
            _ => JsonObject::new(),
        };
        Tool::new(self.name, self.description, Arc::new(schema))
    }
}

/// The nine graph tools, in a stable order.
pub fn catalog() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: CREATE_ENTITIES,
            description: "Create multiple new entities in the knowledge graph",
            input_schema: object_schema(
                json!({ "entities": array_of(entity_schema(), None) }),
                &["entities"],
            ),
        },
        ToolDescriptor {
            name: CREATE_RELATIONS,
            description: "Create multiple new relations between entities in the knowledge graph. \
                          Relations should be in active voice",
            input_schema: object_schema(
                json!({ "relations": array_of(relation_schema(), None) }),
                &["relations"],
            ),
        },
        ToolDescriptor {
            name: ADD_OBSERVATIONS,
            description: "Add new observations to existing entities in the knowledge graph",
            input_schema: object_schema(
                json!({
                    "observations": array_of(
                        object_schema(
                            json!({
                                "entityName": string_field("The name of the entity to add the observations to"),
                                "contents": strings("An array of observation contents to add"),
                            }),
                            &["entityName", "contents"],
                        ),
                        None,
                    )
                }),
                &["observations"],
            ),
        },
        ToolDescriptor {
            name: DELETE_ENTITIES,
            description: "Delete multiple entities and their associated relations from the knowledge graph",
            input_schema: object_schema(
                json!({ "entityNames": strings("An array of entity names to delete") }),
                &["entityNames"],
            ),
        },
        ToolDescriptor {
            name: DELETE_OBSERVATIONS,
            description: "Delete specific observations from entities in the knowledge graph",
            input_schema: object_schema(
                json!({
                    "deletions": array_of(
                        object_schema(
                            json!({
                                "entityName": string_field("The name of the entity containing the observations"),
                                "observations": strings("An array of observations to delete"),
                            }),
                            &["entityName", "observations"],
                        ),
                        None,
                    )
                }),
                &["deletions"],
            ),
        },
        ToolDescriptor {
            name: DELETE_RELATIONS,
            description: "Delete multiple relations from the knowledge graph",
            input_schema: object_schema(
                json!({
                    "relations": array_of(relation_schema(), Some("An array of relations to delete"))
                }),
                &["relations"],
            ),
        },
        ToolDescriptor {
            name: READ_GRAPH,
            description: "Read the entire knowledge graph",
            input_schema: object_schema(json!({}), &[]),
        },
        ToolDescriptor {
            name: SEARCH_NODES,
            description: "Search for nodes in the knowledge graph based on a query",
            input_schema: object_schema(
                json!({
                    "query": string_field(
                        "The search query to match against entity names, types, and observation content"
                    )
                }),
                &["query"],
            ),
        },
        ToolDescriptor {
            name: OPEN_NODES,
            description: "Open specific nodes in the knowledge graph by their names",
            input_schema: object_schema(
                json!({ "names": strings("An array of entity names to retrieve") }),
                &["names"],
            ),
        },
    ]
}

// ── Schema Builders ──────────────────────────────────────────────

fn object_schema(properties: Value, required: &[&str]) -> Value {
    let mut schema = json!({ "type": "object", "properties": properties });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}

fn array_of(items: Value, description: Option<&str>) -> Value {
    let mut schema = json!({ "type": "array", "items": items });
    if let Some(description) = description {
        schema["description"] = json!(description);
    }
    schema
}

fn string_field(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn strings(description: &str) -> Value {
    json!({ "type": "array", "items": { "type": "string" }, "description": description })
}

fn entity_schema() -> Value {
    object_schema(
        json!({
            "name": string_field("The name of the entity"),
            "entityType": string_field("The type of the entity"),
            "observations": strings("An array of observation contents associated with the entity"),
        }),
        &["name", "entityType", "observations"],
    )
}

fn relation_schema() -> Value {
    object_schema(
        json!({
            "from": string_field("The name of the entity where the relation starts"),
            "to": string_field("The name of the entity where the relation ends"),
            "relationType": string_field("The type of the relation"),
        }),
        &["from", "to", "relationType"],
    )
}
