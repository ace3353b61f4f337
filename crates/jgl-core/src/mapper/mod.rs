//! JSON document to graph intent mapping.
//!
//! A document becomes a containment tree under a synthetic `Root` node:
//!
//! - every object entry becomes a node labelled with the capitalized key,
//!   carrying `name: <key>`;
//! - every array element becomes a `<ParentLabel>Item` node carrying
//!   `index: <slot>`;
//! - primitives are folded into the `value` property of the node for their
//!   key or slot and never become nodes of their own.
//!
//! Every edge is `HAS`, from parent to child. Traversal uses an explicit stack
//! so arbitrarily deep documents cannot exhaust the call stack.

use serde_json::Value;

use crate::intent::{
    Intent, NodeIntent, PropertyValue, RelType, RelationshipIntent, ValueUpdate, INDEX_PROPERTY,
    NAME_PROPERTY, VALUE_PROPERTY,
};

/// Pending container whose children still have to be emitted.
struct Frame<'a> {
    parent: NodeIntent,
    rel_type: Option<RelType>,
    value: &'a Value,
}

/// Map a JSON document to its ordered write plan.
///
/// The Root node comes first. Each child node is followed directly by the
/// relationship to its parent, and both precede anything under the child.
pub fn map_document(document: &Value) -> Vec<Intent> {
    let root = NodeIntent::root();
    let mut intents = vec![Intent::Node(root.clone())];
    let mut stack = vec![Frame {
        parent: root,
        rel_type: None,
        value: document,
    }];

    while let Some(frame) = stack.pop() {
        match frame.value {
            Value::Object(entries) => {
                let rel_type = frame.rel_type.unwrap_or_default();
                for (key, child) in entries {
                    let node = NodeIntent::new(capitalize(key)).with(NAME_PROPERTY, key.as_str());
                    emit_child(&mut intents, &mut stack, &frame.parent, rel_type, node, child);
                }
            }
            Value::Array(items) => {
                let label = format!("{}Item", frame.parent.label);
                for (idx, item) in items.iter().enumerate() {
                    let node = NodeIntent::new(label.clone()).with(INDEX_PROPERTY, idx as i64);
                    emit_child(&mut intents, &mut stack, &frame.parent, RelType::Has, node, item);
                }
            }
            primitive => {
                // Only a bare top-level primitive lands here.
                if let Some(value) = PropertyValue::from_json(primitive) {
                    intents.push(Intent::SetValue(ValueUpdate {
                        node: frame.parent,
                        value,
                    }));
                }
            }
        }
    }

    intents
}

fn emit_child<'a>(
    intents: &mut Vec<Intent>,
    stack: &mut Vec<Frame<'a>>,
    parent: &NodeIntent,
    rel_type: RelType,
    mut node: NodeIntent,
    child: &'a Value,
) {
    let nested = child.is_object() || child.is_array();
    if let Some(value) = PropertyValue::from_json(child) {
        node.properties.insert(VALUE_PROPERTY.to_string(), value);
    }

    intents.push(Intent::Node(node.clone()));
    intents.push(Intent::Relationship(RelationshipIntent::new(
        parent.clone(),
        node.clone(),
        rel_type,
    )));

    if nested {
        stack.push(Frame {
            parent: node,
            rel_type: Some(RelType::Has),
            value: child,
        });
    }
}

/// Uppercase the first character and lowercase the rest: `userName` -> `Username`.
pub fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::ROOT_LABEL;
    use serde_json::json;
    use std::collections::HashMap;

    fn nodes(intents: &[Intent]) -> Vec<&NodeIntent> {
        intents
            .iter()
            .filter_map(|i| match i {
                Intent::Node(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    fn edges(intents: &[Intent]) -> Vec<(String, String)> {
        intents
            .iter()
            .filter_map(|i| match i {
                Intent::Relationship(r) => Some((r.from.identity(), r.to.identity())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("name"), "Name");
        assert_eq!(capitalize("userName"), "Username");
        assert_eq!(capitalize("ÉCOLE"), "École");
        assert_eq!(capitalize("1st"), "1st");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_primitive_folding() {
        let intents = map_document(&json!({"a": 1, "b": [2, 3]}));

        let expected_nodes = vec![
            NodeIntent::root(),
            NodeIntent::new("A").with("name", "a").with("value", 1i64),
            NodeIntent::new("B").with("name", "b"),
            NodeIntent::new("BItem").with("index", 0i64).with("value", 2i64),
            NodeIntent::new("BItem").with("index", 1i64).with("value", 3i64),
        ];
        let actual: Vec<NodeIntent> = nodes(&intents).into_iter().cloned().collect();
        assert_eq!(actual, expected_nodes);

        let root = NodeIntent::root().identity();
        let a = expected_nodes[1].identity();
        let b = expected_nodes[2].identity();
        assert_eq!(
            edges(&intents),
            vec![
                (root.clone(), a),
                (root, b.clone()),
                (b.clone(), expected_nodes[3].identity()),
                (b, expected_nodes[4].identity()),
            ]
        );
        assert!(intents.iter().all(|i| match i {
            Intent::Relationship(r) => r.rel_type == RelType::Has,
            _ => true,
        }));
    }

    #[test]
    fn test_empty_object_document() {
        let intents = map_document(&json!({}));
        assert_eq!(intents, vec![Intent::Node(NodeIntent::root())]);
    }

    #[test]
    fn test_empty_container_under_key() {
        for empty in [json!({}), json!([])] {
            let intents = map_document(&json!({ "a": empty }));
            let a = NodeIntent::new("A").with("name", "a");
            assert_eq!(
                intents,
                vec![
                    Intent::Node(NodeIntent::root()),
                    Intent::Node(a.clone()),
                    Intent::Relationship(RelationshipIntent::new(NodeIntent::root(), a, RelType::Has)),
                ]
            );
        }
    }

    #[test]
    fn test_bare_primitive_document() {
        let intents = map_document(&json!(42));
        assert_eq!(
            intents,
            vec![
                Intent::Node(NodeIntent::root()),
                Intent::SetValue(ValueUpdate {
                    node: NodeIntent::root(),
                    value: PropertyValue::Int(42),
                }),
            ]
        );
        assert!(edges(&intents).is_empty());
    }

    #[test]
    fn test_null_document_and_null_values() {
        assert_eq!(map_document(&json!(null)), vec![Intent::Node(NodeIntent::root())]);

        let intents = map_document(&json!({"gone": null}));
        let node = nodes(&intents)[1];
        assert_eq!(node, &NodeIntent::new("Gone").with("name", "gone"));
    }

    #[test]
    fn test_top_level_array_uses_root_item_label() {
        let intents = map_document(&json!([[1]]));
        let labels: Vec<&str> = nodes(&intents).iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec![ROOT_LABEL, "RootItem", "RootItemItem"]);
    }

    #[test]
    fn test_object_keys_in_document_order() {
        let document: Value = serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let intents = map_document(&document);
        let labels: Vec<&str> = nodes(&intents).iter().skip(1).map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_endpoints_precede_relationships() {
        let document = json!({
            "users": [
                {"name": "ada", "tags": ["x", "y"], "meta": {"age": 36}},
                {"name": "bob", "tags": []}
            ],
            "config": {"nested": {"deep": [true, false, null]}}
        });
        let intents = map_document(&document);

        for (pos, intent) in intents.iter().enumerate() {
            if let Intent::Relationship(rel) = intent {
                let seen = |n: &NodeIntent| {
                    intents[..pos].iter().any(|i| matches!(i, Intent::Node(m) if m == n))
                };
                assert!(seen(&rel.from), "parent of #{pos} not emitted earlier");
                assert!(seen(&rel.to), "child of #{pos} not emitted earlier");
                // child node is emitted immediately before its relationship
                assert_eq!(intents[pos - 1], Intent::Node(rel.to.clone()));
            }
        }
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let document = json!({"a": [{"b": 1}, {"c": [1, 2, {"d": "x"}]}], "e": "f"});
        assert_eq!(map_document(&document), map_document(&document));
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        // json! would route the inner value through to_value, which recurses
        let mut document = json!("leaf");
        for _ in 0..2_000 {
            let mut level = serde_json::Map::new();
            level.insert("n".to_string(), document);
            document = Value::Object(level);
        }
        let intents = map_document(&document);
        // root + (node + relationship) per level
        assert_eq!(intents.len(), 1 + 2 * 2_000);
    }

    /// Rebuild the JSON document from a plan whose node identities are unique.
    fn rebuild(intents: &[Intent]) -> Value {
        let mut children: HashMap<String, Vec<NodeIntent>> = HashMap::new();
        for intent in intents {
            if let Intent::Relationship(rel) = intent {
                children.entry(rel.from.identity()).or_default().push(rel.to.clone());
            }
        }

        fn build(node: &NodeIntent, children: &HashMap<String, Vec<NodeIntent>>) -> Value {
            let kids = children.get(&node.identity()).cloned().unwrap_or_default();
            if kids.is_empty() {
                return match node.get(VALUE_PROPERTY) {
                    Some(v) => serde_json::to_value(v).unwrap(),
                    None => Value::Null,
                };
            }
            if kids[0].get(INDEX_PROPERTY).is_some() {
                Value::Array(kids.iter().map(|k| build(k, children)).collect())
            } else {
                let mut map = serde_json::Map::new();
                for kid in &kids {
                    let Some(PropertyValue::String(key)) = kid.get(NAME_PROPERTY) else {
                        panic!("object child without name: {kid}");
                    };
                    map.insert(key.clone(), build(kid, children));
                }
                Value::Object(map)
            }
        }

        build(&NodeIntent::root(), &children)
    }

    #[test]
    fn test_round_trip_structure() {
        let document = json!({
            "title": "report",
            "pages": 3,
            "authors": [{"first": "Ada", "last": "Lovelace"}, {"first": "Alan", "last": "Turing"}],
            "meta": {"draft": false, "ratio": 0.5, "matrix": [[1, 2], [3, 4]]}
        });
        assert_eq!(rebuild(&map_document(&document)), document);
    }
}
