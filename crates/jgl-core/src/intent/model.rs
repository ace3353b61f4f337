//! Node and relationship intents.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Label of the synthetic per-document ancestor.
pub const ROOT_LABEL: &str = "Root";
/// `name` of the synthetic per-document ancestor.
pub const ROOT_NAME: &str = "root";

/// Property carrying the JSON key of an object-derived node.
pub const NAME_PROPERTY: &str = "name";
/// Property carrying the slot of an array-derived node.
pub const INDEX_PROPERTY: &str = "index";
/// Property carrying a folded primitive.
pub const VALUE_PROPERTY: &str = "value";

/// A primitive that can be stored as a node property.
///
/// Floats compare by bit pattern, so `Int(1)` and `Float(1.0)` are distinct
/// values just as they are distinct property tuples in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl PropertyValue {
    /// Convert a JSON primitive.
    ///
    /// Returns `None` for `null`, objects and arrays. Integers outside the
    /// `i64` range are carried as floats.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => n.as_f64().map(Self::Float),
            },
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for PropertyValue {}

impl Hash for PropertyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(x) => x.to_bits().hash(state),
            Self::String(s) => s.hash(state),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            // Debug keeps the fractional part: 1.0, not 1
            Self::Float(x) => write!(f, "{x:?}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Property map of a node. Keys are kept sorted so statements are stable.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A node to be upserted. Its identity in the store is label + properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeIntent {
    pub label: String,
    pub properties: Properties,
}

impl NodeIntent {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            properties: Properties::new(),
        }
    }

    /// The synthetic `Root {name: "root"}` node.
    pub fn root() -> Self {
        Self::new(ROOT_LABEL).with(NAME_PROPERTY, ROOT_NAME)
    }

    /// Builder-style property setter.
    pub fn with(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Stable textual identity, e.g. `BItem {index: 0, value: 2}`.
    pub fn identity(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NodeIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.label)?;
        for (i, (key, value)) in self.properties.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        write!(f, "}}")
    }
}

/// Relationship type. The mapping only ever produces containment edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelType {
    #[default]
    Has,
}

impl RelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelType::Has => "HAS",
        }
    }
}

impl fmt::Display for RelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed edge between two nodes, both matched by label + properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipIntent {
    pub from: NodeIntent,
    pub to: NodeIntent,
    pub rel_type: RelType,
}

impl RelationshipIntent {
    pub fn new(from: NodeIntent, to: NodeIntent, rel_type: RelType) -> Self {
        Self { from, to, rel_type }
    }
}

/// Attach a primitive to an already-emitted node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueUpdate {
    pub node: NodeIntent,
    pub value: PropertyValue,
}

impl ValueUpdate {
    /// The node as it exists after the update is applied.
    pub fn updated(&self) -> NodeIntent {
        self.node.clone().with(VALUE_PROPERTY, self.value.clone())
    }
}

/// One step of a document's write plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    Node(NodeIntent),
    Relationship(RelationshipIntent),
    SetValue(ValueUpdate),
}

impl Intent {
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::Node(_) => "node",
            Intent::Relationship(_) => "relationship",
            Intent::SetValue(_) => "set_value",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Node(node) => write!(f, "MERGE {node}"),
            Intent::Relationship(rel) => {
                write!(f, "MERGE ({})-[:{}]->({})", rel.from, rel.rel_type, rel.to)
            }
            Intent::SetValue(update) => write!(f, "SET {}.value = {}", update.node, update.value),
        }
    }
}
