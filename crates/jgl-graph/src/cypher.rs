//! Parameterized Cypher statements for intent upserts.
//!
//! Labels, relationship types and property keys cannot be bound as
//! parameters, so they are backtick-quoted identifiers. Every property value
//! is a bound parameter.

use std::fmt;

use jgl_core::intent::{NodeIntent, PropertyValue, RelationshipIntent, ValueUpdate, VALUE_PROPERTY};
use neo4rs::{BoltType, Query};

/// An identifier that cannot be expressed in Cypher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidIdentifier(pub String);

impl fmt::Display for InvalidIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid Cypher identifier {:?}", self.0)
    }
}

impl std::error::Error for InvalidIdentifier {}

/// Quote an identifier, doubling embedded backticks.
pub fn quote_identifier(ident: &str) -> Result<String, InvalidIdentifier> {
    if ident.is_empty() {
        return Err(InvalidIdentifier(ident.to_string()));
    }
    Ok(format!("`{}`", ident.replace('`', "``")))
}

/// Check every identifier a node would splice into a statement.
pub fn check_node(node: &NodeIntent) -> Result<(), InvalidIdentifier> {
    quote_identifier(&node.label)?;
    for key in node.properties.keys() {
        quote_identifier(key)?;
    }
    Ok(())
}

/// Statement text plus its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub text: String,
    pub params: Vec<(String, PropertyValue)>,
}

impl Statement {
    pub fn into_query(self) -> Query {
        self.params
            .into_iter()
            .fold(Query::new(self.text), |query, (key, value)| query.param(&key, to_bolt(value)))
    }
}

pub(crate) fn to_bolt(value: PropertyValue) -> BoltType {
    match value {
        PropertyValue::Bool(b) => b.into(),
        PropertyValue::Int(i) => i.into(),
        PropertyValue::Float(f) => f.into(),
        PropertyValue::String(s) => s.into(),
    }
}

/// `(var:`Label` {`k`: $var0, ...})` with its parameters.
fn node_pattern(
    var: &str,
    node: &NodeIntent,
    params: &mut Vec<(String, PropertyValue)>,
) -> Result<String, InvalidIdentifier> {
    let label = quote_identifier(&node.label)?;
    let mut props = Vec::with_capacity(node.properties.len());
    for (i, (key, value)) in node.properties.iter().enumerate() {
        let param = format!("{var}{i}");
        props.push(format!("{}: ${param}", quote_identifier(key)?));
        params.push((param, value.clone()));
    }
    Ok(format!("({var}:{label} {{{}}})", props.join(", ")))
}

/// Match-or-create a node on its full label + property tuple.
pub fn merge_node(node: &NodeIntent) -> Result<Statement, InvalidIdentifier> {
    let mut params = Vec::new();
    let pattern = node_pattern("n", node, &mut params)?;
    Ok(Statement {
        text: format!("MERGE {pattern}"),
        params,
    })
}

/// Match both endpoints and match-or-create the edge.
///
/// Returns `merged`, the number of endpoint pairs found; zero means an
/// endpoint is missing from the store.
pub fn merge_relationship(rel: &RelationshipIntent) -> Result<Statement, InvalidIdentifier> {
    let mut params = Vec::new();
    let from = node_pattern("a", &rel.from, &mut params)?;
    let to = node_pattern("b", &rel.to, &mut params)?;
    let rel_type = quote_identifier(rel.rel_type.as_str())?;
    Ok(Statement {
        text: format!("MATCH {from}\nMATCH {to}\nMERGE (a)-[:{rel_type}]->(b)\nRETURN count(*) AS merged"),
        params,
    })
}

/// Attach a primitive to an existing node. Returns `updated`.
pub fn set_value(update: &ValueUpdate) -> Result<Statement, InvalidIdentifier> {
    let mut params = Vec::new();
    let pattern = node_pattern("n", &update.node, &mut params)?;
    let key = quote_identifier(VALUE_PROPERTY)?;
    params.push(("value".to_string(), update.value.clone()));
    Ok(Statement {
        text: format!("MATCH {pattern}\nSET n.{key} = $value\nRETURN count(n) AS updated"),
        params,
    })
}
