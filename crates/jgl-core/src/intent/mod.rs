//! Write intents produced by the mapper and consumed by the graph writer.

pub mod model;

pub use model::{
    Intent, NodeIntent, Properties, PropertyValue, RelType, RelationshipIntent, ValueUpdate,
    INDEX_PROPERTY, NAME_PROPERTY, ROOT_LABEL, ROOT_NAME, VALUE_PROPERTY,
};

/// Counts of each intent kind in a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanStats {
    pub nodes: usize,
    pub relationships: usize,
    pub value_updates: usize,
}

impl PlanStats {
    pub fn of(intents: &[Intent]) -> Self {
        intents.iter().fold(Self::default(), |mut stats, intent| {
            match intent {
                Intent::Node(_) => stats.nodes += 1,
                Intent::Relationship(_) => stats.relationships += 1,
                Intent::SetValue(_) => stats.value_updates += 1,
            }
            stats
        })
    }
}
