//! Applies a document's intents to a [`GraphStore`].
//!
//! Intents are applied one at a time in emitted order. A relationship is only
//! submitted once both of its endpoints were acknowledged by the store during
//! this run, and the first failure aborts the rest of the document.

use std::collections::HashSet;

use jgl_core::intent::{Intent, NodeIntent, RelationshipIntent, ValueUpdate};
use jgl_core::{WriteError, WriteResult};
use serde::Serialize;
use tracing::debug;

use crate::cypher;
use crate::store::GraphStore;

/// Counts of acknowledged upserts for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub nodes: usize,
    pub relationships: usize,
    pub values: usize,
}

/// Per-document writer. Holds no state beyond the current document.
pub struct GraphWriter<'a, S: GraphStore + ?Sized> {
    store: &'a S,
    acknowledged: HashSet<NodeIntent>,
    position: usize,
    summary: WriteSummary,
}

impl<'a, S: GraphStore + ?Sized> GraphWriter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            acknowledged: HashSet::new(),
            position: 0,
            summary: WriteSummary::default(),
        }
    }

    fn next_index(&mut self) -> usize {
        let index = self.position;
        self.position += 1;
        index
    }

    fn check_identifiers(node: &NodeIntent, index: usize) -> WriteResult<()> {
        cypher::check_node(node).map_err(|e| WriteError::InvalidIdentifier {
            index,
            identifier: e.0,
        })
    }

    fn require_acknowledged(&self, node: &NodeIntent, index: usize) -> WriteResult<()> {
        if self.acknowledged.contains(node) {
            Ok(())
        } else {
            Err(WriteError::UnacknowledgedEndpoint {
                index,
                node: node.identity(),
            })
        }
    }

    /// Upsert a node.
    pub async fn apply_node(&mut self, node: &NodeIntent) -> WriteResult<()> {
        let index = self.next_index();
        Self::check_identifiers(node, index)?;

        self.store
            .merge_node(node)
            .await
            .map_err(|source| WriteError::Store { index, source })?;

        self.acknowledged.insert(node.clone());
        self.summary.nodes += 1;
        Ok(())
    }

    /// Upsert a relationship whose endpoints were applied earlier.
    pub async fn apply_relationship(&mut self, rel: &RelationshipIntent) -> WriteResult<()> {
        let index = self.next_index();
        self.require_acknowledged(&rel.from, index)?;
        self.require_acknowledged(&rel.to, index)?;

        self.store
            .merge_relationship(rel)
            .await
            .map_err(|source| WriteError::Store { index, source })?;

        self.summary.relationships += 1;
        Ok(())
    }

    /// Attach a primitive to a node applied earlier.
    pub async fn apply_value(&mut self, update: &ValueUpdate) -> WriteResult<()> {
        let index = self.next_index();
        self.require_acknowledged(&update.node, index)?;

        self.store
            .set_value(update)
            .await
            .map_err(|source| WriteError::Store { index, source })?;

        self.acknowledged.insert(update.updated());
        self.summary.values += 1;
        Ok(())
    }

    pub async fn apply(&mut self, intent: &Intent) -> WriteResult<()> {
        match intent {
            Intent::Node(node) => self.apply_node(node).await,
            Intent::Relationship(rel) => self.apply_relationship(rel).await,
            Intent::SetValue(update) => self.apply_value(update).await,
        }
    }

    /// Apply a whole plan, stopping at the first failure.
    pub async fn apply_all(mut self, intents: &[Intent]) -> WriteResult<WriteSummary> {
        for intent in intents {
            self.apply(intent).await?;
        }
        debug!(
            nodes = self.summary.nodes,
            relationships = self.summary.relationships,
            values = self.summary.values,
            "Plan applied"
        );
        Ok(self.summary)
    }
}
