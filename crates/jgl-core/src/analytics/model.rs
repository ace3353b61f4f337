//! Community detection models.

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Default name of the in-memory projection.
pub const DEFAULT_PROJECTION: &str = "jsonGraph";

/// Seed used unless configured otherwise, so repeated runs agree.
pub const DEFAULT_RANDOM_SEED: i64 = 19;

/// Parameters forwarded to Leiden in write mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct LeidenParams {
    /// Node property receiving the community id.
    pub write_property: String,
    pub random_seed: i64,
    /// Parallelism requested from the analytics engine.
    pub concurrency: u32,
    pub relationship_weight_property: Option<String>,
    pub include_intermediate_communities: bool,
}

impl Default for LeidenParams {
    fn default() -> Self {
        Self {
            write_property: "communityId".to_string(),
            random_seed: DEFAULT_RANDOM_SEED,
            concurrency: 4,
            relationship_weight_property: None,
            include_intermediate_communities: false,
        }
    }
}

impl LeidenParams {
    /// Reject parameters the analytics engine would refuse anyway.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if self.write_property.trim().is_empty() {
            return Err(AnalyticsError::invalid("writeProperty", "must not be empty"));
        }
        if self.concurrency == 0 {
            return Err(AnalyticsError::invalid("concurrency", "must be at least 1"));
        }
        if let Some(weight) = &self.relationship_weight_property {
            if weight.trim().is_empty() {
                return Err(AnalyticsError::invalid(
                    "relationshipWeightProperty",
                    "must not be empty when set",
                ));
            }
        }
        Ok(())
    }
}

/// A named projection that exists in the analytics catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionHandle {
    pub name: String,
    pub node_count: i64,
    pub relationship_count: i64,
}

/// Statistics reported by a community detection run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityStats {
    pub community_count: i64,
    pub modularity: f64,
    pub node_properties_written: i64,
}

/// Memory estimation for a Leiden write run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryEstimate {
    pub node_count: i64,
    pub relationship_count: i64,
    pub required_memory: String,
}
