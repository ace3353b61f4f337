//! Post-ingestion analytics: graph projection and Leiden community detection.
//!
//! Nothing here computes communities. Parameters are validated, forwarded to
//! the analytics engine, and the reported statistics are returned.

use jgl_core::analytics::{
    validate_projection_name, CommunityStats, LeidenParams, MemoryEstimate, ProjectionHandle,
};
use jgl_core::intent::RelType;
use jgl_core::{AnalyticsError, StoreError};
use tracing::info;

use crate::store::AnalyticsBackend;

pub struct AnalyticsTrigger<'a, B: AnalyticsBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: AnalyticsBackend + ?Sized> AnalyticsTrigger<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Create (or recreate) the named projection over all labels and the
    /// undirected `HAS` relationship.
    pub async fn project(&self, name: &str) -> Result<ProjectionHandle, AnalyticsError> {
        validate_projection_name(name)?;

        match self.backend.drop_projection(name).await {
            Ok(()) => info!(projection = name, "Dropped existing projection"),
            Err(StoreError::ProjectionNotFound(_)) => {
                info!(projection = name, "No existing projection to drop")
            }
            Err(source) => {
                return Err(AnalyticsError::Projection {
                    name: name.to_string(),
                    source,
                })
            }
        }

        info!(projection = name, "Projecting graph");
        let handle = self
            .backend
            .create_projection(name, RelType::Has)
            .await
            .map_err(|source| AnalyticsError::Projection {
                name: name.to_string(),
                source,
            })?;

        info!(
            projection = %handle.name,
            nodes = handle.node_count,
            relationships = handle.relationship_count,
            "Projection created"
        );
        Ok(handle)
    }

    /// Estimate memory for a Leiden write run.
    pub async fn estimate(
        &self,
        handle: &ProjectionHandle,
        params: &LeidenParams,
    ) -> Result<MemoryEstimate, AnalyticsError> {
        params.validate()?;

        let estimate = self
            .backend
            .estimate_leiden(&handle.name, params)
            .await
            .map_err(|e| no_record(e, &handle.name))?;

        info!(
            projection = %handle.name,
            nodes = estimate.node_count,
            relationships = estimate.relationship_count,
            required_memory = %estimate.required_memory,
            "Leiden memory estimation"
        );
        Ok(estimate)
    }

    /// Run Leiden in write mode on a projection.
    pub async fn run_community_detection(
        &self,
        handle: &ProjectionHandle,
        params: &LeidenParams,
    ) -> Result<CommunityStats, AnalyticsError> {
        params.validate()?;

        info!(projection = %handle.name, write_property = %params.write_property, "Running Leiden");
        let stats = self
            .backend
            .write_leiden(&handle.name, params)
            .await
            .map_err(|e| no_record(e, &handle.name))?;

        info!(
            projection = %handle.name,
            communities = stats.community_count,
            modularity = stats.modularity,
            written = stats.node_properties_written,
            "Leiden complete"
        );
        Ok(stats)
    }

    /// Project, then run community detection.
    pub async fn run(&self, name: &str, params: &LeidenParams) -> Result<CommunityStats, AnalyticsError> {
        params.validate()?;
        let handle = self.project(name).await?;
        self.run_community_detection(&handle, params).await
    }
}

fn no_record(err: StoreError, name: &str) -> AnalyticsError {
    match err {
        StoreError::NoRecord(_) => AnalyticsError::NoRecord(name.to_string()),
        other => AnalyticsError::Store(other),
    }
}
