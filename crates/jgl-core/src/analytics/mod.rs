//! Graph analytics request models (projection + Leiden).

pub mod model;

pub use model::{
    CommunityStats, LeidenParams, MemoryEstimate, ProjectionHandle, DEFAULT_PROJECTION,
    DEFAULT_RANDOM_SEED,
};

use crate::error::AnalyticsError;

/// Validate a projection name before it is sent to the analytics catalog.
pub fn validate_projection_name(name: &str) -> Result<(), AnalyticsError> {
    if name.trim().is_empty() {
        return Err(AnalyticsError::invalid("graphName", "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        let params = LeidenParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.write_property, "communityId");
        assert_eq!(params.random_seed, 19);
        assert_eq!(params.concurrency, 4);
        assert!(!params.include_intermediate_communities);
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let params = LeidenParams { concurrency: 0, ..Default::default() };
        let err = params.validate().unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidParameter { name: "concurrency", .. }));
    }

    #[test]
    fn test_rejects_blank_names() {
        let params = LeidenParams { write_property: " ".to_string(), ..Default::default() };
        assert!(params.validate().is_err());

        let params = LeidenParams {
            relationship_weight_property: Some(String::new()),
            ..Default::default()
        };
        assert!(params.validate().is_err());

        assert!(validate_projection_name("").is_err());
        assert!(validate_projection_name(DEFAULT_PROJECTION).is_ok());
    }

    #[test]
    fn test_params_from_partial_toml_like_json() {
        let params: LeidenParams =
            serde_json::from_str(r#"{"concurrency": 8, "include_intermediate_communities": true}"#)
                .unwrap();
        assert_eq!(params.concurrency, 8);
        assert!(params.include_intermediate_communities);
        assert_eq!(params.write_property, "communityId");
    }
}
