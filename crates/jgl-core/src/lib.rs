//! JGL Core Library
//!
//! Deterministic mapping of JSON documents onto a labeled property graph,
//! plus the models shared by the graph writer and the analytics phase.

pub mod analytics;
pub mod document;
pub mod error;
pub mod intent;
pub mod mapper;

pub use document::DocumentSource;
pub use error::{AnalyticsError, IngestError, StoreError, StoreResult, WriteError, WriteResult};
pub use intent::{Intent, NodeIntent, PropertyValue, RelType, RelationshipIntent, ValueUpdate};
pub use mapper::map_document;
