//! Input documents: discovery, reading and parsing.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::IngestError;

/// Extension of files picked up by directory discovery.
pub const DOCUMENT_EXTENSION: &str = "json";

/// Where a document comes from. Loading happens inside the document's own
/// ingestion task, so read and parse failures stay local to that document.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Already parsed value.
    Value { name: String, value: Value },
    /// Raw JSON text.
    Text { name: String, text: String },
    /// File on disk, read asynchronously.
    File(PathBuf),
}

impl DocumentSource {
    /// Display name used in logs and reports.
    pub fn name(&self) -> String {
        match self {
            Self::Value { name, .. } | Self::Text { name, .. } => name.clone(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Resolve the source into a JSON value.
    pub async fn load(self) -> Result<Value, IngestError> {
        match self {
            Self::Value { value, .. } => Ok(value),
            Self::Text { text, .. } => parse_document(&text),
            Self::File(path) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|source| IngestError::Read { path: path.clone(), source })?;
                debug!(path = %path.display(), bytes = bytes.len(), "Read document");
                parse_bytes(&bytes)
            }
        }
    }
}

/// Parse JSON text. Object key order is preserved.
pub fn parse_document(text: &str) -> Result<Value, IngestError> {
    parse_bytes(text.as_bytes())
}

/// Parse JSON bytes of any nesting depth.
///
/// The recursion limit is off and the stack grows on demand while
/// deserializing. Invalid UTF-8 is a parse error like any other malformed
/// input.
pub fn parse_bytes(bytes: &[u8]) -> Result<Value, IngestError> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// List `*.json` files directly inside `dir`, sorted by path.
pub async fn discover_documents(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_json = path.extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION);
        if is_json && entry.file_type().await?.is_file() {
            paths.push(path);
        }
    }

    paths.sort();
    debug!(dir = %dir.display(), count = paths.len(), "Discovered documents");
    Ok(paths)
}
