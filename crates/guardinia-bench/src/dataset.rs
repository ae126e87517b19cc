//! Labelled message datasets.
//!
//! A dataset is a JSON array of `{"id": ..., "categoria": "GOLPE", "mensagem": "..."}`.
//! `id` is optional and kept verbatim.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{BenchError, Label};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(rename = "categoria")]
    pub category: Label,
    #[serde(rename = "mensagem")]
    pub message: String,
}

/// Load a dataset, keeping at most `limit` items.
pub fn load_dataset(path: &Path, limit: Option<usize>) -> Result<Vec<DatasetItem>, BenchError> {
    if !path.exists() {
        return Err(BenchError::DatasetNotFound(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path)?;
    let mut items: Vec<DatasetItem> = serde_json::from_str(&raw)?;
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    info!(path = %path.display(), count = items.len(), "loaded dataset");
    Ok(items)
}
