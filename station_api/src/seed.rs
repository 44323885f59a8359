use crate::store::{DocumentStore, StoreError};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("seed file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("seed file must hold an array of station documents")]
    NotAnArray,
    #[error("station document at index {0} has no string `name`")]
    MissingName(usize),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Loads station documents from a JSON array file, keyed by their `name`.
/// All documents are checked before any is written.
#[instrument(skip(store))]
pub async fn seed_stations(store: &dyn DocumentStore, path: &Path) -> Result<usize, SeedError> {
    let raw = tokio::fs::read(path).await?;
    let Value::Array(stations) = serde_json::from_slice::<Value>(&raw)? else {
        return Err(SeedError::NotAnArray);
    };

    let mut named = Vec::with_capacity(stations.len());
    for (index, station) in stations.iter().enumerate() {
        let name = station
            .get("name")
            .and_then(Value::as_str)
            .ok_or(SeedError::MissingName(index))?;
        named.push((name, station));
    }

    for (name, station) in &named {
        store.put_station(name, station).await?;
    }

    Ok(named.len())
}
