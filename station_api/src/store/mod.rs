//! Storage for the three collections the service works with: `officers`,
//! `stations` and `facility`.
//!
//! Handlers only see [`DocumentStore`]. [`PostgresStore`] keeps the documents
//! in Postgres (JSONB for the opaque station and GeoJSON payloads) behind a
//! shared connection pool. [`InMemoryStore`] keeps them in process memory and
//! is meant for local development and tests.
mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
    #[error("{collection} record with key {key} already exists")]
    Duplicate {
        collection: &'static str,
        key: String,
    },
}

/// A registered station officer. `password_hash` holds an argon2 PHC string.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Officer {
    pub officer_id: Option<String>,
    pub officer_name: Option<String>,
    pub officer_id_proof: Option<String>,
    pub station_code: String,
    pub station_name: Option<String>,
    pub station_city: Option<String>,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct FacilityRecord {
    pub station_code: String,
    pub geojson: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whether an upsert inserted a new record or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] if the username is taken.
    async fn insert_officer(&self, officer: &Officer) -> Result<(), StoreError>;

    async fn find_officer(&self, username: &str) -> Result<Option<Officer>, StoreError>;

    async fn find_station(&self, name: &str) -> Result<Option<Value>, StoreError>;

    /// Inserts or replaces the station document stored under `name`.
    async fn put_station(&self, name: &str, document: &Value) -> Result<(), StoreError>;

    /// Inserts the GeoJSON for `station_code`, or replaces the stored one
    /// wholesale. Last write wins.
    async fn upsert_facility(
        &self,
        station_code: &str,
        geojson: &Value,
    ) -> Result<UpsertOutcome, StoreError>;

    async fn find_facility(&self, station_code: &str)
    -> Result<Option<FacilityRecord>, StoreError>;
}
