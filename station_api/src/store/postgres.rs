use super::{DocumentStore, FacilityRecord, Officer, StoreError, UpsertOutcome};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Pool, Postgres};
use tracing::instrument;

/// Postgres-backed store. Tables are created by the migrations in `shared`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

#[async_trait]
impl DocumentStore for PostgresStore {
    #[instrument(level = "debug", skip_all, fields(username = %officer.username))]
    async fn insert_officer(&self, officer: &Officer) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO officers (
                officer_id, officer_name, officer_id_proof,
                station_code, station_name, station_city,
                username, password_hash
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(&officer.officer_id)
        .bind(&officer.officer_name)
        .bind(&officer.officer_id_proof)
        .bind(&officer.station_code)
        .bind(&officer.station_name)
        .bind(&officer.station_city)
        .bind(&officer.username)
        .bind(&officer.password_hash)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Duplicate {
                    collection: "officers",
                    key: officer.username.clone(),
                }
            } else {
                StoreError::Sql(e)
            }
        })
    }

    #[instrument(level = "debug", skip(self))]
    async fn find_officer(&self, username: &str) -> Result<Option<Officer>, StoreError> {
        let officer = sqlx::query_as::<_, Officer>(
            r"
            SELECT officer_id, officer_name, officer_id_proof,
                   station_code, station_name, station_city,
                   username, password_hash
            FROM officers
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(officer)
    }

    #[instrument(level = "debug", skip(self))]
    async fn find_station(&self, name: &str) -> Result<Option<Value>, StoreError> {
        let document = sqlx::query_scalar::<_, Value>(
            r"
            SELECT document
            FROM stations
            WHERE name = $1
            ",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }

    #[instrument(level = "debug", skip(self, document))]
    async fn put_station(&self, name: &str, document: &Value) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO stations (name, document)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET
                document = EXCLUDED.document
            ",
        )
        .bind(name)
        .bind(document)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(level = "debug", skip(self, geojson))]
    async fn upsert_facility(
        &self,
        station_code: &str,
        geojson: &Value,
    ) -> Result<UpsertOutcome, StoreError> {
        // xmax is 0 only for a freshly inserted row version
        let inserted = sqlx::query_scalar::<_, bool>(
            r"
            INSERT INTO facility (station_code, geojson)
            VALUES ($1, $2)
            ON CONFLICT (station_code) DO UPDATE SET
                geojson = EXCLUDED.geojson,
                updated_at = now()
            RETURNING (xmax = 0) AS inserted
            ",
        )
        .bind(station_code)
        .bind(geojson)
        .fetch_one(&self.pool)
        .await?;

        Ok(if inserted {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Updated
        })
    }

    #[instrument(level = "debug", skip(self))]
    async fn find_facility(
        &self,
        station_code: &str,
    ) -> Result<Option<FacilityRecord>, StoreError> {
        let record = sqlx::query_as::<_, FacilityRecord>(
            r"
            SELECT station_code, geojson, created_at, updated_at
            FROM facility
            WHERE station_code = $1
            ",
        )
        .bind(station_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
