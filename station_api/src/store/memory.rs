use super::{DocumentStore, FacilityRecord, Officer, StoreError, UpsertOutcome};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

/// An in-memory document store.
///
/// Nothing is persisted across restarts and nothing is shared between
/// processes. Used when no Postgres connection is configured, and in tests.
#[derive(Clone, Default)]
pub struct InMemoryStore(Arc<RwLock<Collections>>);

#[derive(Default)]
struct Collections {
    officers: HashMap<String, Officer>,
    stations: HashMap<String, Value>,
    facility: HashMap<String, FacilityRecord>,
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore").finish_non_exhaustive()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert_officer(&self, officer: &Officer) -> Result<(), StoreError> {
        let mut guard = self.0.write();
        match guard.officers.entry(officer.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate {
                collection: "officers",
                key: officer.username.clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(officer.clone());
                Ok(())
            }
        }
    }

    async fn find_officer(&self, username: &str) -> Result<Option<Officer>, StoreError> {
        Ok(self.0.read().officers.get(username).cloned())
    }

    async fn find_station(&self, name: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.0.read().stations.get(name).cloned())
    }

    async fn put_station(&self, name: &str, document: &Value) -> Result<(), StoreError> {
        self.0
            .write()
            .stations
            .insert(name.to_string(), document.clone());
        Ok(())
    }

    async fn upsert_facility(
        &self,
        station_code: &str,
        geojson: &Value,
    ) -> Result<UpsertOutcome, StoreError> {
        let now = Utc::now();
        let mut guard = self.0.write();
        match guard.facility.entry(station_code.to_string()) {
            Entry::Occupied(mut existing) => {
                let record = existing.get_mut();
                record.geojson = geojson.clone();
                record.updated_at = now;
                Ok(UpsertOutcome::Updated)
            }
            Entry::Vacant(slot) => {
                slot.insert(FacilityRecord {
                    station_code: station_code.to_string(),
                    geojson: geojson.clone(),
                    created_at: now,
                    updated_at: now,
                });
                Ok(UpsertOutcome::Created)
            }
        }
    }

    async fn find_facility(
        &self,
        station_code: &str,
    ) -> Result<Option<FacilityRecord>, StoreError> {
        Ok(self.0.read().facility.get(station_code).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn officer(username: &str, station_code: &str) -> Officer {
        Officer {
            officer_id: Some("42".into()),
            officer_name: Some("Asha".into()),
            officer_id_proof: None,
            station_code: station_code.into(),
            station_name: None,
            station_city: None,
            username: username.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = InMemoryStore::new();
        store.insert_officer(&officer("o1", "STN01")).await.unwrap();

        let err = store
            .insert_officer(&officer("o1", "STN02"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { collection: "officers", .. }));

        let stored = store.find_officer("o1").await.unwrap().unwrap();
        assert_eq!(stored.station_code, "STN01");
    }

    #[tokio::test]
    async fn facility_upsert_replaces_whole_document() {
        let store = InMemoryStore::new();
        let first = json!({"features": [{"properties": {"kind": "toilet"}}]});
        let second = json!({"features": []});

        let outcome = store.upsert_facility("STN01", &first).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);
        let created = store.find_facility("STN01").await.unwrap().unwrap();

        let outcome = store.upsert_facility("STN01", &second).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);

        let record = store.find_facility("STN01").await.unwrap().unwrap();
        assert_eq!(record.geojson, second);
        assert_eq!(record.created_at, created.created_at);
        assert!(record.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn unknown_keys_are_none() {
        let store = InMemoryStore::new();
        assert!(store.find_officer("nobody").await.unwrap().is_none());
        assert!(store.find_station("Nowhere").await.unwrap().is_none());
        assert!(store.find_facility("XXX").await.unwrap().is_none());
    }
}
