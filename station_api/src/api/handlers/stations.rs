use crate::api::error::ApiError;
use crate::state::Store;
use axum::Json;
use axum::extract::{Path, State};
use serde_json::Value;

/// `GET /getStationGeoJson/{stationName}`
///
/// Returns the stored station document exactly as it was seeded.
pub async fn get_station(
    State(store): State<Store>,
    Path(station_name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    store
        .find_station(&station_name)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Station"))
}
