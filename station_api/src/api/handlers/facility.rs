use crate::api::api_models::{GeoJsonResponse, UploadResponse};
use crate::api::error::ApiError;
use crate::api::extractors::json::JsonBody;
use crate::geojson::{FacilityUpload, StationCodeSource};
use crate::state::Store;
use crate::store::UpsertOutcome;
use axum::Json;
use axum::extract::{Path, State};
use serde_json::Value;
use tracing::{info, warn};

/// `POST /uploadGeoJSON`
///
/// Body: `{ "stationCode": "STN01", "geojson": { "features": [...] } }` sent as
/// `application/json`. Creates the facility map for the station or replaces
/// the stored one.
///
/// - `200 OK` `{ "success": true, "message": "...", "operation": "created" | "updated" }`
/// - `400 Bad Request` wrong content type, malformed JSON, no `features`
///   array or no station code
/// - `500 Internal Server Error`
pub async fn upload_geojson(
    State(store): State<Store>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<UploadResponse>, ApiError> {
    let upload = FacilityUpload::try_from(body)?;

    if upload.source == StationCodeSource::Features {
        warn!(
            station_code = %upload.station_code,
            "stationCode derived from feature properties; clients should send it explicitly"
        );
    }

    let operation = store
        .upsert_facility(&upload.station_code, &upload.geojson)
        .await?;

    info!(station_code = %upload.station_code, ?operation, "facility geojson stored");

    let message = match operation {
        UpsertOutcome::Created => "GeoJSON data created successfully",
        UpsertOutcome::Updated => "GeoJSON data updated successfully",
    };

    Ok(Json(UploadResponse {
        success: true,
        message: message.to_string(),
        operation,
    }))
}

/// `GET /getGeoJSON/{stationCode}`
pub async fn get_geojson(
    State(store): State<Store>,
    Path(station_code): Path<String>,
) -> Result<Json<GeoJsonResponse>, ApiError> {
    let record = store
        .find_facility(&station_code)
        .await?
        .ok_or(ApiError::NotFound("GeoJSON data"))?;

    Ok(Json(GeoJsonResponse {
        success: true,
        geojson: record.geojson,
    }))
}
