use crate::api::api_models::{LoginRequest, LoginResponse, MessageResponse};
use crate::api::error::ApiError;
use crate::api::extractors::form_or_json::FormOrJson;
use crate::api::extractors::registration::Registration;
use crate::api::handlers::required;
use crate::password;
use crate::state::Store;
use crate::store::Officer;
use crate::uploads::Uploads;
use axum::Json;
use axum::extract::State;
use tokio::task;
use tracing::{info, warn};

/// `POST /register`
///
/// Stores a new officer. `username`, `password` and `stationCode` must be
/// present; the rest is optional. An `officerIdProof` file, if sent, is written
/// to the uploads directory and its path recorded on the officer.
///
/// - `200 OK` `{ "success": true, "message": "Officer registered successfully!" }`
/// - `400 Bad Request` missing field or unreadable form
/// - `409 Conflict` username already registered
/// - `500 Internal Server Error`
pub async fn register(
    State(store): State<Store>,
    State(uploads): State<Uploads>,
    registration: Registration,
) -> Result<Json<MessageResponse>, ApiError> {
    let fields = registration.fields;
    let username = required(fields.username, "username")?;
    let password = required(fields.password, "password")?;
    let station_code = required(fields.station_code, "stationCode")?;

    let password_hash = task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| ApiError::PasswordHash(e.to_string()))?
        .map_err(|e| ApiError::PasswordHash(e.to_string()))?;

    let id_proof_path = match registration.id_proof {
        Some(file) => Some(uploads.save(file.file_name.as_deref(), &file.bytes).await?),
        None => None,
    };

    let officer = Officer {
        officer_id: fields.officer_id,
        officer_name: fields.officer_name,
        officer_id_proof: id_proof_path
            .as_ref()
            .map(|path| path.display().to_string()),
        station_code,
        station_name: fields.station_name,
        station_city: fields.station_city,
        username,
        password_hash,
    };

    if let Err(e) = store.insert_officer(&officer).await {
        if let Some(path) = &id_proof_path {
            if let Err(remove_err) = tokio::fs::remove_file(path).await {
                warn!(error = ?remove_err, path = %path.display(), "failed to remove orphaned upload");
            }
        }
        return Err(e.into());
    }

    info!(
        username = %officer.username,
        station_code = %officer.station_code,
        "officer registered"
    );

    Ok(Json(MessageResponse {
        success: true,
        message: "Officer registered successfully!".to_string(),
    }))
}

/// `POST /login`
///
/// Checks the password against the stored hash. The body may be JSON or a
/// urlencoded form. Unknown usernames and wrong passwords get the same `401`
/// body, and both pay for one argon2 verification.
///
/// - `200 OK` `{ "success": true, "message": "Login successful", "stationCode": "STN01" }`
/// - `400 Bad Request` missing field or unsupported body
/// - `401 Unauthorized` `{ "success": false, "message": "Invalid username or password" }`
pub async fn login(
    State(store): State<Store>,
    FormOrJson(req): FormOrJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = required(req.username, "username")?;
    let password = required(req.password, "password")?;

    let officer = store.find_officer(&username).await?;

    let password_hash = officer.as_ref().map(|o| o.password_hash.clone());
    let verified = task::spawn_blocking(move || {
        password::verify_password_or_dummy(&password, password_hash.as_deref())
    })
    .await
    .map_err(|e| ApiError::PasswordHash(e.to_string()))?;

    let Some(officer) = officer.filter(|_| verified) else {
        info!(username = %username, "login rejected");
        return Err(ApiError::InvalidCredentials);
    };

    info!(username = %username, station_code = %officer.station_code, "login succeeded");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        station_code: officer.station_code,
    }))
}
