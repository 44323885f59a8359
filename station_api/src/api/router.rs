use crate::api::handlers::facility::{get_geojson, upload_geojson};
use crate::api::handlers::officers::{login, register};
use crate::api::handlers::stations::get_station;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};

/// Cap for the registration form including the ID-proof file.
pub const MAX_REGISTRATION_BODY: usize = 10 * 1024 * 1024;
pub const MAX_GEOJSON_BODY: usize = 16 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::<AppState>::new()
        .route(
            "/register",
            post(register).layer(DefaultBodyLimit::max(MAX_REGISTRATION_BODY)),
        )
        .route("/login", post(login))
        .route("/getStationGeoJson/{station_name}", get(get_station))
        .route(
            "/uploadGeoJSON",
            post(upload_geojson).layer(DefaultBodyLimit::max(MAX_GEOJSON_BODY)),
        )
        .route("/getGeoJSON/{station_code}", get(get_geojson))
}
