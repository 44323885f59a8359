//! Shape checks for facility map uploads.
//!
//! The payload is `{ "stationCode": "...", "geojson": { "features": [...] } }`.
//! The GeoJSON itself is opaque; only the presence of a `features` array is
//! checked.
//!
//! Older clients sent the bare GeoJSON object and left the station code inside
//! the feature properties. Those uploads are still accepted: the code is taken
//! from the first feature whose `properties.stationCode` is a non-empty string.
//! A top-level `stationCode` that is present but not a non-empty string is
//! rejected rather than falling back to the scan.
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadShapeError {
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("geojson must be an object containing a features array")]
    MissingFeatures,
    #[error("stationCode is required")]
    MissingStationCode,
    #[error("stationCode must be a non-empty string")]
    InvalidStationCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationCodeSource {
    Explicit,
    /// Found by scanning the feature properties (legacy clients).
    Features,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacilityUpload {
    pub station_code: String,
    pub geojson: Value,
    pub source: StationCodeSource,
}

impl TryFrom<Value> for FacilityUpload {
    type Error = UploadShapeError;

    fn try_from(body: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut body) = body else {
            return Err(UploadShapeError::NotAnObject);
        };

        // taken out so a bare GeoJSON body is stored without it
        let explicit_code = match body.remove("stationCode") {
            None | Some(Value::Null) => None,
            Some(code) => match non_empty_str(Some(&code)) {
                Some(code) => Some(code.to_owned()),
                None => return Err(UploadShapeError::InvalidStationCode),
            },
        };

        let geojson = match body.remove("geojson") {
            Some(geojson) => geojson,
            // bare GeoJSON body
            None if body.contains_key("features") => Value::Object(body),
            None => return Err(UploadShapeError::MissingFeatures),
        };

        let features = geojson
            .get("features")
            .and_then(Value::as_array)
            .ok_or(UploadShapeError::MissingFeatures)?;

        let (station_code, source) = match explicit_code {
            Some(code) => (code, StationCodeSource::Explicit),
            None => {
                let code = station_code_from_features(features)
                    .ok_or(UploadShapeError::MissingStationCode)?;
                (code.to_owned(), StationCodeSource::Features)
            }
        };

        Ok(Self {
            station_code,
            geojson,
            source,
        })
    }
}

/// First match in array order wins.
pub fn station_code_from_features(features: &[Value]) -> Option<&str> {
    features.iter().find_map(|feature| {
        let properties: &Map<String, Value> = feature.get("properties")?.as_object()?;
        non_empty_str(properties.get("stationCode"))
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn explicit_station_code_is_used() {
        let upload = FacilityUpload::try_from(json!({
            "stationCode": "STN01",
            "geojson": {"type": "FeatureCollection", "features": [{"properties": {}}]}
        }))
        .unwrap();

        assert_eq!(upload.station_code, "STN01");
        assert_eq!(upload.source, StationCodeSource::Explicit);
        assert_eq!(
            upload.geojson,
            json!({"type": "FeatureCollection", "features": [{"properties": {}}]})
        );
    }

    #[test]
    fn explicit_code_wins_over_feature_properties() {
        let upload = FacilityUpload::try_from(json!({
            "stationCode": "STN01",
            "geojson": {"features": [{"properties": {"stationCode": "OTHER"}}]}
        }))
        .unwrap();

        assert_eq!(upload.station_code, "STN01");
    }

    #[test]
    fn bare_geojson_takes_first_feature_with_a_code() {
        let body = json!({
            "type": "FeatureCollection",
            "features": [
                {"properties": {"name": "platform 1"}},
                {"properties": {"stationCode": ""}},
                {"properties": {"stationCode": "NDLS"}},
                {"properties": {"stationCode": "BCT"}}
            ]
        });
        let upload = FacilityUpload::try_from(body.clone()).unwrap();

        assert_eq!(upload.station_code, "NDLS");
        assert_eq!(upload.source, StationCodeSource::Features);
        assert_eq!(upload.geojson, body);
    }

    #[test]
    fn bare_geojson_with_explicit_code_is_stored_without_it() {
        let upload = FacilityUpload::try_from(json!({
            "stationCode": "STN01",
            "type": "FeatureCollection",
            "features": [{"properties": {"stationCode": "OTHER"}}]
        }))
        .unwrap();

        assert_eq!(upload.station_code, "STN01");
        assert_eq!(upload.source, StationCodeSource::Explicit);
        assert_eq!(
            upload.geojson,
            json!({
                "type": "FeatureCollection",
                "features": [{"properties": {"stationCode": "OTHER"}}]
            })
        );
    }

    #[test]
    fn non_string_station_code_is_rejected() {
        let features = json!([{"properties": {"stationCode": "LEG01"}}]);

        for code in [json!(123), json!(""), json!("  "), json!(["STN01"])] {
            let err = FacilityUpload::try_from(json!({
                "stationCode": code,
                "geojson": {"features": features}
            }))
            .unwrap_err();
            assert_eq!(err, UploadShapeError::InvalidStationCode, "{code}");
        }
    }

    #[test]
    fn null_station_code_falls_back_to_features() {
        let upload = FacilityUpload::try_from(json!({
            "stationCode": null,
            "geojson": {"features": [{"properties": {"stationCode": "LEG01"}}]}
        }))
        .unwrap();

        assert_eq!(upload.station_code, "LEG01");
        assert_eq!(upload.source, StationCodeSource::Features);
    }

    #[test]
    fn features_must_be_an_array() {
        let err = FacilityUpload::try_from(json!({
            "stationCode": "STN01",
            "geojson": {"features": {"0": {}}}
        }))
        .unwrap_err();
        assert_eq!(err, UploadShapeError::MissingFeatures);

        let err =
            FacilityUpload::try_from(json!({"stationCode": "STN01", "geojson": {}})).unwrap_err();
        assert_eq!(err, UploadShapeError::MissingFeatures);

        let err = FacilityUpload::try_from(json!({"stationCode": "STN01"})).unwrap_err();
        assert_eq!(err, UploadShapeError::MissingFeatures);
    }

    #[test]
    fn missing_code_everywhere_is_rejected() {
        let err = FacilityUpload::try_from(json!({
            "geojson": {"features": [{"properties": {}}, {"geometry": null}]}
        }))
        .unwrap_err();
        assert_eq!(err, UploadShapeError::MissingStationCode);
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert_eq!(
            FacilityUpload::try_from(json!([1, 2])).unwrap_err(),
            UploadShapeError::NotAnObject
        );
    }
}
