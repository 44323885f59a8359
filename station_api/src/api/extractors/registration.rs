use crate::api::error::ApiError;
use axum::{
    Form,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde::Deserialize;

pub const ID_PROOF_FIELD: &str = "officerIdProof";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationFields {
    pub officer_id: Option<String>,
    pub officer_name: Option<String>,
    pub station_code: Option<String>,
    pub station_name: Option<String>,
    pub station_city: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl RegistrationFields {
    fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "officerId" => &mut self.officer_id,
            "officerName" => &mut self.officer_name,
            "stationCode" => &mut self.station_code,
            "stationName" => &mut self.station_name,
            "stationCity" => &mut self.station_city,
            "username" => &mut self.username,
            "password" => &mut self.password,
            _ => return,
        };
        *slot = Some(value);
    }
}

#[derive(Debug)]
pub struct IdProofFile {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Officer registration form, sent either as `multipart/form-data` (with an
/// optional `officerIdProof` file) or as `application/x-www-form-urlencoded`.
#[derive(Debug)]
pub struct Registration {
    pub fields: RegistrationFields,
    pub id_proof: Option<IdProofFile>,
}

impl<S> FromRequest<S> for Registration
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::Validation(e.body_text()))?;
            return from_multipart(multipart).await;
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<RegistrationFields>::from_request(req, state)
                .await
                .map_err(|e| ApiError::Validation(e.body_text()))?;
            return Ok(Self {
                fields,
                id_proof: None,
            });
        }

        Err(ApiError::Validation(
            "registration must be sent as a form".to_string(),
        ))
    }
}

async fn from_multipart(mut multipart: Multipart) -> Result<Registration, ApiError> {
    let mut fields = RegistrationFields::default();
    let mut id_proof = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == ID_PROOF_FIELD {
            let file_name = field.file_name().map(str::to_owned);
            let bytes = field.bytes().await?;
            // browsers send an empty part when no file was picked
            if !bytes.is_empty() {
                id_proof = Some(IdProofFile { file_name, bytes });
            }
        } else {
            fields.set(&name, field.text().await?);
        }
    }

    Ok(Registration { fields, id_proof })
}
