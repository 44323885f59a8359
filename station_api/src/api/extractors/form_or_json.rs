use crate::api::error::ApiError;
use crate::api::extractors::json::{JsonBody, has_json_content_type};
use axum::{
    Form,
    extract::{FromRequest, Request},
    http::{HeaderMap, header::CONTENT_TYPE},
};
use serde::de::DeserializeOwned;

/// Body sent either as `application/json` or as
/// `application/x-www-form-urlencoded`.
pub struct FormOrJson<T>(pub T);

pub fn has_form_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

impl<S, T> FromRequest<S> for FormOrJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if has_json_content_type(req.headers()) {
            let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;
            return Ok(Self(value));
        }

        if has_form_content_type(req.headers()) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::Validation(e.body_text()))?;
            return Ok(Self(value));
        }

        Err(ApiError::Validation(
            "body must be JSON or a urlencoded form".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn form_content_type_allows_parameters() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
        );
        assert!(has_form_content_type(&headers));

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("multipart/form-data"));
        assert!(!has_form_content_type(&headers));
        assert!(!has_form_content_type(&HeaderMap::new()));
    }
}
