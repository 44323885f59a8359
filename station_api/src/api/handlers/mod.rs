use crate::api::error::ApiError;

pub mod facility;
pub mod officers;
pub mod stations;

/// Presence check: `Some` and not blank.
pub fn required(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::Validation(format!("{name} is required")))
}
