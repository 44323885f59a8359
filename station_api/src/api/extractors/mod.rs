pub mod form_or_json;
pub mod json;
pub mod registration;
