mod api_models;
mod error;
mod extractors;
mod handlers;
mod router;

pub use error::{ApiError, ErrorMessage};
pub use router::router;
