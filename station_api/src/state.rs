use crate::store::DocumentStore;
use crate::uploads::Uploads;
use axum::extract::FromRef;
use std::sync::Arc;

pub type Store = Arc<dyn DocumentStore>;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Store,
    pub uploads: Uploads,
}

impl AppState {
    pub fn new(store: impl DocumentStore + 'static, uploads: Uploads) -> Self {
        Self {
            store: Arc::new(store),
            uploads,
        }
    }
}
