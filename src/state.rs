use std::sync::Arc;
use crate::config::Limits;
use crate::store::SupporterStore;
// app's shared state, no supporter data is held here

pub struct AppState {
    pub store: Option<Arc<dyn SupporterStore>>, // None when the store is not configured
    pub limits: Limits,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn SupporterStore>>, limits: Limits) -> Self {
        Self { store, limits }
    }
}
