use crate::config::Config;
use crate::store::ContentStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: ContentStore,
    pub config: Arc<Config>,
}
