use std::sync::Arc;

use crate::config::AuthSettings;
use crate::registry::ModuleStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ModuleStore>,
    pub auth: Arc<AuthSettings>,
}

impl AppState {
    pub fn new(store: Arc<dyn ModuleStore>, auth: AuthSettings) -> Self {
        Self {
            store,
            auth: Arc::new(auth),
        }
    }
}
