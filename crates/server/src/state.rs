use std::sync::Arc;

use service::catalog::ServiceCatalog;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn ServiceCatalog>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn ServiceCatalog>) -> Self {
        Self { catalog }
    }
}
