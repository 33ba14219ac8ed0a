use async_trait::async_trait;
use models::service::{Attributes, ServiceId, ServiceRecord};

use crate::errors::ServiceError;

/// Trait abstraction for the services catalog (CRUD of listings).
/// The HTTP layer only sees this; the file-backed store is one implementation.
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    async fn list(&self) -> Result<Vec<ServiceRecord>, ServiceError>;
    async fn list_by_display_category(&self, display_category: &str) -> Result<Vec<ServiceRecord>, ServiceError>;
    async fn list_by_category(&self, category: &str) -> Result<Vec<ServiceRecord>, ServiceError>;
    async fn get(&self, id: ServiceId) -> Result<ServiceRecord, ServiceError>;
    async fn create(&self, input: Attributes) -> Result<ServiceRecord, ServiceError>;
    async fn update(&self, id: ServiceId, partial: Attributes) -> Result<ServiceRecord, ServiceError>;
    async fn delete(&self, id: ServiceId) -> Result<bool, ServiceError>;
}
