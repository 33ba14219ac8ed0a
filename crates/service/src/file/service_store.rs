use std::sync::Arc;

use chrono::Utc;
use configs::ReadFailurePolicy;
use models::service::{Attributes, ServiceId, ServiceRecord};
use tracing::info;

use crate::catalog::ServiceCatalog;
use crate::errors::ServiceError;
use crate::storage::json_doc_store::JsonDocStore;

/// File-backed services catalog: one JSON array of listings.
#[derive(Clone)]
pub struct ServiceStore {
    doc: Arc<JsonDocStore<ServiceRecord>>,
}

/// Millisecond clock value, bumped past every id already in use.
fn allocate_id(records: &[ServiceRecord], now_millis: i64) -> Result<ServiceId, ServiceError> {
    match records.iter().map(|r| r.id).max() {
        Some(max) if max >= now_millis => max
            .checked_add(1)
            .ok_or_else(|| ServiceError::Storage(format!("no id available after {max}"))),
        _ => Ok(now_millis),
    }
}

impl ServiceStore {
    /// Open the store; creates the document holding `[]` if it is missing.
    pub async fn new<P: Into<std::path::PathBuf>>(
        path: P,
        on_read_error: ReadFailurePolicy,
    ) -> Result<Arc<Self>, ServiceError> {
        let doc = JsonDocStore::<ServiceRecord>::new(path, on_read_error).await?;
        Ok(Arc::new(Self { doc }))
    }

    pub async fn initialize(&self) -> Result<(), ServiceError> {
        self.doc.initialize().await
    }

    pub async fn load_all(&self) -> Result<Vec<ServiceRecord>, ServiceError> {
        self.doc.load_all().await
    }

    pub async fn save_all(&self, records: &[ServiceRecord]) -> Result<(), ServiceError> {
        self.doc.save_all(records).await
    }

    /// All listings in insertion order.
    pub async fn list(&self) -> Result<Vec<ServiceRecord>, ServiceError> {
        self.load_all().await
    }

    /// Listings placed in the given homepage section ("General", "Trending", ...).
    pub async fn list_by_display_category(&self, display_category: &str) -> Result<Vec<ServiceRecord>, ServiceError> {
        let mut records = self.load_all().await?;
        records.retain(|r| r.display_category() == Some(display_category));
        Ok(records)
    }

    /// Listings with the given business category.
    pub async fn list_by_category(&self, category: &str) -> Result<Vec<ServiceRecord>, ServiceError> {
        let mut records = self.load_all().await?;
        records.retain(|r| r.category() == Some(category));
        Ok(records)
    }

    pub async fn get_by_id(&self, id: ServiceId) -> Result<ServiceRecord, ServiceError> {
        self.load_all()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| ServiceError::not_found("service"))
    }

    pub async fn create(&self, input: Attributes) -> Result<ServiceRecord, ServiceError> {
        let created = self
            .doc
            .mutate(|records| {
                let now = Utc::now();
                let id = allocate_id(records, now.timestamp_millis())?;
                let rec = ServiceRecord::new(id, input, now);
                records.push(rec.clone());
                Ok(rec)
            })
            .await?;
        info!(id = created.id, title = created.title().unwrap_or_default(), "service created");
        Ok(created)
    }

    pub async fn update(&self, id: ServiceId, partial: Attributes) -> Result<ServiceRecord, ServiceError> {
        let updated = self
            .doc
            .mutate(|records| {
                let rec = records
                    .iter_mut()
                    .find(|r| r.id == id)
                    .ok_or_else(|| ServiceError::not_found("service"))?;
                rec.merge(partial, Utc::now());
                Ok(rec.clone())
            })
            .await?;
        info!(id, "service updated");
        Ok(updated)
    }

    /// Remove a listing and persist; returns whether it existed.
    /// Nothing is written when the id is unknown.
    pub async fn delete(&self, id: ServiceId) -> Result<bool, ServiceError> {
        let res = self
            .doc
            .mutate(|records| {
                let before = records.len();
                records.retain(|r| r.id != id);
                if records.len() == before {
                    return Err(ServiceError::not_found("service"));
                }
                Ok(())
            })
            .await;
        match res {
            Ok(()) => {
                info!(id, "service deleted");
                Ok(true)
            }
            Err(ServiceError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[async_trait::async_trait]
impl ServiceCatalog for ServiceStore {
    async fn list(&self) -> Result<Vec<ServiceRecord>, ServiceError> {
        self.list().await
    }

    async fn list_by_display_category(
        &self,
        display_category: &str,
    ) -> Result<Vec<ServiceRecord>, ServiceError> {
        self.list_by_display_category(display_category).await
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<ServiceRecord>, ServiceError> {
        self.list_by_category(category).await
    }

    async fn get(&self, id: ServiceId) -> Result<ServiceRecord, ServiceError> {
        self.get_by_id(id).await
    }

    async fn create(&self, input: Attributes) -> Result<ServiceRecord, ServiceError> {
        self.create(input).await
    }

    async fn update(
        &self,
        id: ServiceId,
        partial: Attributes,
    ) -> Result<ServiceRecord, ServiceError> {
        self.update(id, partial).await
    }

    async fn delete(&self, id: ServiceId) -> Result<bool, ServiceError> {
        self.delete(id).await
    }
}
