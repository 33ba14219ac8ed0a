use std::{
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
};

use configs::ReadFailurePolicy;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::Mutex};
use tracing::{debug, error, info};

use crate::errors::ServiceError;

/// Generic JSON file-backed sequence store.
///
/// Persists a `Vec<T>` as one pretty-printed JSON array. Nothing is cached:
/// every read goes back to the file. Writes replace the whole document via a
/// temp file and `rename`, so readers see either the old or the new document.
/// Read-modify-write cycles through [`JsonDocStore::mutate`] are serialized
/// per store instance.
pub struct JsonDocStore<T> {
    file_path: PathBuf,
    on_read_error: ReadFailurePolicy,
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDocStore<T>
where
    T: Serialize + DeserializeOwned + Send,
{
    /// Open the store at `path`, creating parent directories and an empty document if missing.
    pub async fn new<P: Into<PathBuf>>(
        path: P,
        on_read_error: ReadFailurePolicy,
    ) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::Storage(format!("create {}: {e}", parent.display())))?;
        }
        let store = Self { file_path, on_read_error, write_lock: Mutex::new(()), _marker: PhantomData };
        store.initialize().await?;
        Ok(Arc::new(store))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Write an empty array if the document does not exist yet. Safe to call repeatedly.
    pub async fn initialize(&self) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;
        match fs::metadata(&self.file_path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.write_document(&[]).await?;
                info!(path = %self.file_path.display(), "created empty document");
                Ok(())
            }
            Err(e) => Err(ServiceError::Storage(format!("stat {}: {e}", self.file_path.display()))),
        }
    }

    /// Read and parse the whole document.
    pub async fn load_all(&self) -> Result<Vec<T>, ServiceError> {
        match self.read_document().await {
            Ok(items) => Ok(items),
            Err(e) => match self.on_read_error {
                ReadFailurePolicy::Fail => {
                    error!(path = %self.file_path.display(), error = %e, "failed to load document");
                    Err(e)
                }
                ReadFailurePolicy::Empty => {
                    error!(path = %self.file_path.display(), error = %e, "failed to load document; treating it as empty");
                    Ok(Vec::new())
                }
            },
        }
    }

    /// Replace the whole document with `items`.
    pub async fn save_all(&self, items: &[T]) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;
        self.write_document(items).await
    }

    /// Load, apply `f`, and persist the result under the store lock.
    /// When `f` fails the document is left untouched.
    pub async fn mutate<R, F>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut items = self.load_all().await?;
        let out = f(&mut items)?;
        self.write_document(&items).await?;
        Ok(out)
    }

    async fn read_document(&self) -> Result<Vec<T>, ServiceError> {
        let bytes = fs::read(&self.file_path)
            .await
            .map_err(|e| ServiceError::Storage(format!("read {}: {e}", self.file_path.display())))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::Corrupt(format!("{}: {e}", self.file_path.display())))
    }

    // Caller holds `write_lock`.
    async fn write_document(&self, items: &[T]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(items).map_err(|e| ServiceError::Storage(e.to_string()))?;
        let tmp = self.temp_path();
        if let Err(e) = fs::write(&tmp, &data).await {
            let _ = fs::remove_file(&tmp).await;
            error!(path = %tmp.display(), error = %e, "failed to write temp document");
            return Err(ServiceError::Storage(format!("write {}: {e}", tmp.display())));
        }
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            error!(path = %self.file_path.display(), error = %e, "failed to replace document");
            return Err(ServiceError::Storage(format!("replace {}: {e}", self.file_path.display())));
        }
        debug!(path = %self.file_path.display(), count = items.len(), bytes = data.len(), "document saved");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        self.file_path.with_file_name(format!(".{name}.tmp"))
    }
}
