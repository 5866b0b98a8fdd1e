//! Ordered record collection with optional JSON-file backing.

use std::path::{Path, PathBuf};

use pipeline::CatalogError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Records of one catalog, optionally mirrored to a JSON file.
///
/// The file is rewritten in full on every insert (write to a sibling temp
/// file, then rename over the original). A record only becomes visible in
/// memory after it has been persisted.
pub(crate) struct Collection<R> {
    records: Mutex<Vec<R>>,
    file: Option<PathBuf>,
}

impl<R> Collection<R>
where
    R: Serialize + DeserializeOwned + Clone + Send,
{
    pub(crate) fn in_memory(records: Vec<R>) -> Self {
        Self {
            records: Mutex::new(records),
            file: None,
        }
    }

    /// Loads `file` if it exists, otherwise starts empty and creates it on
    /// the first insert.
    pub(crate) async fn open(file: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let file = file.into();
        let records = match tokio::fs::read(&file).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| CatalogError::Serialization {
                reason: format!("{}: {e}", file.display()),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %file.display(), "catalog file not found, starting empty");
                Vec::new()
            }
            Err(e) => return Err(storage_error(&file, e)),
        };
        info!(path = %file.display(), count = records.len(), "opened catalog");
        Ok(Self {
            records: Mutex::new(records),
            file: Some(file),
        })
    }

    /// Builds a record from the current contents, persists, then appends it.
    pub(crate) async fn append_with<F>(&self, build: F) -> Result<R, CatalogError>
    where
        F: FnOnce(&[R]) -> R,
    {
        let mut records = self.records.lock().await;
        let record = build(&records);

        if let Some(file) = &self.file {
            let mut next = records.clone();
            next.push(record.clone());
            write_atomically(file, &next).await?;
            *records = next;
        } else {
            records.push(record.clone());
        }
        Ok(record)
    }

    pub(crate) async fn snapshot(&self) -> Vec<R> {
        self.records.lock().await.clone()
    }
}

async fn write_atomically<R: Serialize>(file: &Path, records: &[R]) -> Result<(), CatalogError> {
    let bytes = serde_json::to_vec_pretty(records).map_err(|e| CatalogError::Serialization {
        reason: e.to_string(),
    })?;
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| storage_error(parent, e))?;
    }
    let mut temp = file.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);
    tokio::fs::write(&temp, bytes)
        .await
        .map_err(|e| storage_error(&temp, e))?;
    tokio::fs::rename(&temp, file)
        .await
        .map_err(|e| storage_error(file, e))
}

fn storage_error(path: &Path, err: std::io::Error) -> CatalogError {
    CatalogError::Storage {
        reason: format!("{}: {err}", path.display()),
    }
}
