use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use billflow_core::domain::Dataset;
use tokio::sync::Mutex;

use super::StoreError;

/// The whole dataset as a single pretty-printed JSON document.
///
/// Every save replaces the document. Writes go to a sibling temp file that is
/// renamed over the target, so readers never observe a half-written file.
/// Read-modify-write cycles inside this process are serialized by
/// [`JsonFileStore::update`]; other processes writing the same file are not
/// coordinated.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Dataset, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.path.clone()));
            }
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        serde_json::from_slice(&raw).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Like [`load`](Self::load), but a missing file is an empty dataset.
    pub async fn load_or_empty(&self) -> Result<Dataset, StoreError> {
        match self.load().await {
            Err(e) if e.is_not_found() => Ok(Dataset::default()),
            other => other,
        }
    }

    /// Never fails: any read or parse error yields the default dataset.
    ///
    /// Callers cannot tell an empty dataset from a failed read; prefer
    /// [`load_or_empty`](Self::load_or_empty) where that matters.
    pub async fn load_or_default(&self) -> Dataset {
        match self.load().await {
            Ok(dataset) => dataset,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default dataset");
                Dataset::default()
            }
        }
    }

    pub async fn save(&self, dataset: &Dataset) -> Result<(), StoreError> {
        let res = self.write_document(dataset).await;
        if let Err(e) = &res {
            tracing::error!(error = %e, path = %self.path.display(), "failed to save dataset");
            metrics::counter!("store_save_errors_total").increment(1);
        }
        res
    }

    /// Load, mutate and save while holding the write lock.
    ///
    /// A missing file starts from an empty dataset. A corrupt file aborts the
    /// update instead of being overwritten. Nothing is written when `f`
    /// returns an error.
    pub async fn update<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Dataset) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.write_lock.lock().await;

        let mut dataset = self.load_or_empty().await?;
        let out = f(&mut dataset)?;
        self.save(&dataset).await?;

        Ok(out)
    }

    async fn write_document(&self, dataset: &Dataset) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(dataset).map_err(StoreError::Serialize)?;
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "data.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
