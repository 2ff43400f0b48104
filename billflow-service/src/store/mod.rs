pub mod json_file;

use std::path::PathBuf;

pub use json_file::JsonFileStore;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("data file {} not found", .0.display())]
    NotFound(PathBuf),
    #[error("failed to access data file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("data file {} does not hold a valid dataset: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize dataset: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
