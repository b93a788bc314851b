//! Fixture loading
//!
//! Collections live in a directory as `<collection>.json`, each file holding a
//! JSON array of records. All files of a load are read concurrently.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, info, warn};

use super::{Resource, SharedStore, StoreSnapshot};
use crate::error::{Result, StoreError};

/// Something that can produce a full store snapshot
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Load every collection this source knows about
    async fn load(&self) -> Result<StoreSnapshot>;
}

/// Loads collections from `<directory>/<collection>.json`
#[derive(Debug, Clone)]
pub struct DirectorySource {
    /// Fixture directory
    directory: PathBuf,

    /// Collections to load
    collections: Vec<String>,
}

impl DirectorySource {
    /// Create a new directory source
    ///
    /// # Arguments
    /// * `directory` - Directory holding the fixture files
    /// * `collections` - Collection names, matching the file stems
    pub fn new(directory: impl Into<PathBuf>, collections: Vec<String>) -> Self {
        Self {
            directory: directory.into(),
            collections,
        }
    }

    /// Fixture directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Collection names this source loads
    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    async fn load_collection(&self, name: &str) -> Result<Vec<Resource>> {
        let path = self.directory.join(format!("{name}.json"));
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| StoreError::ReadFailed {
                collection: name.to_string(),
                message: format!("{}: {}", path.display(), e),
            })?;

        parse_collection(name, &text)
    }
}

#[async_trait]
impl SnapshotSource for DirectorySource {
    async fn load(&self) -> Result<StoreSnapshot> {
        if !tokio::fs::try_exists(&self.directory).await.unwrap_or(false) {
            return Err(StoreError::DirectoryNotFound(self.directory.display().to_string()).into());
        }

        let loads = self.collections.iter().map(|name| async move {
            let records = self.load_collection(name).await;
            (name, records)
        });

        let mut snapshot = StoreSnapshot::new();
        for (name, records) in join_all(loads).await {
            match records {
                Ok(records) => {
                    debug!("Loaded {} records into '{}'", records.len(), name);
                    snapshot.insert(name.clone(), records);
                }
                Err(e) => {
                    warn!("{}", e);
                    snapshot.insert(name.clone(), Vec::new());
                }
            }
        }

        Ok(snapshot)
    }
}

/// Parse the text of one collection file
///
/// # Arguments
/// * `name` - Collection name, used in error messages
/// * `text` - File contents, a JSON array of records
pub fn parse_collection(name: &str, text: &str) -> Result<Vec<Resource>> {
    serde_json::from_str(text).map_err(|e| {
        StoreError::InvalidCollection {
            collection: name.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Load a fresh snapshot from `source` and install it into `store`
///
/// # Returns
/// * `Result<bool>` - Whether the snapshot was installed; false when a newer
///   refresh finished first
pub async fn refresh(store: &SharedStore, source: &dyn SnapshotSource) -> Result<bool> {
    let generation = store.begin_refresh();
    let snapshot = source.load().await?;
    let records = snapshot.record_count();

    let installed = store.install(generation, snapshot);
    if installed {
        info!("Store refreshed: {} records (generation {})", records, generation);
    }
    Ok(installed)
}
