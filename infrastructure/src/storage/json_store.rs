//! JSON file store for deliberation records.
//!
//! The whole collection lives in one JSON array. Every mutation rewrites the
//! file through a temporary sibling and a rename, so readers never observe a
//! half-written document.

use async_trait::async_trait;
use chrono::Utc;
use council_application::{DeliberationRepository, RepositoryError};
use council_domain::{Deliberation, DeliberationId, DeliberationStatus, PanelId};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Error message stamped on runs that were in flight when the process died
pub const INTERRUPTED_MESSAGE: &str = "Interrupted by server restart";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for RepositoryError {
    fn from(e: StoreError) -> Self {
        RepositoryError::Storage(e.to_string())
    }
}

/// File-backed [`DeliberationRepository`]
pub struct JsonDeliberationStore {
    path: PathBuf,
    records: Mutex<BTreeMap<DeliberationId, Deliberation>>,
}

impl JsonDeliberationStore {
    /// Open (or create on first write) the store at `path`.
    ///
    /// Malformed entries are skipped. Records left `in_progress` by a previous
    /// process are marked as errors and the file is rewritten.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut records = load_records(&path).await?;

        let recovered = recover_interrupted(&mut records);
        if recovered > 0 {
            info!(
                "Marked {} interrupted deliberation(s) as failed in {}",
                recovered,
                path.display()
            );
            write_atomic(&path, &records).await?;
        }

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DeliberationRepository for JsonDeliberationStore {
    async fn save(&self, deliberation: &Deliberation) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().await;
        let previous = records.insert(deliberation.id, deliberation.clone());

        if let Err(e) = write_atomic(&self.path, &records).await {
            // Keep memory consistent with the file
            match previous {
                Some(prev) => records.insert(deliberation.id, prev),
                None => records.remove(&deliberation.id),
            };
            return Err(e.into());
        }

        debug!("Saved deliberation {} ({})", deliberation.id, deliberation.status);
        Ok(())
    }

    async fn get(&self, id: DeliberationId) -> Result<Option<Deliberation>, RepositoryError> {
        Ok(self.records.lock().await.get(&id).cloned())
    }

    async fn list(&self, panel: Option<PanelId>) -> Result<Vec<Deliberation>, RepositoryError> {
        let records = self.records.lock().await;
        let mut list: Vec<Deliberation> = records
            .values()
            .filter(|d| panel.is_none_or(|p| d.panel_id == p))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn delete(&self, id: DeliberationId) -> Result<bool, RepositoryError> {
        let mut records = self.records.lock().await;
        let Some(removed) = records.remove(&id) else {
            return Ok(false);
        };

        if let Err(e) = write_atomic(&self.path, &records).await {
            records.insert(id, removed);
            return Err(e.into());
        }
        Ok(true)
    }
}

async fn load_records(path: &Path) -> Result<BTreeMap<DeliberationId, Deliberation>, StoreError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let entries: Vec<serde_json::Value> = serde_json::from_str(&content)?;
    let mut records = BTreeMap::new();
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Deliberation>(entry) {
            Ok(record) => {
                records.insert(record.id, record);
            }
            Err(e) => warn!(
                "Skipping malformed deliberation #{} in {}: {}",
                index,
                path.display(),
                e
            ),
        }
    }
    Ok(records)
}

fn recover_interrupted(records: &mut BTreeMap<DeliberationId, Deliberation>) -> usize {
    let mut recovered = 0;
    for record in records.values_mut() {
        if record.status == DeliberationStatus::InProgress && record.fail(INTERRUPTED_MESSAGE) {
            record.completed_at = Some(Utc::now());
            recovered += 1;
        }
    }
    recovered
}

async fn write_atomic(
    path: &Path,
    records: &BTreeMap<DeliberationId, Deliberation>,
) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let mut list: Vec<&Deliberation> = records.values().collect();
    list.sort_by_key(|d| d.created_at);
    let json = serde_json::to_string_pretty(&list)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, json).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
    Ok(())
}
