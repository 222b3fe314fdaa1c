//! Deliberation repository port
//!
//! The orchestrator never touches storage. Callers persist the pending
//! record before a run and the finished record after it through this port.

use async_trait::async_trait;
use council_domain::{Deliberation, DeliberationId, PanelId};
use thiserror::Error;

/// Errors that can occur during repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Deliberation not found: {0}")]
    NotFound(DeliberationId),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Storage for deliberation records
#[async_trait]
pub trait DeliberationRepository: Send + Sync {
    /// Insert or replace a record
    async fn save(&self, deliberation: &Deliberation) -> Result<(), RepositoryError>;

    async fn get(&self, id: DeliberationId) -> Result<Option<Deliberation>, RepositoryError>;

    /// All records, newest first, optionally restricted to one panel
    async fn list(&self, panel: Option<PanelId>) -> Result<Vec<Deliberation>, RepositoryError>;

    /// Remove a record; returns whether it existed
    async fn delete(&self, id: DeliberationId) -> Result<bool, RepositoryError>;
}
