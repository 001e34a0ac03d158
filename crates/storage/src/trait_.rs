//! Storage trait abstraction.

use async_trait::async_trait;
use chrono::NaiveDate;
use cleantime_core::{CatalogError, MilestoneCatalog, StartDate, Time};
use serde::{Deserialize, Serialize};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored catalog violates the ordering invariant
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Persisted clean-date record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanDateRecord {
    /// Clean date, `null` when unset
    pub clean_date: StartDate,

    /// Last write
    pub updated_at: Time,
}

/// Storage abstraction for the clean date and catalog overrides.
///
/// The clean-time calculator never touches storage itself; callers load the
/// clean date through this trait and pass it in.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load the clean date. A missing record is `StartDate::Unset`.
    async fn load_clean_date(&self) -> Result<StartDate>;

    /// Save (create or replace) the clean date.
    async fn save_clean_date(&mut self, date: NaiveDate) -> Result<()>;

    /// Reset to the unset state.
    async fn clear_clean_date(&mut self) -> Result<()>;

    /// Load a custom milestone catalog, if one is configured.
    async fn load_catalog(&self) -> Result<Option<MilestoneCatalog>>;
}
