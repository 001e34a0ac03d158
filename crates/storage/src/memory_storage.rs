//! In-memory storage, for tests and embedding.

use chrono::NaiveDate;
use cleantime_core::{MilestoneCatalog, StartDate};

use super::{Result, Storage};

/// Storage that keeps everything in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    clean_date: StartDate,
    catalog: Option<MilestoneCatalog>,
}

impl MemoryStorage {
    /// Create empty storage (clean date unset).
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a clean date.
    pub fn with_clean_date(mut self, date: NaiveDate) -> Self {
        self.clean_date = StartDate::Set(date);
        self
    }

    /// Seed a custom catalog.
    pub fn with_catalog(mut self, catalog: MilestoneCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn load_clean_date(&self) -> Result<StartDate> {
        Ok(self.clean_date)
    }

    async fn save_clean_date(&mut self, date: NaiveDate) -> Result<()> {
        self.clean_date = StartDate::Set(date);
        Ok(())
    }

    async fn clear_clean_date(&mut self) -> Result<()> {
        self.clean_date = StartDate::Unset;
        Ok(())
    }

    async fn load_catalog(&self) -> Result<Option<MilestoneCatalog>> {
        Ok(self.catalog.clone())
    }
}
