//! JSON file storage implementation.
//!
//! Stores the clean date as `clean_date.json` in a data directory (default
//! `.cleantime`). A `catalog.json` placed next to it overrides the standard
//! milestone catalog.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use cleantime_core::{Milestone, MilestoneCatalog, StartDate};
use tokio::fs;
use tracing::{debug, info};

use super::{CleanDateRecord, Result, Storage};

const CLEAN_DATE_FILE: &str = "clean_date.json";
const CATALOG_FILE: &str = "catalog.json";

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        debug!("Opened JSON storage at {}", root.display());
        Ok(Self { root })
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn clean_date_path(&self) -> PathBuf {
        self.root.join(CLEAN_DATE_FILE)
    }

    fn catalog_path(&self) -> PathBuf {
        self.root.join(CATALOG_FILE)
    }

    async fn write_record(&self, clean_date: StartDate) -> Result<()> {
        let record = CleanDateRecord {
            clean_date,
            updated_at: chrono::Utc::now(),
        };
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(self.clean_date_path(), json.as_bytes()).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn load_clean_date(&self) -> Result<StartDate> {
        let record: Option<CleanDateRecord> = read_json(&self.clean_date_path()).await?;
        Ok(record.map(|r| r.clean_date).unwrap_or_default())
    }

    async fn save_clean_date(&mut self, date: NaiveDate) -> Result<()> {
        self.write_record(StartDate::Set(date)).await?;
        info!("Saved clean date {}", date);
        Ok(())
    }

    async fn clear_clean_date(&mut self) -> Result<()> {
        self.write_record(StartDate::Unset).await?;
        info!("Cleared clean date");
        Ok(())
    }

    async fn load_catalog(&self) -> Result<Option<MilestoneCatalog>> {
        let Some(entries) = read_json::<Vec<Milestone>>(&self.catalog_path()).await? else {
            return Ok(None);
        };

        let catalog = MilestoneCatalog::new(entries)?;
        debug!("Loaded custom catalog with {} milestones", catalog.len());
        Ok(Some(catalog))
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
