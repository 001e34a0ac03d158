//! Clean-time tracking service.
//!
//! Ties the clean date held by a [`Storage`] backend to the pure calculator.

use chrono::NaiveDate;
use cleantime_core::{CalendarDate, CleanTimeError, MilestoneCatalog, MilestoneStatus, StartDate};
use cleantime_storage::{Storage, StorageError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calculator::{self, CleanTimeSummary};

/// Errors raised by the tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Storage backend failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Clean-time query failed
    #[error(transparent)]
    CleanTime(#[from] CleanTimeError),
}

impl TrackerError {
    /// Whether this error means "no date set".
    pub fn is_unset(&self) -> bool {
        matches!(self, TrackerError::CleanTime(e) if e.is_unset())
    }
}

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Configuration for the tracker.
#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    /// Accept clean dates after "today" when setting them
    pub allow_future_start: bool,
    /// Catalog override; falls back to storage, then the standard catalog
    pub catalog: Option<MilestoneCatalog>,
}

/// Everything the presentation layer needs for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Reference date the snapshot was computed for
    pub taken_for: NaiveDate,

    /// Summary view
    pub summary: CleanTimeSummary,

    /// Full gallery, in catalog order
    pub milestones: Vec<MilestoneStatus>,
}

/// Clean-time tracker over a storage backend.
pub struct CleanTimeTracker<S: Storage> {
    storage: S,
    catalog: MilestoneCatalog,
    config: TrackerConfig,
}

impl<S: Storage> CleanTimeTracker<S> {
    /// Create a tracker using the standard catalog.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            catalog: MilestoneCatalog::standard().clone(),
            config: TrackerConfig::default(),
        }
    }

    /// Create a tracker, resolving the catalog from config, then storage,
    /// then the standard catalog.
    pub async fn open(storage: S, config: TrackerConfig) -> Result<Self> {
        let catalog = match config.catalog.clone() {
            Some(catalog) => catalog,
            None => match storage.load_catalog().await? {
                Some(catalog) => {
                    info!("Using custom catalog with {} milestones", catalog.len());
                    catalog
                }
                None => MilestoneCatalog::standard().clone(),
            },
        };

        Ok(Self {
            storage,
            catalog,
            config,
        })
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        if let Some(catalog) = &config.catalog {
            self.catalog = catalog.clone();
        }
        self.config = config;
        self
    }

    /// Catalog in use.
    pub fn catalog(&self) -> &MilestoneCatalog {
        &self.catalog
    }

    /// Current clean date.
    pub async fn start_date(&self) -> Result<StartDate> {
        Ok(self.storage.load_clean_date().await?)
    }

    /// Set the clean date.
    ///
    /// A date after `today` is rejected with `InvalidRange` unless the
    /// config allows it.
    pub async fn set_start_date(
        &mut self,
        date: NaiveDate,
        today: impl CalendarDate,
    ) -> Result<()> {
        let today = today.calendar_date();
        if date > today {
            if !self.config.allow_future_start {
                return Err(CleanTimeError::InvalidRange {
                    start: date,
                    reference: today,
                    elapsed_days: today.signed_duration_since(date).num_days(),
                }
                .into());
            }
            warn!("Clean date {} is after {}", date, today);
        }

        self.storage.save_clean_date(date).await?;
        Ok(())
    }

    /// Reset the clean date to unset.
    pub async fn clear_start_date(&mut self) -> Result<()> {
        self.storage.clear_clean_date().await?;
        Ok(())
    }

    /// Elapsed days since the stored clean date, unclamped.
    pub async fn elapsed_days(&self, reference: impl CalendarDate) -> Result<i64> {
        let start = self.start_date().await?;
        Ok(calculator::elapsed_days(start, reference)?)
    }

    /// Summary view for `reference`.
    pub async fn summary(&self, reference: impl CalendarDate) -> Result<CleanTimeSummary> {
        let start = self.start_date().await?;
        Ok(calculator::summarize(&self.catalog, start, reference)?)
    }

    /// Gallery view for `reference`.
    pub async fn milestones(&self, reference: impl CalendarDate) -> Result<Vec<MilestoneStatus>> {
        let start = self.start_date().await?;
        Ok(calculator::milestone_statuses(&self.catalog, start, reference)?)
    }

    /// Summary and gallery together, from a single read of the clean date.
    pub async fn snapshot(&self, reference: impl CalendarDate) -> Result<ProgressSnapshot> {
        let reference = reference.calendar_date();
        let start = self.start_date().await?;

        let result = calculator::summarize(&self.catalog, start, reference).and_then(|summary| {
            let milestones = calculator::milestone_statuses(&self.catalog, start, reference)?;
            Ok(ProgressSnapshot {
                taken_for: reference,
                summary,
                milestones,
            })
        });

        match &result {
            Ok(snapshot) => debug!(
                "Snapshot for {}: {} days, {} of {} milestones",
                reference,
                snapshot.summary.elapsed_days,
                snapshot.summary.achieved_count,
                self.catalog.len()
            ),
            Err(CleanTimeError::InvalidRange { start, .. }) => {
                warn!("Stored clean date {} is after {}", start, reference)
            }
            Err(_) => {}
        }

        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleantime_core::MilestoneTier;
    use cleantime_storage::MemoryStorage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn small_catalog() -> MilestoneCatalog {
        MilestoneCatalog::from_entries([
            (1, "First Day", MilestoneTier::Early),
            (7, "One Week", MilestoneTier::Early),
            (30, "One Month", MilestoneTier::Early),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_unset_tracker_reports_unset() {
        let tracker = CleanTimeTracker::new(MemoryStorage::new());
        let err = tracker.snapshot(date(2023, 1, 8)).await.unwrap_err();
        assert!(err.is_unset());
        assert!(tracker.elapsed_days(date(2023, 1, 8)).await.unwrap_err().is_unset());
    }

    #[tokio::test]
    async fn test_snapshot_uses_stored_date() {
        let storage = MemoryStorage::new().with_clean_date(date(2023, 1, 1));
        let tracker = CleanTimeTracker::new(storage).with_config(TrackerConfig {
            catalog: Some(small_catalog()),
            ..Default::default()
        });

        let snapshot = tracker.snapshot(date(2023, 1, 20)).await.unwrap();
        assert_eq!(snapshot.taken_for, date(2023, 1, 20));
        assert_eq!(snapshot.summary.elapsed_days, 19);
        assert_eq!(snapshot.summary.progress, 52);
        assert_eq!(snapshot.milestones.len(), 3);
        assert_eq!(snapshot.milestones.iter().filter(|m| m.achieved).count(), 2);
    }

    #[tokio::test]
    async fn test_set_rejects_future_date() {
        let mut tracker = CleanTimeTracker::new(MemoryStorage::new());
        let err = tracker
            .set_start_date(date(2023, 6, 1), date(2023, 5, 1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::CleanTime(CleanTimeError::InvalidRange { elapsed_days: -31, .. })
        ));
        assert_eq!(tracker.start_date().await.unwrap(), StartDate::Unset);
    }

    #[tokio::test]
    async fn test_set_allows_future_date_when_configured() {
        let mut tracker = CleanTimeTracker::new(MemoryStorage::new()).with_config(TrackerConfig {
            allow_future_start: true,
            ..Default::default()
        });
        tracker
            .set_start_date(date(2023, 6, 1), date(2023, 5, 1))
            .await
            .unwrap();

        // Stored, but queries surface the anomaly instead of clamping
        assert_eq!(tracker.elapsed_days(date(2023, 5, 1)).await.unwrap(), -31);
        let err = tracker.summary(date(2023, 5, 1)).await.unwrap_err();
        assert!(matches!(
            err,
            TrackerError::CleanTime(CleanTimeError::InvalidRange { .. })
        ));
    }

    #[tokio::test]
    async fn test_set_then_clear() {
        let mut tracker = CleanTimeTracker::new(MemoryStorage::new());
        tracker
            .set_start_date(date(2023, 1, 1), date(2023, 1, 1))
            .await
            .unwrap();
        assert_eq!(
            tracker.start_date().await.unwrap(),
            StartDate::Set(date(2023, 1, 1))
        );
        assert_eq!(tracker.summary(date(2023, 1, 1)).await.unwrap().elapsed_days, 0);

        tracker.clear_start_date().await.unwrap();
        assert!(tracker.milestones(date(2023, 1, 1)).await.unwrap_err().is_unset());
    }

    #[tokio::test]
    async fn test_open_prefers_stored_catalog() {
        let storage = MemoryStorage::new().with_catalog(small_catalog());
        let tracker = CleanTimeTracker::open(storage, TrackerConfig::default())
            .await
            .unwrap();
        assert_eq!(tracker.catalog().len(), 3);

        let tracker = CleanTimeTracker::open(MemoryStorage::new(), TrackerConfig::default())
            .await
            .unwrap();
        assert_eq!(tracker.catalog(), MilestoneCatalog::standard());
    }
}
