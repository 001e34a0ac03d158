//! Milestone catalog - the ordered set of thresholds every query runs over.

use std::sync::OnceLock;

use serde::Serialize;

use crate::error::CatalogError;
use crate::milestone::{Milestone, MilestoneTier};

/// Immutable, ascending-ordered milestone catalog.
///
/// Invariants, checked on construction:
/// - at least one entry
/// - thresholds strictly increasing (and therefore unique)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MilestoneCatalog {
    entries: Vec<Milestone>,
}

impl MilestoneCatalog {
    /// Build a catalog, validating the ordering invariant.
    pub fn new(entries: Vec<Milestone>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        for pair in entries.windows(2) {
            let (previous, next) = (pair[0].threshold_days, pair[1].threshold_days);
            if next == previous {
                return Err(CatalogError::Duplicate(next));
            }
            if next < previous {
                return Err(CatalogError::NotAscending { previous, next });
            }
        }

        Ok(Self { entries })
    }

    /// Build a catalog from `(threshold, name, tier)` triples.
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = (u32, &'a str, MilestoneTier)>,
    ) -> Result<Self, CatalogError> {
        Self::new(
            entries
                .into_iter()
                .map(|(days, name, tier)| Milestone::new(days, name, tier))
                .collect(),
        )
    }

    /// Load a catalog from a JSON array of milestones.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<Milestone> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// The process-wide standard catalog.
    pub fn standard() -> &'static MilestoneCatalog {
        static STANDARD: OnceLock<MilestoneCatalog> = OnceLock::new();
        STANDARD.get_or_init(|| MilestoneCatalog {
            entries: STANDARD_MILESTONES
                .iter()
                .map(|&(days, name, tier)| Milestone::new(days, name, tier))
                .collect(),
        })
    }

    /// Entries in ascending threshold order.
    pub fn entries(&self) -> &[Milestone] {
        &self.entries
    }

    /// Iterate entries in ascending threshold order.
    pub fn iter(&self) -> std::slice::Iter<'_, Milestone> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Smallest-threshold entry.
    pub fn first(&self) -> &Milestone {
        &self.entries[0]
    }

    /// Largest-threshold entry.
    pub fn last(&self) -> &Milestone {
        &self.entries[self.entries.len() - 1]
    }

    /// Look up an entry by exact threshold.
    pub fn get(&self, threshold_days: u32) -> Option<&Milestone> {
        self.entries
            .binary_search_by_key(&threshold_days, |m| m.threshold_days)
            .ok()
            .map(|i| &self.entries[i])
    }
}

impl<'a> IntoIterator for &'a MilestoneCatalog {
    type Item = &'a Milestone;
    type IntoIter = std::slice::Iter<'a, Milestone>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

const STANDARD_MILESTONES: &[(u32, &str, MilestoneTier)] = &[
    (1, "First Day", MilestoneTier::Early),
    (7, "One Week", MilestoneTier::Early),
    (30, "One Month", MilestoneTier::Early),
    (60, "Two Months", MilestoneTier::Early),
    (90, "Three Months", MilestoneTier::Medium),
    (180, "Six Months", MilestoneTier::Medium),
    (270, "Nine Months", MilestoneTier::Medium),
    (365, "One Year", MilestoneTier::Major),
    (730, "Two Years", MilestoneTier::Major),
    (1095, "Three Years", MilestoneTier::Major),
    (1825, "Five Years", MilestoneTier::Major),
    (3650, "Ten Years", MilestoneTier::Major),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_is_ordered() {
        let catalog = MilestoneCatalog::standard();
        assert_eq!(catalog.len(), 12);
        assert_eq!(catalog.first().threshold_days, 1);
        assert_eq!(catalog.last().threshold_days, 3650);
        assert!(catalog
            .entries()
            .windows(2)
            .all(|w| w[0].threshold_days < w[1].threshold_days));
        // Re-validates cleanly through the public constructor
        assert!(MilestoneCatalog::new(catalog.entries().to_vec()).is_ok());
    }

    #[test]
    fn test_entries_are_restartable() {
        let catalog = MilestoneCatalog::standard();
        let first: Vec<u32> = catalog.iter().map(|m| m.threshold_days).collect();
        let second: Vec<u32> = catalog.iter().map(|m| m.threshold_days).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(MilestoneCatalog::new(vec![]), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_rejects_duplicate() {
        let result = MilestoneCatalog::from_entries([
            (1, "a", MilestoneTier::Early),
            (7, "b", MilestoneTier::Early),
            (7, "c", MilestoneTier::Early),
        ]);
        assert!(matches!(result, Err(CatalogError::Duplicate(7))));
    }

    #[test]
    fn test_rejects_descending() {
        let result = MilestoneCatalog::from_entries([
            (30, "a", MilestoneTier::Early),
            (7, "b", MilestoneTier::Early),
        ]);
        assert!(matches!(
            result,
            Err(CatalogError::NotAscending { previous: 30, next: 7 })
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"threshold_days": 1, "name": "Day One"},
            {"threshold_days": 100, "name": "Hundred", "tier": "major"}
        ]"#;
        let catalog = MilestoneCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.first().tier, MilestoneTier::Early);
        assert_eq!(catalog.last().tier, MilestoneTier::Major);
        assert_eq!(catalog.get(100).map(|m| m.name.as_str()), Some("Hundred"));
        assert!(catalog.get(50).is_none());
    }

    #[test]
    fn test_from_json_revalidates() {
        let json = r#"[{"threshold_days": 9, "name": "x"}, {"threshold_days": 3, "name": "y"}]"#;
        assert!(matches!(
            MilestoneCatalog::from_json(json),
            Err(CatalogError::NotAscending { .. })
        ));
        assert!(matches!(
            MilestoneCatalog::from_json("not json"),
            Err(CatalogError::Json(_))
        ));
    }
}
