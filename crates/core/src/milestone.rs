//! Milestone model - named clean-day thresholds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A named threshold of consecutive clean days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Elapsed days needed to reach this milestone
    pub threshold_days: u32,

    /// Display name
    pub name: String,

    /// Display grouping
    #[serde(default)]
    pub tier: MilestoneTier,
}

impl Milestone {
    /// Create a new milestone.
    pub fn new(threshold_days: u32, name: impl Into<String>, tier: MilestoneTier) -> Self {
        Self {
            threshold_days,
            name: name.into(),
            tier,
        }
    }
}

/// Display grouping for milestones. Carries no computational weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneTier {
    /// First days through two months
    #[default]
    Early,
    /// Three to nine months
    Medium,
    /// Years
    Major,
}

impl MilestoneTier {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneTier::Early => "early",
            MilestoneTier::Medium => "medium",
            MilestoneTier::Major => "major",
        }
    }
}

impl std::fmt::Display for MilestoneTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Derived status of one milestone for a given clean date and elapsed count.
///
/// Never persisted; recomputed on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneStatus {
    /// The catalog entry
    pub milestone: Milestone,

    /// `elapsed_days >= threshold_days`
    pub achieved: bool,

    /// Clean date plus the threshold: "achieved on" when achieved,
    /// "expected on" otherwise
    pub date: NaiveDate,
}

impl MilestoneStatus {
    /// Whether the milestone is still ahead.
    pub fn is_upcoming(&self) -> bool {
        !self.achieved
    }

    /// Badge text.
    pub fn label(&self) -> &'static str {
        if self.achieved {
            "Achieved"
        } else {
            "Upcoming"
        }
    }
}
