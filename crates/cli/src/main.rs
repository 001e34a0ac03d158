//! Clean-time CLI - track clean time and recovery milestones.

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use cleantime_core::{parse_start_date, CleanTimeError, MilestoneStatus};
use cleantime_progress::{CleanTimeSummary, CleanTimeTracker, TrackerConfig, TrackerError};
use cleantime_storage::JsonStorage;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cleantime")]
#[command(about = "Track clean time and recovery milestones", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, global = true, default_value = ".cleantime")]
    data_dir: PathBuf,

    /// Evaluate as of this date (YYYY-MM-DD) instead of today
    #[arg(long, global = true, value_parser = parse_start_date)]
    as_of: Option<NaiveDate>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set or update the clean date
    Set {
        /// Clean date (YYYY-MM-DD)
        #[arg(value_parser = parse_start_date)]
        date: NaiveDate,
        /// Accept a date after today
        #[arg(long)]
        allow_future: bool,
    },
    /// Unset the clean date
    Clear,
    /// Show clean time, next milestone and progress
    Show,
    /// List every milestone with achieved or expected dates
    Milestones,
    /// Show only the next milestone
    Next,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let today = cli
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    debug!("Evaluating as of {}", today);

    let storage = JsonStorage::new(&cli.data_dir).await?;

    match cli.command {
        Commands::Set { date, allow_future } => {
            let config = TrackerConfig {
                allow_future_start: allow_future,
                ..Default::default()
            };
            let mut tracker = CleanTimeTracker::open(storage, config).await?;
            match tracker.set_start_date(date, today).await {
                Ok(()) => println!("Clean date set to {}", format_long_date(date)),
                Err(TrackerError::CleanTime(CleanTimeError::InvalidRange { .. })) => {
                    anyhow::bail!(
                        "Clean date {} is after {}; pass --allow-future to keep it",
                        date,
                        today
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Clear => {
            let mut tracker = CleanTimeTracker::open(storage, TrackerConfig::default()).await?;
            tracker.clear_start_date().await?;
            println!("Clean date cleared");
        }
        Commands::Show => {
            let tracker = CleanTimeTracker::open(storage, TrackerConfig::default()).await?;
            let Some(summary) = present(tracker.summary(today).await)? else {
                return Ok(());
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary, tracker.catalog().len());
            }
        }
        Commands::Milestones => {
            let tracker = CleanTimeTracker::open(storage, TrackerConfig::default()).await?;
            let Some(milestones) = present(tracker.milestones(today).await)? else {
                return Ok(());
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&milestones)?);
            } else {
                println!("Your Milestones");
                for status in &milestones {
                    println!("  {}", format_milestone(status));
                }
            }
        }
        Commands::Next => {
            let tracker = CleanTimeTracker::open(storage, TrackerConfig::default()).await?;
            let Some(summary) = present(tracker.summary(today).await)? else {
                return Ok(());
            };

            if cli.json {
                let next = serde_json::json!({
                    "milestone": summary.next,
                    "progress": summary.progress,
                    "days_remaining": summary.days_remaining,
                });
                println!("{}", serde_json::to_string_pretty(&next)?);
            } else {
                println!(
                    "{} ({} days) {} {}",
                    summary.next.milestone.name,
                    summary.next.milestone.threshold_days,
                    progress_bar(summary.progress, 20),
                    format_days_to_go(summary.days_remaining),
                );
            }
        }
    }

    Ok(())
}

/// Turn the unset and future-date states into user-facing messages.
fn present<T>(result: std::result::Result<T, TrackerError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_unset() => {
            println!("No clean date set");
            println!("  Set your clean date to start tracking: cleantime set YYYY-MM-DD");
            Ok(None)
        }
        Err(TrackerError::CleanTime(CleanTimeError::InvalidRange { start, reference, .. })) => {
            println!(
                "Your clean date ({}) is after {}.",
                format_long_date(start),
                format_long_date(reference)
            );
            println!("  Update it with: cleantime set YYYY-MM-DD");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_summary(summary: &CleanTimeSummary, total: usize) {
    println!("Clean Date:     {}", format_long_date(summary.start_date));
    println!("Clean Time:     {} days", summary.elapsed_days);
    println!(
        "Next Milestone: {} ({})",
        summary.next.milestone.name,
        format_days_to_go(summary.days_remaining)
    );
    println!();
    println!("Progress to next milestone:");
    println!("  {}", progress_bar(summary.progress, 30));
    println!("  {} of {} milestones achieved", summary.achieved_count, total);
}

fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn format_short_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

fn format_days_to_go(days: i64) -> String {
    match days {
        0 => "reached".to_string(),
        1 => "1 day to go".to_string(),
        n => format!("{} days to go", n),
    }
}

fn format_milestone(status: &MilestoneStatus) -> String {
    let when = if status.is_upcoming() {
        format!("Expected on {}", format_short_date(status.date))
    } else {
        format!("Achieved on {}", format_short_date(status.date))
    };
    format!(
        "[{:<8}] {:<14} {:>5} days  {:<6}  {}",
        status.label(),
        status.milestone.name,
        status.milestone.threshold_days,
        status.milestone.tier,
        when
    )
}

fn progress_bar(percent: u8, width: usize) -> String {
    let filled = usize::from(percent.min(100)) * width / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleantime_core::{Milestone, MilestoneTier};
    use cleantime_storage::StorageError;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 10), "[----------]   0%");
        assert_eq!(progress_bar(52, 10), "[#####-----]  52%");
        assert_eq!(progress_bar(100, 10), "[##########] 100%");
    }

    #[test]
    fn test_date_formats() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert_eq!(format_long_date(date), "January 1, 2023");
        assert_eq!(format_short_date(date), "Jan 1, 2023");
    }

    #[test]
    fn test_format_milestone() {
        let status = MilestoneStatus {
            milestone: Milestone::new(30, "One Month", MilestoneTier::Early),
            achieved: false,
            date: NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
        };
        let line = format_milestone(&status);
        assert!(line.contains("Upcoming"));
        assert!(line.contains("Expected on Jan 31, 2023"));

        let reached = MilestoneStatus {
            achieved: true,
            ..status
        };
        let line = format_milestone(&reached);
        assert!(line.contains("Achieved"));
        assert!(line.contains("Achieved on Jan 31, 2023"));
    }

    #[test]
    fn test_present_unset_is_handled() {
        let result = present::<()>(Err(TrackerError::CleanTime(CleanTimeError::UnsetStartDate)));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_present_future_date_is_handled() {
        let err = CleanTimeError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            reference: NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
            elapsed_days: -31,
        };
        let result = present::<()>(Err(TrackerError::CleanTime(err)));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_present_passes_values_and_other_errors() {
        assert!(matches!(present(Ok(7)), Ok(Some(7))));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let result = present::<()>(Err(TrackerError::Storage(StorageError::Io(io))));
        assert!(result.is_err());

        let overflow = CleanTimeError::DateOutOfRange {
            start: NaiveDate::MAX,
            days: 1,
        };
        assert!(present::<()>(Err(TrackerError::CleanTime(overflow))).is_err());
    }

    #[test]
    fn test_cli_parses_dates() {
        let cli = Cli::try_parse_from(["cleantime", "--as-of", "2023-01-08", "set", "2023-01-01"])
            .unwrap();
        assert_eq!(cli.as_of, NaiveDate::from_ymd_opt(2023, 1, 8));
        assert!(matches!(cli.command, Commands::Set { allow_future: false, .. }));

        assert!(Cli::try_parse_from(["cleantime", "set", "2023-1-1"]).is_err());
    }
}
