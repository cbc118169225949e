use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::date::DateResolution;
use crate::range::INPUT_FORMAT;
use crate::writer::PlacementOutcome;

/// Granularity of the filename grouping in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Month,
    Day,
}

impl GroupBy {
    /// Sortable group key: `YYYY/MM` or `YYYY/MM/DD`.
    pub fn key(self, date: NaiveDateTime) -> String {
        match self {
            GroupBy::Month => date.format("%Y/%m").to_string(),
            GroupBy::Day => date.format("%Y/%m/%d").to_string(),
        }
    }
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "month" => Ok(GroupBy::Month),
            "day" => Ok(GroupBy::Day),
            other => Err(format!("unknown grouping '{}' (expected month or day)", other)),
        }
    }
}

/// What happened to one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FileOutcome {
    Placed(PlacementOutcome),
    OutOfRange,
}

/// Emitted once per candidate file, in processing order.
#[derive(Debug, Clone, Serialize)]
pub struct FileEvent {
    pub index: usize,
    pub total: usize,
    pub filename: String,
    pub resolution: DateResolution,
    pub outcome: FileOutcome,
}

impl fmt::Display for FileEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day = self.resolution.date.format(INPUT_FORMAT);
        match &self.outcome {
            FileOutcome::Placed(PlacementOutcome::Copied(dest)) => {
                write!(f, "Copied: {} [{}] -> {}", self.filename, day, dest.display())
            }
            FileOutcome::Placed(PlacementOutcome::SkippedExists(dest)) => write!(
                f,
                "Already exists: {} [{}] -> {}. Not copied.",
                self.filename,
                day,
                dest.display()
            ),
            FileOutcome::Placed(PlacementOutcome::Failed(reason)) => {
                write!(f, "Error copying {} [{}]: {}", self.filename, day, reason)
            }
            FileOutcome::OutOfRange => {
                write!(f, "Out of range: {} [{}]. Skipped.", self.filename, day)
            }
        }
    }
}

/// Counters for one run plus processed filenames grouped by date.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub copied: u64,
    pub skipped_existing: u64,
    pub skipped_out_of_range: u64,
    pub errored: u64,
    /// Whether a date range filter was active.
    pub range_applied: bool,
    pub group_by: GroupBy,
    pub groups: BTreeMap<String, Vec<String>>,
}

impl RunSummary {
    pub fn new(group_by: GroupBy, range_applied: bool) -> Self {
        Self {
            group_by,
            range_applied,
            ..Default::default()
        }
    }

    pub fn record(&mut self, event: &FileEvent) {
        match &event.outcome {
            FileOutcome::Placed(PlacementOutcome::Copied(_)) => self.copied += 1,
            FileOutcome::Placed(PlacementOutcome::SkippedExists(_)) => self.skipped_existing += 1,
            FileOutcome::Placed(PlacementOutcome::Failed(_)) => {
                self.errored += 1;
                return;
            }
            FileOutcome::OutOfRange => {
                self.skipped_out_of_range += 1;
                return;
            }
        }
        self.groups
            .entry(self.group_by.key(event.resolution.date))
            .or_default()
            .push(event.filename.clone());
    }

    pub fn total(&self) -> u64 {
        self.copied + self.skipped_existing + self.skipped_out_of_range + self.errored
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total photos copied: {}", self.copied)?;
        writeln!(f, "Total errors: {}", self.errored)?;
        writeln!(f, "Already present (skipped): {}", self.skipped_existing)?;
        if self.range_applied {
            writeln!(f, "Outside date range (skipped): {}", self.skipped_out_of_range)?;
        }
        if !self.groups.is_empty() {
            writeln!(f, "By date:")?;
            for (key, names) in &self.groups {
                writeln!(f, "  {}: {}", key, names.len())?;
            }
        }
        Ok(())
    }
}
