//! High-load cell report
//!
//! The backend runs a fixed query over a time window and returns every
//! matching cell row, together with per-system counts of distinct cells.

use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use super::table::{ExportFormat, Row};

/// Column flagging a row as a burst high-load cell ("是" = yes)
pub const BURST_COLUMN: &str = "是否突发高负荷";

/// Time format of the `start_time` / `end_time` query parameters
pub const PARAM_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Inclusive time range the report covers, in backend local time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverloadWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl OverloadWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, String> {
        if start > end {
            return Err(format!("start time {} is after end time {}", start, end));
        }
        Ok(Self { start, end })
    }

    /// The hour ending at the last whole hour before `now`
    ///
    /// At 13:15 this is 12:00 - 13:00.
    pub fn last_whole_hour(now: NaiveDateTime) -> Self {
        let end = now.date().and_time(NaiveTime::MIN) + TimeDelta::hours(i64::from(now.hour()));
        Self {
            start: end - TimeDelta::hours(1),
            end,
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Local name for an export the backend did not name
    pub fn fallback_file_name(&self, format: ExportFormat) -> String {
        format!(
            "overload_{}_{}.{}",
            self.start.format("%Y-%m-%d-%H-%M-%S"),
            self.end.format("%Y-%m-%d-%H-%M-%S"),
            format.as_str()
        )
    }
}

/// Parses a window bound as typed on the command line
///
/// Accepts `YYYY-MM-DD HH:MM[:SS]`, with either a space or `T` between date
/// and time.
pub fn parse_window_time(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim().replacen('T', " ", 1);
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&value, format).ok())
        .ok_or_else(|| format!("invalid time '{}', expected YYYY-MM-DD HH:MM[:SS]", value))
}

/// Distinct cell counts for one radio system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemStats {
    /// Cells in the window
    pub total: u64,
    /// Cells flagged as burst high-load
    pub burst: u64,
    /// Cells in an important area
    pub total_important: u64,
    /// Burst cells in an important area
    pub burst_important: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverloadStats {
    #[serde(rename = "4G", default)]
    pub lte: SystemStats,
    #[serde(rename = "5G", default)]
    pub nr: SystemStats,
}

/// Response of `GET /api/query/overload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverloadReport {
    pub data: Vec<Row>,
    pub stats: OverloadStats,
    pub total_count: u64,
}

impl OverloadReport {
    /// Rows flagged as burst high-load
    pub fn burst_rows(&self) -> impl Iterator<Item = &Row> {
        self.data.iter().filter(|row| is_burst(row))
    }
}

pub fn is_burst(row: &Row) -> bool {
    row.get(BURST_COLUMN).and_then(|v| v.as_str()) == Some("是")
}
