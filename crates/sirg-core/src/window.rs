//! Reporting-window resolution.
//!
//! A report covers the most recently completed Thursday-to-Thursday cycle:
//! from Thursday 16:00:00 one week back up to Thursday 15:59:59, unless the
//! caller overrides either boundary.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::error::{ReportError, Result};
use crate::time_utils::TimestampParser;

/// Hour of day at which a reporting cycle rolls over.
pub const CYCLE_ROLLOVER_HOUR: u32 = 16;

/// Half-open timestamp interval `[start, end)` tickets are filtered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ReportWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Whether `ts` falls inside `[start, end)`.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts < self.end
    }

    /// Compute the default window for the day `today`.
    ///
    /// `end` is the Thursday on or before `today` at 15:59:59 and `start`
    /// is exactly one week earlier plus one second.
    pub fn default_for(today: NaiveDate) -> Self {
        let days_back = (today.weekday().num_days_from_monday() + 4) % 7;
        let thursday = today - Duration::days(i64::from(days_back));
        let end = thursday.and_time(chrono::NaiveTime::MIN)
            + Duration::hours(i64::from(CYCLE_ROLLOVER_HOUR))
            - Duration::seconds(1);
        let start = end - Duration::weeks(1) + Duration::seconds(1);
        Self { start, end }
    }

    /// Resolve the window from optional user overrides.
    ///
    /// Each boundary that is supplied is parsed and used verbatim; a missing
    /// one falls back to the default computed for `now`. No ordering check is
    /// made between the two.
    pub fn resolve(
        now: NaiveDateTime,
        start_override: Option<&str>,
        end_override: Option<&str>,
        parser: &TimestampParser,
    ) -> Result<Self> {
        let default = Self::default_for(now.date());
        let start = parse_boundary(start_override, parser)?.unwrap_or(default.start);
        let end = parse_boundary(end_override, parser)?.unwrap_or(default.end);
        Ok(Self { start, end })
    }
}

impl std::fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Parse an override; blank strings count as absent.
fn parse_boundary(
    value: Option<&str>,
    parser: &TimestampParser,
) -> Result<Option<NaiveDateTime>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => parser
            .parse(v)
            .map(Some)
            .ok_or_else(|| ReportError::WindowBoundary(v.to_string())),
    }
}
