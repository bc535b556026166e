//! Output file naming.
//!
//! Every report is named `[<START>-<END>]<LABEL>.<ext>` where START and END
//! are the earliest and latest creation dates of the tickets it covers.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use sirg_core::error::{ReportError, Result};
use sirg_core::models::{Ticket, TicketField};
use sirg_core::time_utils::format_report_date;
use sirg_core::window::ReportWindow;

// ── ReportFile ────────────────────────────────────────────────────────────────

/// The files a report run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFile {
    /// Delimited count/percentage table of one field.
    Distribution(TicketField),
    /// Pie chart of one field.
    DistributionChart(TicketField),
    SummaryTable,
    Trendline,
    /// Customer-facing spreadsheet.
    ExternalReport,
    InternalReport,
    /// Themed HTML rendering of the internal report.
    SocReport,
}

impl ReportFile {
    pub fn label(&self) -> String {
        match self {
            ReportFile::Distribution(field) => field.column_name().to_string(),
            ReportFile::DistributionChart(field) => format!("{}_COUNT", field.column_name()),
            ReportFile::SummaryTable => "SUMMARY_TABLE_COUNT".to_string(),
            ReportFile::Trendline => "TRENDLINE".to_string(),
            ReportFile::ExternalReport => "EXTERNAL_REPORT".to_string(),
            ReportFile::InternalReport => "INTERNAL_REPORT".to_string(),
            ReportFile::SocReport => "SOC_REPORT".to_string(),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFile::Distribution(_) => "csv",
            ReportFile::DistributionChart(_) | ReportFile::Trendline => "svg",
            ReportFile::SummaryTable | ReportFile::ExternalReport | ReportFile::InternalReport => {
                "xlsx"
            }
            ReportFile::SocReport => "html",
        }
    }
}

// ── ReportSpan ────────────────────────────────────────────────────────────────

/// Creation-time span of the filtered ticket set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSpan {
    pub first: NaiveDateTime,
    pub last: NaiveDateTime,
}

impl ReportSpan {
    /// Span of `tickets`, or [`ReportError::EmptyResult`] when there are none.
    pub fn from_tickets(tickets: &[Ticket], window: &ReportWindow) -> Result<Self> {
        let first = tickets.iter().map(|t| t.created_at).min();
        let last = tickets.iter().map(|t| t.created_at).max();
        match (first, last) {
            (Some(first), Some(last)) => Ok(Self { first, last }),
            _ => Err(ReportError::EmptyResult {
                start: window.start,
                end: window.end,
            }),
        }
    }

    /// The `[03MAY23-04MAY23]` prefix shared by all output files.
    pub fn prefix(&self) -> String {
        format!(
            "[{}-{}]",
            format_report_date(self.first),
            format_report_date(self.last)
        )
    }

    pub fn file_name(&self, file: ReportFile) -> String {
        format!("{}{}.{}", self.prefix(), file.label(), file.extension())
    }

    /// Full path of `file` inside `output_dir`.
    pub fn path_in(&self, output_dir: &Path, file: ReportFile) -> PathBuf {
        output_dir.join(self.file_name(file))
    }
}
