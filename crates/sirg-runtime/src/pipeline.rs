//! End-to-end report pipeline.
//!
//! Composes loader → window resolver → filter/normaliser → aggregators →
//! emitters with an explicit context, returning a [`RunSummary`] describing
//! what was read, kept and written.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use sirg_core::error::Result;
use sirg_core::formatting::{format_percentage, share_percent};
use sirg_core::models::TicketField;
use sirg_core::settings::Settings;
use sirg_core::time_utils::TimestampParser;
use sirg_core::window::ReportWindow;
use sirg_data::aggregator::TicketAggregator;
use sirg_data::normalizer::{normalize, BoardStats, DuplicateIds};
use sirg_data::projection::{customer_report, internal_report, resolution_summary_table};
use sirg_data::reader::load_board;
use sirg_output::charts::{write_distribution_pie, write_trendline};
use sirg_output::delimited::write_distribution_csv;
use sirg_output::html::write_html_report;
use sirg_output::naming::{ReportFile, ReportSpan};
use sirg_output::spreadsheet::write_table_xlsx;
use sirg_output::themes::HtmlTheme;
use tracing::{debug, info};

/// Fields broken down into a delimited table and a pie chart.
pub const DISTRIBUTION_FIELDS: [TicketField; 2] =
    [TicketField::LogSource, TicketField::ResolutionCode];

// ── Public types ──────────────────────────────────────────────────────────────

/// Outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub window: ReportWindow,
    /// Creation-time span of the reported tickets; names the output files.
    pub span: ReportSpan,
    pub rows_read: usize,
    /// Rows passing the status and category predicates.
    pub rows_selected: usize,
    /// Selected rows dropped for an unparseable timestamp.
    pub rows_rejected: usize,
    /// Tickets inside the window.
    pub tickets: usize,
    pub board_stats: BoardStats,
    pub duplicates: DuplicateIds,
    /// Every file written, in emission order.
    pub written: Vec<PathBuf>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Report window:   {}", self.window)?;
        writeln!(f, "Rows read:       {}", self.rows_read)?;
        writeln!(
            f,
            "Rows selected:   {} ({} rejected)",
            self.rows_selected, self.rows_rejected
        )?;
        writeln!(
            f,
            "Tickets:         {} ({} of selected)",
            self.tickets,
            format_percentage(share_percent(self.tickets, self.rows_selected), 1)
        )?;
        if let (Some(first), Some(last)) =
            (self.board_stats.first_created, self.board_stats.last_created)
        {
            writeln!(
                f,
                "Board span:      {} - {} ({} days with tickets)",
                first, last, self.board_stats.distinct_days
            )?;
        }
        if !self.duplicates.is_empty() {
            writeln!(
                f,
                "Duplicate ids:   {} ({} extra rows)",
                self.duplicates.ids, self.duplicates.extra_rows
            )?;
        }
        writeln!(f, "Files written:   {}", self.written.len())?;
        for path in &self.written {
            writeln!(f, "  {}", path.display())?;
        }
        Ok(())
    }
}

// ── ReportPipeline ────────────────────────────────────────────────────────────

/// Everything a run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct ReportPipeline {
    input: PathBuf,
    output_dir: PathBuf,
    start: Option<String>,
    end: Option<String>,
    theme: &'static HtmlTheme,
    parser: TimestampParser,
}

impl ReportPipeline {
    /// Pipeline over `input` writing into `output_dir` with the default
    /// window, theme and a UTC report timezone.
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            start: None,
            end: None,
            theme: &sirg_output::themes::THEMES[0],
            parser: TimestampParser::default(),
        }
    }

    /// Build a pipeline from parsed CLI settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(&settings.input, &settings.output_dir)
            .with_window(settings.start.clone(), settings.end.clone())
            .with_timezone(&settings.timezone)
            .with_theme(&settings.theme)?)
    }

    /// Override either window boundary; `None` keeps the default.
    pub fn with_window(mut self, start: Option<String>, end: Option<String>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_theme(mut self, name: &str) -> Result<Self> {
        self.theme = HtmlTheme::by_name(name)?;
        Ok(self)
    }

    pub fn with_timezone(mut self, tz_name: &str) -> Self {
        self.parser = TimestampParser::new(tz_name);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run the whole pipeline as of `now`.
    ///
    /// Fails before any file is written when the window overrides do not
    /// parse, the input cannot be loaded, or no ticket survives filtering.
    pub fn run_at(&self, now: NaiveDateTime) -> Result<RunSummary> {
        // ── Step 1: Resolve the window ────────────────────────────────────────
        let window = ReportWindow::resolve(
            now,
            self.start.as_deref(),
            self.end.as_deref(),
            &self.parser,
        )?;
        info!("Report window {}", window);
        debug!("Report timezone {}", self.parser.timezone());

        // ── Step 2: Load and normalise ────────────────────────────────────────
        let raw = load_board(&self.input)?;
        let board = normalize(&raw, &window, &self.parser);
        let span = ReportSpan::from_tickets(&board.tickets, &window)?;
        let tickets = &board.tickets;
        debug!(
            "{} tickets between {} and {}",
            tickets.len(),
            span.first,
            span.last
        );

        // ── Step 3: Emit ──────────────────────────────────────────────────────
        let mut written = Vec::new();
        let mut target = |file: ReportFile| {
            let path = span.path_in(&self.output_dir, file);
            written.push(path.clone());
            path
        };

        let internal = internal_report(tickets);
        write_html_report(
            &internal,
            self.theme,
            &format!("SOC report {}", span.prefix()),
            &target(ReportFile::SocReport),
        )?;
        write_table_xlsx(&internal, "INTERNAL_REPORT", &target(ReportFile::InternalReport))?;
        info!("Internal report generated and exported");

        write_table_xlsx(
            &customer_report(tickets),
            "EXTERNAL_REPORT",
            &target(ReportFile::ExternalReport),
        )?;
        info!("External report generated and exported");

        let summary = TicketAggregator::resolution_summary(tickets);
        write_table_xlsx(
            &resolution_summary_table(&summary),
            "SUMMARY_TABLE_COUNT",
            &target(ReportFile::SummaryTable),
        )?;
        info!("Summary table generated and exported");

        for field in DISTRIBUTION_FIELDS {
            let dist = TicketAggregator::distribution(tickets, field);
            write_distribution_csv(&dist, &target(ReportFile::Distribution(field)))?;
            write_distribution_pie(&dist, &target(ReportFile::DistributionChart(field)))?;
        }
        info!("Distribution charts generated and exported");

        let trend = TicketAggregator::daily_trend(tickets);
        write_trendline(&trend, &target(ReportFile::Trendline))?;
        info!("Trendline chart generated and exported");

        Ok(RunSummary {
            window,
            span,
            rows_read: board.rows_read,
            rows_selected: board.rows_selected,
            rows_rejected: board.rejected.len(),
            tickets: board.tickets.len(),
            board_stats: board.board_stats,
            duplicates: board.duplicates,
            written,
        })
    }
}
