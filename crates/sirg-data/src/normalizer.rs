//! Filtering and normalisation of raw board rows.
//!
//! Turns [`RawTicket`] rows into the canonical, immutable ticket set every
//! aggregator reads: resolved security investigations only, timestamps
//! parsed, sorted by ticket id and restricted to the report window.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDateTime;
use sirg_core::error::ReportError;
use sirg_core::models::{RawTicket, Ticket, INVESTIGATION_CATEGORY, RESOLVED_STATUS};
use sirg_core::time_utils::TimestampParser;
use sirg_core::window::ReportWindow;
use tracing::{debug, info, warn};

use crate::reader::{CREATION_DATE, RESOLUTION_DATE};

// ── Public types ──────────────────────────────────────────────────────────────

/// A row dropped because one of its timestamps could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    /// 1-based data row in the export.
    pub row: usize,
    /// Ticket id of the rejected row.
    pub id: String,
    /// Export column holding the bad value.
    pub column: &'static str,
    pub value: String,
}

impl RowRejection {
    /// The rejection as a [`ReportError::TimestampParse`].
    pub fn to_error(&self) -> ReportError {
        ReportError::TimestampParse {
            row: self.row,
            column: self.column.to_string(),
            value: self.value.clone(),
        }
    }
}

/// Creation-time statistics of the selected tickets before the window is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardStats {
    pub first_created: Option<NaiveDateTime>,
    pub last_created: Option<NaiveDateTime>,
    /// Number of distinct calendar days with at least one ticket.
    pub distinct_days: usize,
}

impl BoardStats {
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        let days: BTreeSet<_> = tickets.iter().map(|t| t.created_at.date()).collect();
        Self {
            first_created: tickets.iter().map(|t| t.created_at).min(),
            last_created: tickets.iter().map(|t| t.created_at).max(),
            distinct_days: days.len(),
        }
    }
}

/// Duplicate ticket-id diagnostic. Duplicates are kept, only counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuplicateIds {
    /// Ids that occur on more than one row.
    pub ids: usize,
    /// Rows beyond the first for each duplicated id.
    pub extra_rows: usize,
}

impl DuplicateIds {
    pub fn from_tickets(tickets: &[Ticket]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for ticket in tickets {
            *counts.entry(ticket.id.as_str()).or_default() += 1;
        }
        counts
            .values()
            .filter(|&&n| n > 1)
            .fold(Self::default(), |acc, &n| Self {
                ids: acc.ids + 1,
                extra_rows: acc.extra_rows + n - 1,
            })
    }

    pub fn is_empty(&self) -> bool {
        self.ids == 0
    }
}

/// Output of [`normalize`]: the working ticket set plus diagnostics.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBoard {
    /// Selected tickets inside the window, ascending by id.
    pub tickets: Vec<Ticket>,
    /// Statistics of the selected tickets before the window was applied.
    pub board_stats: BoardStats,
    pub duplicates: DuplicateIds,
    pub rejected: Vec<RowRejection>,
    /// Raw rows received.
    pub rows_read: usize,
    /// Rows passing the status and category predicates.
    pub rows_selected: usize,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the whole filter/normalise stage over the loaded rows.
///
/// Rows failing the status/category predicates are dropped silently; rows
/// with an unparseable timestamp are dropped with a warning and recorded in
/// [`NormalizedBoard::rejected`].
pub fn normalize(
    raw: &[RawTicket],
    window: &ReportWindow,
    parser: &TimestampParser,
) -> NormalizedBoard {
    let mut rejected = Vec::new();
    let mut parsed = Vec::new();

    let candidates = raw
        .iter()
        .filter(|r| r.status == RESOLVED_STATUS && r.category == INVESTIGATION_CATEGORY);
    let mut rows_selected = 0usize;
    for row in candidates {
        rows_selected += 1;
        match parse_ticket(row, parser) {
            Ok(ticket) => parsed.push(ticket),
            Err(rejection) => {
                warn!("Rejected card {}: {}", rejection.id, rejection.to_error());
                rejected.push(rejection);
            }
        }
    }

    let selected = select_tickets(parsed);
    let board_stats = BoardStats::from_tickets(&selected);
    let tickets = apply_window(selected, window);
    let duplicates = DuplicateIds::from_tickets(&tickets);

    if !duplicates.is_empty() {
        warn!(
            "{} ticket ids appear more than once ({} extra rows kept)",
            duplicates.ids, duplicates.extra_rows
        );
    }
    debug!(
        "Normalised {} rows: {} selected, {} rejected, {} in window {}",
        raw.len(),
        rows_selected,
        rejected.len(),
        tickets.len(),
        window
    );
    info!("Filtered out non-resolved and non-security investigation cards");

    NormalizedBoard {
        tickets,
        board_stats,
        duplicates,
        rejected,
        rows_read: raw.len(),
        rows_selected,
    }
}

/// Parse one raw row into a [`Ticket`].
///
/// `created_at` must parse. An empty `resolved_at` becomes `None` but a
/// non-empty unparseable one rejects the row. An undecodable card id only
/// leaves `responded_at` empty.
pub fn parse_ticket(raw: &RawTicket, parser: &TimestampParser) -> Result<Ticket, RowRejection> {
    let reject = |column: &'static str, value: &str| RowRejection {
        row: raw.row,
        id: raw.id.clone(),
        column,
        value: value.to_string(),
    };

    let created_at = parser
        .parse(&raw.created_at)
        .ok_or_else(|| reject(CREATION_DATE, &raw.created_at))?;

    let resolved_at = if raw.resolved_at.trim().is_empty() {
        None
    } else {
        Some(
            parser
                .parse(&raw.resolved_at)
                .ok_or_else(|| reject(RESOLUTION_DATE, &raw.resolved_at))?,
        )
    };

    Ok(Ticket {
        id: raw.id.clone(),
        description: raw.description.clone(),
        status: raw.status.clone(),
        category: raw.category.clone(),
        created_at,
        responded_at: raw.card_id.as_deref().and_then(|id| parser.decode_card_id(id)),
        resolved_at,
        log_source: raw.log_source.clone(),
        resolution_code: raw.resolution_code.clone(),
        priority: raw.priority.clone(),
        offense_id: raw.offense_id.clone(),
    })
}

/// Keep resolved security investigations and sort them by id.
///
/// The sort is stable, so tickets sharing an id keep their input order.
pub fn select_tickets(tickets: Vec<Ticket>) -> Vec<Ticket> {
    let mut selected: Vec<Ticket> = tickets
        .into_iter()
        .filter(Ticket::is_resolved_investigation)
        .collect();
    selected.sort_by(|a, b| a.id.cmp(&b.id));
    selected
}

/// Keep tickets created inside `window`.
pub fn apply_window(tickets: Vec<Ticket>, window: &ReportWindow) -> Vec<Ticket> {
    tickets
        .into_iter()
        .filter(|t| window.contains(t.created_at))
        .collect()
}

/// Predicates, sort and window in one call over already-parsed tickets.
pub fn filter_tickets(tickets: Vec<Ticket>, window: &ReportWindow) -> Vec<Ticket> {
    apply_window(select_tickets(tickets), window)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
