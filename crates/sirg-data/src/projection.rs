//! Customer-facing and internal projections of the ticket set, plus the
//! resolution-code summary table.

use std::collections::BTreeMap;

use sirg_core::models::{Cell, ReportTable, Ticket};

pub const ID_COLUMN: &str = "T#";
pub const DESCRIPTION_COLUMN: &str = "DESC";
pub const CREATED_COLUMN: &str = "TICKET_CREATION_TIMESTAMP";
pub const RESPONDED_COLUMN: &str = "TICKET_RESPONSE_TIMESTAMP";
pub const RESOLVED_COLUMN: &str = "TICKET_RESOLUTION_TIMESTAMP";

/// Columns of the customer report, in order.
pub const CUSTOMER_COLUMNS: [&str; 7] = [
    ID_COLUMN,
    CREATED_COLUMN,
    "OFFENSE_ID",
    "LOG_SOURCE",
    "RESOLUTION_CODE",
    DESCRIPTION_COLUMN,
    "PRIORITY",
];

/// Columns of the internal report, in order.
pub const INTERNAL_COLUMNS: [&str; 11] = [
    ID_COLUMN,
    DESCRIPTION_COLUMN,
    "STATUS",
    CREATED_COLUMN,
    RESPONDED_COLUMN,
    RESOLVED_COLUMN,
    "CATEGORY",
    "LOG_SOURCE",
    "PRIORITY",
    "OFFENSE_ID",
    "RESOLUTION_CODE",
];

/// Project tickets onto the customer column subset, re-sorted by id and
/// numbered from 1.
pub fn customer_report(tickets: &[Ticket]) -> ReportTable {
    let mut sorted: Vec<&Ticket> = tickets.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let mut table = ReportTable::with_columns(&CUSTOMER_COLUMNS);
    for t in sorted {
        table.push_indexed(vec![
            Cell::text(&t.id),
            Cell::Timestamp(t.created_at),
            Cell::text(&t.offense_id),
            Cell::text(&t.log_source),
            Cell::text(&t.resolution_code),
            Cell::text(&t.description),
            Cell::text(&t.priority),
        ]);
    }
    table
}

/// The full ticket table, numbered from 1 in its current order.
pub fn internal_report(tickets: &[Ticket]) -> ReportTable {
    let mut table = ReportTable::with_columns(&INTERNAL_COLUMNS);
    for t in tickets {
        table.push_indexed(vec![
            Cell::text(&t.id),
            Cell::text(&t.description),
            Cell::text(&t.status),
            Cell::Timestamp(t.created_at),
            Cell::timestamp(t.responded_at),
            Cell::timestamp(t.resolved_at),
            Cell::text(&t.category),
            Cell::text(&t.log_source),
            Cell::text(&t.priority),
            Cell::text(&t.offense_id),
            Cell::text(&t.resolution_code),
        ]);
    }
    table
}

/// Column holding the per-code ticket count in the summary table.
pub const SUMMARY_COUNT_COLUMN: &str = "COUNT";

/// Tabulate [`crate::aggregator::TicketAggregator::resolution_summary`] output.
pub fn resolution_summary_table(summary: &BTreeMap<String, usize>) -> ReportTable {
    let mut table = ReportTable::with_columns(&["RESOLUTION_CODE", SUMMARY_COUNT_COLUMN]);
    for (code, count) in summary {
        table.push_indexed(vec![Cell::text(code), Cell::Integer(*count as u64)]);
    }
    table
}
