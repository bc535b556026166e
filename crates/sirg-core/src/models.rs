use chrono::NaiveDateTime;

/// Status value of tickets that are included in a report.
pub const RESOLVED_STATUS: &str = "RESOLVED_AND_REVIEWED";

/// Category value of tickets that are included in a report.
pub const INVESTIGATION_CATEGORY: &str = "VSOC_INVESTIGATION";

/// Header of the 1-based row index column in every tabular output.
pub const INDEX_COLUMN: &str = "NO.";

/// Rendering format for timestamps in tabular outputs.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the board export after column renaming, before any parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTicket {
    /// 1-based data row in the source file (header excluded).
    pub row: usize,
    /// Card name, the `T#` business key.
    pub id: String,
    /// Card description with embedded newlines removed.
    pub description: String,
    /// Trello list name.
    pub status: String,
    pub category: String,
    pub created_at: String,
    pub resolved_at: String,
    pub log_source: String,
    pub resolution_code: String,
    pub priority: String,
    pub offense_id: String,
    /// Trello card object id, when the export carries one.
    pub card_id: Option<String>,
}

/// A ticket in the canonical schema with parsed, timezone-naive timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: String,
    pub description: String,
    pub status: String,
    pub category: String,
    pub created_at: NaiveDateTime,
    /// Card creation time decoded from the Trello card id.
    pub responded_at: Option<NaiveDateTime>,
    pub resolved_at: Option<NaiveDateTime>,
    pub log_source: String,
    pub resolution_code: String,
    pub priority: String,
    pub offense_id: String,
}

impl Ticket {
    /// Whether the ticket passes the status and category predicates.
    pub fn is_resolved_investigation(&self) -> bool {
        self.status == RESOLVED_STATUS && self.category == INVESTIGATION_CATEGORY
    }
}

/// Categorical ticket fields that can be broken down into a distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketField {
    Status,
    Category,
    LogSource,
    ResolutionCode,
    Priority,
    OffenseId,
}

impl TicketField {
    /// Canonical output column name of the field.
    pub fn column_name(self) -> &'static str {
        match self {
            TicketField::Status => "STATUS",
            TicketField::Category => "CATEGORY",
            TicketField::LogSource => "LOG_SOURCE",
            TicketField::ResolutionCode => "RESOLUTION_CODE",
            TicketField::Priority => "PRIORITY",
            TicketField::OffenseId => "OFFENSE_ID",
        }
    }

    /// Borrow the field's value from `ticket`.
    pub fn value(self, ticket: &Ticket) -> &str {
        match self {
            TicketField::Status => &ticket.status,
            TicketField::Category => &ticket.category,
            TicketField::LogSource => &ticket.log_source,
            TicketField::ResolutionCode => &ticket.resolution_code,
            TicketField::Priority => &ticket.priority,
            TicketField::OffenseId => &ticket.offense_id,
        }
    }
}

impl std::fmt::Display for TicketField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column_name())
    }
}

// ── Tabular report model ──────────────────────────────────────────────────────

/// A single cell of a [`ReportTable`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(u64),
    Timestamp(NaiveDateTime),
    Empty,
}

impl Cell {
    /// Text cell from anything string-like.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Timestamp cell, or [`Cell::Empty`] when absent.
    pub fn timestamp(value: Option<NaiveDateTime>) -> Self {
        value.map_or(Cell::Empty, Cell::Timestamp)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Integer(n) => write!(f, "{}", n),
            Cell::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
            Cell::Empty => Ok(()),
        }
    }
}

/// A header row plus data rows, the contract between projections and the
/// spreadsheet / HTML writers.
///
/// The first column is always the 1-based [`INDEX_COLUMN`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ReportTable {
    /// Create an empty table whose header is `NO.` followed by `columns`.
    pub fn with_columns(columns: &[&str]) -> Self {
        let mut headers = Vec::with_capacity(columns.len() + 1);
        headers.push(INDEX_COLUMN.to_string());
        headers.extend(columns.iter().map(|c| c.to_string()));
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a data row, prefixing it with the next 1-based index.
    pub fn push_indexed(&mut self, cells: Vec<Cell>) {
        let mut row = Vec::with_capacity(cells.len() + 1);
        row.push(Cell::Integer(self.rows.len() as u64 + 1));
        row.extend(cells);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column named `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 5, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn ticket(status: &str, category: &str) -> Ticket {
        Ticket {
            id: "T1".to_string(),
            description: String::new(),
            status: status.to_string(),
            category: category.to_string(),
            created_at: ts(1, 9),
            responded_at: None,
            resolved_at: None,
            log_source: "FIREWALL".to_string(),
            resolution_code: "RC01".to_string(),
            priority: "P2".to_string(),
            offense_id: "4411".to_string(),
        }
    }

    #[test]
    fn test_is_resolved_investigation() {
        assert!(ticket(RESOLVED_STATUS, INVESTIGATION_CATEGORY).is_resolved_investigation());
        assert!(!ticket("IN_PROGRESS", INVESTIGATION_CATEGORY).is_resolved_investigation());
        assert!(!ticket(RESOLVED_STATUS, "HEALTH_CHECK").is_resolved_investigation());
    }

    #[test]
    fn test_ticket_field_value_and_name() {
        let t = ticket(RESOLVED_STATUS, INVESTIGATION_CATEGORY);
        assert_eq!(TicketField::LogSource.value(&t), "FIREWALL");
        assert_eq!(TicketField::ResolutionCode.value(&t), "RC01");
        assert_eq!(TicketField::OffenseId.value(&t), "4411");
        assert_eq!(TicketField::ResolutionCode.to_string(), "RESOLUTION_CODE");
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Integer(3).to_string(), "3");
        assert_eq!(Cell::text("abc").to_string(), "abc");
        assert_eq!(Cell::Timestamp(ts(2, 16)).to_string(), "2023-05-02 16:00:00");
        assert_eq!(Cell::timestamp(None).to_string(), "");
    }

    #[test]
    fn test_report_table_indexing() {
        let mut table = ReportTable::with_columns(&["T#", "DESC"]);
        table.push_indexed(vec![Cell::text("T1"), Cell::text("a")]);
        table.push_indexed(vec![Cell::text("T2"), Cell::text("b")]);

        assert_eq!(table.headers, vec!["NO.", "T#", "DESC"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][0], Cell::Integer(1));
        assert_eq!(table.rows[1][0], Cell::Integer(2));
        assert_eq!(table.column_index("DESC"), Some(2));
        assert_eq!(table.column_index("PRIORITY"), None);
    }
}
