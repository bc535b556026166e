//! Board export loading for the report generator.
//!
//! Reads an exported Trello board (delimited text or spreadsheet), validates
//! that every column the canonical schema needs is present and renames the
//! export's columns into [`RawTicket`] rows for the normalizer.

use std::fs::File;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use sirg_core::error::{ReportError, Result};
use sirg_core::models::{RawTicket, TIMESTAMP_FORMAT};
use tracing::{debug, info};

// ── Export schema ─────────────────────────────────────────────────────────────

pub const CARD_NAME: &str = "Card Name";
pub const CARD_DESCRIPTION: &str = "Card Description";
pub const LIST_NAME: &str = "List Name";
pub const CARD_ID: &str = "Card ID";
pub const CREATION_DATE: &str = "CREATION_DATE";
pub const RESOLUTION_DATE: &str = "RESOLUTION_DATE";
pub const CATEGORY: &str = "CATEGORY";
pub const LOG_SOURCE: &str = "LOG_SOURCE";
pub const PRIORITY: &str = "PRIORITY";
pub const OFFENSE_ID: &str = "OFFENSE_ID";
pub const RESOLUTION_CODE: &str = "RESOLUTION_CODE";

/// Columns that must be present in every export, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    CARD_NAME,
    CARD_DESCRIPTION,
    LIST_NAME,
    CREATION_DATE,
    RESOLUTION_DATE,
    CATEGORY,
    LOG_SOURCE,
    PRIORITY,
    OFFENSE_ID,
    RESOLUTION_CODE,
];

/// Supported on-disk layouts of a board export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Delimited,
    Spreadsheet,
}

impl InputFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") | Some("txt") => Ok(InputFormat::Delimited),
            Some("xlsx") | Some("xlsm") | Some("xls") | Some("ods") => {
                Ok(InputFormat::Spreadsheet)
            }
            _ => Err(ReportError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Column positions of the canonical fields inside one export header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    /// Indices of [`REQUIRED_COLUMNS`], in the same order.
    required: [usize; 10],
    card_id: Option<usize>,
}

impl ColumnMap {
    /// Locate every required column in `headers`.
    ///
    /// Header names are compared after trimming surrounding whitespace. The
    /// first missing column is reported by name.
    pub fn from_headers(headers: &[String], path: &Path) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let mut required = [0usize; 10];
        for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = find(name).ok_or_else(|| ReportError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })?;
        }

        Ok(Self {
            required,
            card_id: find(CARD_ID),
        })
    }

    /// Rename one data row into a [`RawTicket`].
    ///
    /// Short rows read missing cells as empty strings.
    pub fn to_raw_ticket(&self, row: usize, cells: &[String]) -> RawTicket {
        let cell = |idx: usize| cells.get(idx).map(|s| s.trim().to_string()).unwrap_or_default();
        let [id, desc, status, created, resolved, category, log_source, priority, offense, code] =
            self.required;

        RawTicket {
            row,
            id: cell(id),
            description: strip_newlines(cells.get(desc).map(String::as_str).unwrap_or_default()),
            status: cell(status),
            category: cell(category),
            created_at: cell(created),
            resolved_at: cell(resolved),
            log_source: cell(log_source),
            resolution_code: cell(code),
            priority: cell(priority),
            offense_id: cell(offense),
            card_id: self.card_id.map(cell).filter(|s| !s.is_empty()),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a board export into raw, unfiltered ticket rows.
pub fn load_board(path: &Path) -> Result<Vec<RawTicket>> {
    let format = InputFormat::from_path(path)?;
    let (headers, rows) = match format {
        InputFormat::Delimited => read_delimited(path)?,
        InputFormat::Spreadsheet => read_spreadsheet(path)?,
    };

    let columns = ColumnMap::from_headers(&headers, path)?;
    let tickets: Vec<RawTicket> = rows
        .iter()
        .enumerate()
        .filter(|(_, cells)| cells.iter().any(|c| !c.trim().is_empty()))
        .map(|(i, cells)| columns.to_raw_ticket(i + 1, cells))
        .collect();

    info!(
        "Loaded {} cards from {} ({:?})",
        tickets.len(),
        path.display(),
        format
    );
    Ok(tickets)
}

/// Remove embedded line breaks from free text.
pub fn strip_newlines(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

type Table = (Vec<String>, Vec<Vec<String>>);

fn load_error(path: &Path, source: std::io::Error) -> ReportError {
    ReportError::Load {
        path: path.to_path_buf(),
        source,
    }
}

fn parse_error(path: &Path, reason: impl std::fmt::Display) -> ReportError {
    ReportError::InputParse {
        path: PathBuf::from(path),
        reason: reason.to_string(),
    }
}

/// Read a comma-separated export; the first record is the header.
fn read_delimited(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| load_error(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| parse_error(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| parse_error(path, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!("Read {} delimited rows from {}", rows.len(), path.display());
    Ok((headers, rows))
}

/// Read the first worksheet of a spreadsheet export.
fn read_spreadsheet(path: &Path) -> Result<Table> {
    std::fs::metadata(path).map_err(|e| load_error(path, e))?;
    let mut workbook = open_workbook_auto(path).map_err(|e| parse_error(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| parse_error(path, "workbook has no worksheets"))?
        .map_err(|e| parse_error(path, e))?;

    let mut rows = range
        .rows()
        .map(|r| r.iter().map(cell_to_string).collect::<Vec<String>>());
    let headers = rows
        .next()
        .ok_or_else(|| parse_error(path, "worksheet is empty"))?;
    let rows: Vec<Vec<String>> = rows.collect();

    debug!("Read {} spreadsheet rows from {}", rows.len(), path.display());
    Ok((headers, rows))
}

/// Render a spreadsheet cell the way the delimited export would spell it.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
