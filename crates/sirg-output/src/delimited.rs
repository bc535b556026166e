//! Delimited-text export of categorical distributions.
//!
//! `<FIELD>_PCT` holds a percentage on a 0–100 scale at full `f64`
//! precision, so `2` of `3` tickets is written as `66.66666666666667`.
//! The column sums to 100 over a non-empty distribution.

use std::path::Path;

use csv::{StringRecord, WriterBuilder};
use sirg_core::error::{ReportError, Result};
use sirg_core::models::{TicketField, INDEX_COLUMN};
use sirg_data::aggregator::{CategoricalDistribution, CategoryCount};
use tracing::debug;

/// Serde field names of [`CategoryCount`], in column order.
const RECORD_FIELDS: [&str; 4] = ["no", "value", "count", "pct"];

/// Header row for `field`: `NO.,<FIELD>,<FIELD>_COUNT,<FIELD>_PCT`.
pub fn distribution_headers(field: TicketField) -> [String; 4] {
    let name = field.column_name();
    [
        INDEX_COLUMN.to_string(),
        name.to_string(),
        format!("{name}_COUNT"),
        format!("{name}_PCT"),
    ]
}

/// Write `dist` as comma-separated text, overwriting `path`.
///
/// `_PCT` values are percentages on a 0–100 scale, unrounded.
pub fn write_distribution_csv(dist: &CategoricalDistribution, path: &Path) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| ReportError::write(path, e))?;
    writer
        .write_record(distribution_headers(dist.field))
        .map_err(|e| ReportError::write(path, e))?;
    for row in &dist.rows {
        writer
            .serialize(row)
            .map_err(|e| ReportError::write(path, e))?;
    }
    writer.flush().map_err(|e| ReportError::write(path, e))?;

    debug!("Wrote {} distribution rows to {}", dist.rows.len(), path.display());
    Ok(())
}

/// Parse a file written by [`write_distribution_csv`] back into a
/// distribution of `field`.
pub fn read_distribution_csv(path: &Path, field: TicketField) -> Result<CategoricalDistribution> {
    let parse_err = |reason: String| ReportError::InputParse {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = csv::Reader::from_path(path).map_err(|e| parse_err(e.to_string()))?;
    let headers = reader.headers().map_err(|e| parse_err(e.to_string()))?.clone();
    let expected = distribution_headers(field);
    if headers.iter().ne(expected.iter().map(String::as_str)) {
        return Err(parse_err(format!(
            "unexpected header {:?}, expected {:?}",
            headers.iter().collect::<Vec<_>>(),
            expected
        )));
    }

    let fields = StringRecord::from(RECORD_FIELDS.to_vec());
    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| parse_err(e.to_string()))?;
        let row: CategoryCount = record
            .deserialize(Some(&fields))
            .map_err(|e| parse_err(format!("row {}: {}", i + 1, e)))?;
        rows.push(row);
    }

    Ok(CategoricalDistribution { field, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> CategoricalDistribution {
        CategoricalDistribution {
            field: TicketField::LogSource,
            rows: vec![
                CategoryCount {
                    no: 1,
                    value: "FIREWALL".to_string(),
                    count: 2,
                    pct: 200.0 / 3.0,
                },
                CategoryCount {
                    no: 2,
                    value: "EDR, CLOUD".to_string(),
                    count: 1,
                    pct: 100.0 / 3.0,
                },
            ],
        }
    }

    #[test]
    fn test_write_distribution_csv_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dist.csv");
        write_distribution_csv(&sample(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("NO.,LOG_SOURCE,LOG_SOURCE_COUNT,LOG_SOURCE_PCT"));
        assert!(lines.next().unwrap().starts_with("1,FIREWALL,2,66.66"));
        assert!(lines.next().unwrap().starts_with("2,\"EDR, CLOUD\",1,33.33"));
    }

    #[test]
    fn test_pct_column_is_percent_scale() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dist.csv");
        write_distribution_csv(&sample(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let pcts: Vec<f64> = text
            .lines()
            .skip(1)
            .map(|line| line.rsplit(',').next().unwrap().parse().unwrap())
            .collect();
        assert!(pcts.iter().all(|p| *p > 1.0 && *p <= 100.0));
        assert!((pcts.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_read_rejects_bad_count() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dist.csv");
        fs::write(
            &path,
            "NO.,LOG_SOURCE,LOG_SOURCE_COUNT,LOG_SOURCE_PCT\n1,EDR,many,100\n",
        )
        .unwrap();

        let err = read_distribution_csv(&path, TicketField::LogSource).unwrap_err();
        assert!(matches!(err, ReportError::InputParse { ref reason, .. } if reason.starts_with("row 1")));
    }

    #[test]
    fn test_read_back_preserves_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dist.csv");
        let dist = sample();
        write_distribution_csv(&dist, &path).unwrap();

        let back = read_distribution_csv(&path, TicketField::LogSource).unwrap();
        assert_eq!(back, dist);
    }

    #[test]
    fn test_read_rejects_other_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dist.csv");
        write_distribution_csv(&sample(), &path).unwrap();

        let err = read_distribution_csv(&path, TicketField::ResolutionCode).unwrap_err();
        assert!(matches!(err, ReportError::InputParse { .. }));
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dist.csv");
        fs::write(&path, "stale content that is longer than the new file\n".repeat(20)).unwrap();

        write_distribution_csv(&sample(), &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert_eq!(text.lines().count(), 3);
    }
}
