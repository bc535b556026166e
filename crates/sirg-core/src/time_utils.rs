use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Resolve a `--timezone` value, mapping `"auto"` to the system timezone.
pub fn resolve_timezone_name(name: &str) -> String {
    if name.eq_ignore_ascii_case("auto") {
        get_system_timezone()
    } else {
        name.to_string()
    }
}

// ── TimestampParser ───────────────────────────────────────────────────────────

/// Naive layouts accepted for export cells and window overrides, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Turns heterogeneous export timestamps into timezone-naive wall-clock
/// values in one report timezone.
///
/// Naive inputs are taken as already being in the report timezone. Inputs
/// with an explicit offset (`Z`, `+03:00`) are converted into it first.
#[derive(Debug, Clone, Copy)]
pub struct TimestampParser {
    tz: Tz,
}

impl TimestampParser {
    /// Create a parser for the given IANA timezone name.
    ///
    /// Unknown names fall back to UTC with a warning.
    pub fn new(tz_name: &str) -> Self {
        let tz = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimestampParser: unrecognised timezone \"{}\", falling back to UTC",
                tz_name
            );
            Tz::UTC
        });
        Self { tz }
    }

    /// The timezone naive values are expressed in.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Parse `s`, returning `None` for empty or unrecognised input.
    pub fn parse(&self, s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        let normalised = match s.strip_suffix('Z') {
            Some(stripped) => format!("{}+00:00", stripped),
            None => s.to_string(),
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(self.to_local_naive(dt.with_timezone(&Utc)));
        }

        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }

    /// Express a UTC instant as a naive wall-clock value in the report timezone.
    pub fn to_local_naive(&self, dt: DateTime<Utc>) -> NaiveDateTime {
        dt.with_timezone(&self.tz).naive_local()
    }

    /// Decode the creation time embedded in a Trello card object id.
    ///
    /// The first 8 hex digits of the id are Unix seconds (UTC).
    pub fn decode_card_id(&self, card_id: &str) -> Option<NaiveDateTime> {
        let prefix = card_id.trim().get(..8)?;
        let secs = i64::from_str_radix(prefix, 16).ok()?;
        let utc = Utc.timestamp_opt(secs, 0).single()?;
        Some(self.to_local_naive(utc))
    }
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self { tz: Tz::UTC }
    }
}

// ── Report date formatting ────────────────────────────────────────────────────

/// Format a timestamp as the upper-case `ddMONyy` stamp used in file names,
/// e.g. `03MAY23`.
pub fn format_report_date(ts: NaiveDateTime) -> String {
    ts.format("%d%b%y").to_string().to_uppercase()
}
