//! Stateless reducers over the normalised ticket set.
//!
//! Each aggregate is derived independently from the same read-only slice of
//! [`Ticket`]s: a categorical distribution per field, the resolution-code
//! summary and the daily trend.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sirg_core::formatting::share_percent;
use sirg_core::models::{Ticket, TicketField};

// ── CategoricalDistribution ───────────────────────────────────────────────────

/// One value of a categorical field and how often it occurs.
///
/// Serialises in field order, matching one `NO.,<FIELD>,<FIELD>_COUNT,<FIELD>_PCT`
/// record of the distribution export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// 1-based rank.
    pub no: usize,
    pub value: String,
    pub count: usize,
    /// Share of the counted tickets as a percentage (0–100, not a 0–1 ratio).
    pub pct: f64,
}

/// Count and percentage breakdown of one field, most frequent value first.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalDistribution {
    pub field: TicketField,
    pub rows: Vec<CategoryCount>,
}

impl CategoricalDistribution {
    /// Total number of tickets represented.
    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── DailyTrend ────────────────────────────────────────────────────────────────

/// Tickets created on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: usize,
}

/// Per-day ticket counts, ascending by day.
///
/// Only days with at least one ticket are present; empty days are not
/// synthesised.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyTrend {
    pub days: Vec<DailyCount>,
}

impl DailyTrend {
    /// Arithmetic mean of the represented days' counts.
    pub fn mean(&self) -> Option<f64> {
        if self.days.is_empty() {
            return None;
        }
        let total: usize = self.days.iter().map(|d| d.count).sum();
        Some(total as f64 / self.days.len() as f64)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.day)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.days.last().map(|d| d.day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

// ── TicketAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that groups tickets by field value or by day.
pub struct TicketAggregator;

impl TicketAggregator {
    /// Break `field` down into counts and percentages.
    ///
    /// Rows are ordered by descending count; equal counts keep the order in
    /// which the values were first seen. Blank values are not counted, and
    /// percentages are shares of the counted tickets.
    pub fn distribution(tickets: &[Ticket], field: TicketField) -> CategoricalDistribution {
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in present_values(tickets, field) {
            let count = counts.entry(value).or_insert_with(|| {
                order.push(value);
                0
            });
            *count += 1;
        }

        let mut ranked: Vec<(&str, usize)> = order.into_iter().map(|v| (v, counts[v])).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let total: usize = ranked.iter().map(|(_, count)| count).sum();
        let rows = ranked
            .into_iter()
            .enumerate()
            .map(|(i, (value, count))| CategoryCount {
                no: i + 1,
                value: value.to_string(),
                count,
                pct: share_percent(count, total),
            })
            .collect();

        CategoricalDistribution { field, rows }
    }

    /// Ticket count per resolution code, ascending by code. Tickets without
    /// a code are left out.
    pub fn resolution_summary(tickets: &[Ticket]) -> BTreeMap<String, usize> {
        let mut summary: BTreeMap<String, usize> = BTreeMap::new();
        for code in present_values(tickets, TicketField::ResolutionCode) {
            *summary.entry(code.to_string()).or_default() += 1;
        }
        summary
    }

    /// Ticket count per calendar day of `created_at`.
    pub fn daily_trend(tickets: &[Ticket]) -> DailyTrend {
        let mut map: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for ticket in tickets {
            *map.entry(ticket.created_at.date()).or_default() += 1;
        }
        DailyTrend {
            days: map
                .into_iter()
                .map(|(day, count)| DailyCount { day, count })
                .collect(),
        }
    }
}

/// Non-blank values of `field`, in ticket order.
fn present_values(tickets: &[Ticket], field: TicketField) -> impl Iterator<Item = &str> {
    tickets
        .iter()
        .map(move |t| field.value(t))
        .filter(|v| !v.trim().is_empty())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::filter_tickets;
    use chrono::NaiveDateTime;
    use sirg_core::models::{INVESTIGATION_CATEGORY, RESOLVED_STATUS};
    use sirg_core::window::ReportWindow;

    fn ts(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 5, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn make_ticket(id: &str, created: NaiveDateTime, log_source: &str, code: &str) -> Ticket {
        Ticket {
            id: id.to_string(),
            description: String::new(),
            status: RESOLVED_STATUS.to_string(),
            category: INVESTIGATION_CATEGORY.to_string(),
            created_at: created,
            responded_at: None,
            resolved_at: None,
            log_source: log_source.to_string(),
            resolution_code: code.to_string(),
            priority: "P2".to_string(),
            offense_id: String::new(),
        }
    }

    // ── distribution ──────────────────────────────────────────────────────────

    #[test]
    fn test_distribution_sorted_by_descending_count() {
        let tickets = vec![
            make_ticket("T1", ts(2, 9), "EDR", "RC01"),
            make_ticket("T2", ts(2, 10), "FIREWALL", "RC01"),
            make_ticket("T3", ts(2, 11), "FIREWALL", "RC02"),
            make_ticket("T4", ts(3, 9), "PROXY", "RC01"),
            make_ticket("T5", ts(3, 9), "FIREWALL", "RC03"),
        ];
        let dist = TicketAggregator::distribution(&tickets, TicketField::LogSource);

        let values: Vec<&str> = dist.rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["FIREWALL", "EDR", "PROXY"]);
        let nos: Vec<usize> = dist.rows.iter().map(|r| r.no).collect();
        assert_eq!(nos, vec![1, 2, 3]);
        assert_eq!(dist.rows[0].count, 3);
        assert!((dist.rows[0].pct - 60.0).abs() < 1e-9);
        assert_eq!(dist.total(), 5);
    }

    #[test]
    fn test_distribution_percentages_sum_to_hundred() {
        let sources = ["A", "B", "C", "A", "B", "A", "D"];
        let tickets: Vec<Ticket> = sources
            .iter()
            .enumerate()
            .map(|(i, s)| make_ticket(&format!("T{i}"), ts(2, 9), s, "RC01"))
            .collect();

        for field in [TicketField::LogSource, TicketField::ResolutionCode] {
            let dist = TicketAggregator::distribution(&tickets, field);
            let sum: f64 = dist.rows.iter().map(|r| r.pct).sum();
            assert!((sum - 100.0).abs() < 1e-9, "{field}: {sum}");
        }
    }

    #[test]
    fn test_distribution_skips_blank_values() {
        let tickets = vec![
            make_ticket("T1", ts(2, 9), "EDR", "RC01"),
            make_ticket("T2", ts(2, 10), "", "RC01"),
            make_ticket("T3", ts(2, 11), "  ", "RC01"),
        ];
        let dist = TicketAggregator::distribution(&tickets, TicketField::LogSource);

        assert_eq!(dist.rows.len(), 1);
        assert_eq!(dist.rows[0].value, "EDR");
        assert_eq!(dist.rows[0].count, 1);
        assert!((dist.rows[0].pct - 100.0).abs() < 1e-9);
        assert_eq!(dist.total(), 1);
    }

    #[test]
    fn test_distribution_all_blank_is_empty() {
        let tickets = vec![make_ticket("T1", ts(2, 9), "", "RC01")];
        let dist = TicketAggregator::distribution(&tickets, TicketField::LogSource);
        assert!(dist.is_empty());
    }

    #[test]
    fn test_distribution_empty() {
        let dist = TicketAggregator::distribution(&[], TicketField::ResolutionCode);
        assert!(dist.is_empty());
        assert_eq!(dist.total(), 0);
    }

    // ── resolution_summary ────────────────────────────────────────────────────

    #[test]
    fn test_resolution_summary_groups_by_code() {
        let tickets = vec![
            make_ticket("T1", ts(2, 9), "EDR", "RC02"),
            make_ticket("T2", ts(2, 9), "EDR", "RC01"),
            make_ticket("T3", ts(2, 9), "EDR", "RC02"),
        ];
        let summary = TicketAggregator::resolution_summary(&tickets);
        let pairs: Vec<(&str, usize)> = summary.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(pairs, vec![("RC01", 1), ("RC02", 2)]);
    }

    #[test]
    fn test_resolution_summary_skips_blank_codes() {
        let tickets = vec![
            make_ticket("T1", ts(2, 9), "EDR", "RC01"),
            make_ticket("T2", ts(2, 9), "EDR", ""),
        ];
        let summary = TicketAggregator::resolution_summary(&tickets);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary.get("RC01"), Some(&1));
        assert!(!summary.contains_key(""));
    }

    // ── daily_trend ───────────────────────────────────────────────────────────

    #[test]
    fn test_daily_trend_groups_and_sorts_by_day() {
        let tickets = vec![
            make_ticket("T1", ts(3, 9), "EDR", "RC01"),
            make_ticket("T2", ts(1, 9), "EDR", "RC01"),
            make_ticket("T3", ts(3, 22), "EDR", "RC01"),
        ];
        let trend = TicketAggregator::daily_trend(&tickets);

        assert_eq!(trend.len(), 2);
        assert_eq!(trend.first_day(), NaiveDate::from_ymd_opt(2023, 5, 1));
        assert_eq!(trend.last_day(), NaiveDate::from_ymd_opt(2023, 5, 3));
        assert_eq!(trend.days[1].count, 2);
    }

    #[test]
    fn test_daily_trend_mean_over_represented_days_only() {
        let tickets = vec![
            make_ticket("T1", ts(1, 9), "EDR", "RC01"),
            make_ticket("T2", ts(1, 10), "EDR", "RC01"),
            make_ticket("T3", ts(1, 11), "EDR", "RC01"),
            make_ticket("T4", ts(5, 9), "EDR", "RC01"),
        ];
        let trend = TicketAggregator::daily_trend(&tickets);
        // Days 2-4 are empty and do not lower the mean.
        assert_eq!(trend.mean(), Some(2.0));
    }

    #[test]
    fn test_daily_trend_empty_has_no_mean() {
        let trend = TicketAggregator::daily_trend(&[]);
        assert!(trend.is_empty());
        assert_eq!(trend.mean(), None);
    }

    #[test]
    fn test_daily_trend_after_window_excludes_outside_day() {
        let tickets = vec![
            make_ticket("T1", ts(1, 18), "EDR", "RC01"),
            make_ticket("T2", ts(2, 9), "EDR", "RC01"),
            make_ticket("T3", ts(9, 9), "EDR", "RC01"),
        ];
        let window = ReportWindow::new(ts(1, 16), ts(4, 16));
        let trend = TicketAggregator::daily_trend(&filter_tickets(tickets, &window));
        assert_eq!(trend.len(), 2);
    }
}
