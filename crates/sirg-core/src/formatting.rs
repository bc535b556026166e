//! Percentage helpers shared by the aggregators and the run summary.

/// Share of `part` in `whole` on a 0–100 scale, unrounded.
///
/// Returns `0.0` if `whole` is zero.
///
/// ```
/// use sirg_core::formatting::share_percent;
///
/// assert!((share_percent(1, 4) - 25.0).abs() < 1e-9);
/// assert_eq!(share_percent(3, 0), 0.0);
/// ```
pub fn share_percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Render a 0–100 percentage with `decimals` places and a trailing `%`.
///
/// ```
/// use sirg_core::formatting::format_percentage;
///
/// assert_eq!(format_percentage(60.0, 1), "60.0%");
/// ```
pub fn format_percentage(pct: f64, decimals: usize) -> String {
    format!("{pct:.decimals$}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_percent_thirds_sum_to_hundred() {
        let total: f64 = [1, 1, 1].iter().map(|&c| share_percent(c, 3)).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(share_percent(1, 3), 2), "33.33%");
        assert_eq!(format_percentage(100.0, 0), "100%");
        assert_eq!(format_percentage(share_percent(2, 3), 1), "66.7%");
    }
}
