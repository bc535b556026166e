//! SVG charts drawn with `plotters`.
//!
//! * distribution pie: one slice per value, palette cycled to the slice count
//! * daily trendline: count per day with markers, a dashed horizontal
//!   reference at the mean, and a labelled mean marker

use std::path::Path;

use chrono::Duration;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use sirg_core::error::{ReportError, Result};
use sirg_data::aggregator::{CategoricalDistribution, DailyTrend};
use tracing::debug;

const CHART_SIZE: (u32, u32) = (900, 700);
const TREND_SIZE: (u32, u32) = (1100, 600);
const FONT: &str = "sans-serif";
/// Dash and gap length of the mean reference line, in pixels.
const MEAN_DASH: u32 = 8;
const MEAN_GAP: u32 = 6;

/// Slice colours, reused in order when there are more slices than colours.
pub const PIE_PALETTE: [RGBColor; 4] = [
    RGBColor(0xE7, 0xC6, 0x5B),
    RGBColor(0x22, 0x55, 0x60),
    RGBColor(0x31, 0x0D, 0x20),
    RGBColor(0x96, 0x03, 0x1A),
];

const MARKER_COLOUR: RGBColor = RGBColor(231, 198, 91);
const TITLE_COLOUR: RGBColor = RGBColor(0x7F, 0x7F, 0x7F);

pub fn pie_title(dist: &CategoricalDistribution) -> String {
    format!("Security Investigation Tickets distributed by {}", dist.field)
}

pub const TREND_TITLE: &str = "VSOC tickets trendline grouped by the day";

/// Subtitle carrying the mean truncated to an integer.
pub fn trend_subtitle(mean: f64) -> String {
    format!(
        "Dashed line represents the average no. VSOC tickets ({})",
        mean.trunc() as i64
    )
}

/// `n` colours taken cyclically from [`PIE_PALETTE`].
pub fn pie_colours(n: usize) -> Vec<RGBColor> {
    PIE_PALETTE.iter().copied().cycle().take(n).collect()
}

// ── Distribution pie ──────────────────────────────────────────────────────────

/// Draw `dist` as a pie chart into an SVG file at `path`.
pub fn write_distribution_pie(dist: &CategoricalDistribution, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| ReportError::write(path, e))?;
    let area = root
        .titled(&pie_title(dist), (FONT, 24).into_font().color(&TITLE_COLOUR))
        .map_err(|e| ReportError::write(path, e))?;

    if !dist.is_empty() {
        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = f64::from(w.min(h)) * 0.35;
        let sizes: Vec<f64> = dist.rows.iter().map(|r| r.pct).collect();
        let labels: Vec<String> = dist.rows.iter().map(|r| r.value.clone()).collect();
        let colours = pie_colours(sizes.len());

        let mut pie = Pie::new(&center, &radius, &sizes, &colours, &labels);
        pie.start_angle(-90.0);
        pie.label_style((FONT, 16).into_font().color(&BLACK));
        pie.percentages((FONT, radius * 0.08).into_font().color(&WHITE));
        area.draw(&pie).map_err(|e| ReportError::write(path, e))?;
    }

    root.present().map_err(|e| ReportError::write(path, e))?;
    debug!("Wrote {} chart to {}", dist.field, path.display());
    Ok(())
}

// ── Daily trendline ───────────────────────────────────────────────────────────

/// Horizontal dashed line at `mean` from day offset 0 to `span`.
fn mean_line(span: f64, mean: f64) -> DashedLineSeries<std::vec::IntoIter<(f64, f64)>, u32> {
    DashedLineSeries::new(
        vec![(0.0, mean), (span, mean)],
        MEAN_DASH,
        MEAN_GAP,
        BLACK.stroke_width(1),
    )
}

/// Draw `trend` as a line/marker chart with a mean reference line.
///
/// The x axis is the day offset from the first represented day, labelled
/// with the calendar date.
pub fn write_trendline(trend: &DailyTrend, path: &Path) -> Result<()> {
    let (Some(first_day), Some(last_day), Some(mean)) =
        (trend.first_day(), trend.last_day(), trend.mean())
    else {
        return Err(ReportError::write(path, "no daily counts to plot"));
    };

    let span = (last_day - first_day).num_days() as f64;
    let max_count = trend.days.iter().map(|d| d.count).max().unwrap_or(0) as f64;
    let points: Vec<(f64, f64)> = trend
        .days
        .iter()
        .map(|d| ((d.day - first_day).num_days() as f64, d.count as f64))
        .collect();
    // Mean marker sits half the number of represented days before the last day.
    let mean_x = span - trend.len() as f64 / 2.0;

    let root = SVGBackend::new(path, TREND_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| ReportError::write(path, e))?;
    let area = root
        .titled(TREND_TITLE, (FONT, 24).into_font().color(&TITLE_COLOUR))
        .map_err(|e| ReportError::write(path, e))?;

    let x_min = mean_x.min(0.0) - 0.5;
    let x_max = span + 0.5;
    let mut chart = ChartBuilder::on(&area)
        .caption(
            trend_subtitle(mean),
            (FONT, 16).into_font().color(&TITLE_COLOUR),
        )
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, 0f64..(max_count * 1.2).max(1.0))
        .map_err(|e| ReportError::write(path, e))?;

    let date_label = |x: &f64| {
        (first_day + Duration::days(x.round() as i64))
            .format("%d %b")
            .to_string()
    };
    chart
        .configure_mesh()
        .x_labels(trend.len().clamp(2, 14))
        .x_label_formatter(&date_label)
        .y_desc("Tickets")
        .draw()
        .map_err(|e| ReportError::write(path, e))?;

    chart
        .draw_series(LineSeries::new(points.clone(), MARKER_COLOUR.stroke_width(2)))
        .map_err(|e| ReportError::write(path, e))?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&p| Circle::new(p, 6, MARKER_COLOUR.filled())),
        )
        .map_err(|e| ReportError::write(path, e))?;
    chart
        .draw_series(points.iter().map(|&p| Circle::new(p, 6, BLACK.stroke_width(1))))
        .map_err(|e| ReportError::write(path, e))?;

    chart
        .draw_series(mean_line(span, mean))
        .map_err(|e| ReportError::write(path, e))?;
    chart
        .draw_series(std::iter::once(Circle::new(
            (mean_x, mean),
            6,
            MARKER_COLOUR.filled(),
        )))
        .map_err(|e| ReportError::write(path, e))?;
    chart
        .draw_series(std::iter::once(Text::new(
            format!("{mean:.2}"),
            (mean_x, mean),
            (FONT, 14).into_font(),
        )))
        .map_err(|e| ReportError::write(path, e))?;

    root.present().map_err(|e| ReportError::write(path, e))?;
    debug!("Wrote trendline over {} days to {}", trend.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sirg_core::models::TicketField;
    use sirg_data::aggregator::{CategoryCount, DailyCount};
    use tempfile::TempDir;

    fn distribution(n: usize) -> CategoricalDistribution {
        CategoricalDistribution {
            field: TicketField::LogSource,
            rows: (0..n)
                .map(|i| CategoryCount {
                    no: i + 1,
                    value: format!("SRC{i}"),
                    count: 1,
                    pct: 100.0 / n as f64,
                })
                .collect(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 5, d).unwrap()
    }

    #[test]
    fn test_pie_colours_cycle() {
        let colours = pie_colours(6);
        assert_eq!(colours.len(), 6);
        assert_eq!(colours[4].rgb(), PIE_PALETTE[0].rgb());
        assert_eq!(colours[5].rgb(), PIE_PALETTE[1].rgb());
        assert!(pie_colours(0).is_empty());
    }

    #[test]
    fn test_titles() {
        assert_eq!(
            pie_title(&distribution(1)),
            "Security Investigation Tickets distributed by LOG_SOURCE"
        );
        assert_eq!(
            trend_subtitle(2.9),
            "Dashed line represents the average no. VSOC tickets (2)"
        );
    }

    #[test]
    fn test_write_distribution_pie() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pie.svg");
        write_distribution_pie(&distribution(5), &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Security Investigation Tickets distributed by LOG_SOURCE"));
        assert!(svg.contains("SRC4"));
    }

    #[test]
    fn test_write_trendline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trend.svg");
        let trend = DailyTrend {
            days: vec![
                DailyCount { day: day(1), count: 3 },
                DailyCount { day: day(2), count: 1 },
                DailyCount { day: day(4), count: 2 },
            ],
        };
        write_trendline(&trend, &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains(TREND_TITLE));
        assert!(svg.contains("(2)"));
        assert!(svg.contains("2.00"));
    }

    #[test]
    fn test_mean_line_is_dashed() {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (400, 100)).into_drawing_area();
            let mut chart = ChartBuilder::on(&root)
                .build_cartesian_2d(0f64..4.0, 0f64..4.0)
                .unwrap();
            chart.draw_series(mean_line(4.0, 2.0)).unwrap();
            root.present().unwrap();
        }
        // One polyline per dash, none of them spanning the whole width.
        let dashes = svg.matches("<polyline").count();
        assert!(dashes > 10, "expected a dashed line, got {dashes} segments");
    }

    #[test]
    fn test_write_trendline_empty_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trend.svg");
        let err = write_trendline(&DailyTrend::default(), &path).unwrap_err();
        assert!(matches!(err, ReportError::Write { .. }));
        assert!(!path.exists());
    }
}
