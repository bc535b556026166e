//! Themed HTML rendering of a [`ReportTable`].
//!
//! Produces a single self-contained page with inline CSS: one banded table,
//! header row and index column styled from the selected [`HtmlTheme`].

use std::fs;
use std::path::Path;

use sirg_core::error::{ReportError, Result};
use sirg_core::models::{Cell, ReportTable};
use tracing::debug;

use crate::themes::HtmlTheme;

/// Render `table` as a complete HTML document titled `title`.
pub fn render_html_report(table: &ReportTable, theme: &HtmlTheme, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
{table}
</body>
</html>
"#,
        title = html_escape(title),
        css = inline_css(theme),
        table = render_html_table(table),
    )
}

/// Render just the `<table>` element.
pub fn render_html_table(table: &ReportTable) -> String {
    let header: String = table
        .headers
        .iter()
        .map(|h| format!("<th>{}</th>", html_escape(h)))
        .collect();

    let rows: String = table
        .rows
        .iter()
        .map(|row| {
            let cells: String = row.iter().map(render_cell).collect();
            format!("    <tr>{cells}</tr>\n")
        })
        .collect();

    format!(
        r#"<table class="report">
  <thead>
    <tr>{header}</tr>
  </thead>
  <tbody>
{rows}  </tbody>
</table>"#
    )
}

/// Render and write the report to `path`, overwriting it.
pub fn write_html_report(
    table: &ReportTable,
    theme: &HtmlTheme,
    title: &str,
    path: &Path,
) -> Result<()> {
    fs::write(path, render_html_report(table, theme, title))
        .map_err(|e| ReportError::write(path, e))?;
    debug!(
        "Wrote {} rows with theme {} to {}",
        table.len(),
        theme.name,
        path.display()
    );
    Ok(())
}

fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Integer(_) => {
            format!("<td class=\"num\">{}</td>", html_escape(&cell.to_string()))
        }
        _ => format!("<td>{}</td>", html_escape(&cell.to_string())),
    }
}

fn inline_css(theme: &HtmlTheme) -> String {
    format!(
        r#"
body {{ font-family: Century Gothic, sans-serif; color: {text}; }}
table.report {{ border-collapse: collapse; font-size: medium; }}
table.report th {{
    background-color: {header_bg};
    color: {header_text};
    border-bottom: 2px solid {border};
    padding: 0px 20px 0px 0px;
    text-align: left;
}}
table.report td {{
    border-bottom: 2px solid {border};
    padding: 0px 20px 0px 0px;
    text-align: left;
}}
table.report td.num {{ text-align: right; }}
table.report tbody tr:nth-child(odd) {{ background-color: {odd_bg}; }}
table.report tbody tr:nth-child(even) {{ background-color: {even_bg}; }}
"#,
        text = theme.text,
        header_bg = theme.header_background,
        header_text = theme.header_text,
        border = theme.border,
        odd_bg = theme.odd_row_background,
        even_bg = theme.even_row_background,
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_table() -> ReportTable {
        let mut table = ReportTable::with_columns(&["T#", "DESC"]);
        table.push_indexed(vec![Cell::text("T1"), Cell::text("<script>alert('x')</script>")]);
        table.push_indexed(vec![Cell::text("T2"), Cell::Empty]);
        table
    }

    #[test]
    fn test_table_structure() {
        let html = render_html_table(&sample_table());
        assert!(html.contains("<th>NO.</th><th>T#</th><th>DESC</th>"));
        assert_eq!(html.matches("<tr>").count(), 3);
        assert!(html.contains("<td class=\"num\">2</td><td>T2</td><td></td>"));
    }

    #[test]
    fn test_cells_are_escaped() {
        let html = render_html_table(&sample_table());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn test_report_uses_theme_colours() {
        let theme = HtmlTheme::by_name("green_dark").unwrap();
        let html = render_html_report(&sample_table(), theme, "SOC report");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>SOC report</title>"));
        assert!(html.contains(theme.header_background));
        assert!(html.contains(theme.even_row_background));
    }

    #[test]
    fn test_write_html_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.html");
        write_html_report(&sample_table(), &HtmlTheme::default(), "r", &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("<td>T1</td>"));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.html");
        let err = write_html_report(&sample_table(), &HtmlTheme::default(), "r", &path).unwrap_err();
        assert!(matches!(err, ReportError::Write { .. }));
    }
}
