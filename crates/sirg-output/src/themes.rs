use sirg_core::error::{ReportError, Result};

/// Colour set of the HTML report table.
///
/// `_light` variants use a pale header with dark text; `_dark` variants a
/// saturated header with white text and stronger row banding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlTheme {
    pub name: &'static str,
    pub header_background: &'static str,
    pub header_text: &'static str,
    pub border: &'static str,
    pub odd_row_background: &'static str,
    pub even_row_background: &'static str,
    pub text: &'static str,
}

impl HtmlTheme {
    const fn light(
        name: &'static str,
        header_background: &'static str,
        border: &'static str,
        even_row_background: &'static str,
    ) -> Self {
        Self {
            name,
            header_background,
            header_text: "#000000",
            border,
            odd_row_background: "#FFFFFF",
            even_row_background,
            text: "#000000",
        }
    }

    const fn dark(
        name: &'static str,
        header_background: &'static str,
        border: &'static str,
        even_row_background: &'static str,
    ) -> Self {
        Self {
            name,
            header_background,
            header_text: "#FFFFFF",
            border,
            odd_row_background: "#FFFFFF",
            even_row_background,
            text: "#000000",
        }
    }

    /// Look up one of the [`THEMES`] by name.
    pub fn by_name(name: &str) -> Result<&'static HtmlTheme> {
        THEMES
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| ReportError::InvalidTheme(name.to_string()))
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        THEMES.iter().map(|t| t.name)
    }
}

impl Default for HtmlTheme {
    fn default() -> Self {
        THEMES[0]
    }
}

/// Every available theme; the first one is the default.
pub static THEMES: [HtmlTheme; 12] = [
    HtmlTheme::light("grey_light", "#D9D9D9", "#BFBFBF", "#F2F2F2"),
    HtmlTheme::dark("grey_dark", "#595959", "#404040", "#D9D9D9"),
    HtmlTheme::light("blue_light", "#BDD7EE", "#9BC2E6", "#DDEBF7"),
    HtmlTheme::dark("blue_dark", "#305496", "#203764", "#B4C6E7"),
    HtmlTheme::light("green_light", "#C6E0B4", "#A9D08E", "#E2EFDA"),
    HtmlTheme::dark("green_dark", "#548235", "#375623", "#C6E0B4"),
    HtmlTheme::light("orange_light", "#F8CBAD", "#F4B084", "#FCE4D6"),
    HtmlTheme::dark("orange_dark", "#C65911", "#833C0C", "#F8CBAD"),
    HtmlTheme::light("red_light", "#FFCCCC", "#FF9999", "#FFE5E5"),
    HtmlTheme::dark("red_dark", "#C00000", "#800000", "#FFB3B3"),
    HtmlTheme::light("yellow_light", "#FFE699", "#FFD966", "#FFF2CC"),
    HtmlTheme::dark("yellow_dark", "#BF8F00", "#7F6000", "#FFE699"),
];
