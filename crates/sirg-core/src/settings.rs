use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Default location of the exported Trello board.
pub const DEFAULT_INPUT: &str = "INPUT/trello_board.csv";

/// Default directory reports are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "OUTPUT";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Weekly security-investigation reports from an exported Trello board
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sirg",
    about = "Weekly security-investigation reports from an exported Trello board",
    version
)]
pub struct Settings {
    /// Exported board (.csv, .xlsx, .xls, .ods)
    #[arg(long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Directory the reports are written to
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Report start, yyyy-mm-dd hh:mm (defaults to last Thursday 16:00 one week back)
    #[arg(long)]
    pub start: Option<String>,

    /// Report end, yyyy-mm-dd hh:mm (defaults to the latest Thursday 15:59:59)
    #[arg(long)]
    pub end: Option<String>,

    /// Colour theme of the HTML report
    #[arg(long, default_value = "grey_light", value_parser = [
        "grey_light", "grey_dark", "blue_light", "blue_dark",
        "green_light", "green_dark", "orange_light", "orange_dark",
        "red_light", "red_dark", "yellow_light", "yellow_dark",
    ])]
    pub theme: String,

    /// Timezone for offset-carrying timestamps (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and resolve `auto` values.
    pub fn load() -> Self {
        Self::resolve_auto_values(Self::parse())
    }

    /// Same as [`Settings::load`] over an explicit argument list.
    pub fn load_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::resolve_auto_values(Self::parse_from(args))
    }

    /// Resolve the `"auto"` timezone and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        settings.timezone = crate::time_utils::resolve_timezone_name(&settings.timezone);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}
