mod bootstrap;

use anyhow::Result;
use sirg_core::settings::Settings;
use sirg_runtime::pipeline::ReportPipeline;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("sirg v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: {}, Output: {}, Theme: {}, Timezone: {}",
        settings.input.display(),
        settings.output_dir.display(),
        settings.theme,
        settings.timezone
    );

    bootstrap::ensure_output_dir(&settings.output_dir)?;

    let pipeline = ReportPipeline::from_settings(&settings)?;
    let now = chrono::Local::now().naive_local();
    let summary = pipeline.run_at(now)?;

    tracing::info!(
        "Report generated for {} tickets in {}",
        summary.tickets,
        pipeline.output_dir().display()
    );
    print!("{summary}");
    Ok(())
}
