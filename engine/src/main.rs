// Engine main entry point
use anyhow::Context;
use clap::Parser;
use engine::analysis::Period;
use engine::config::DashboardSettings;
use engine::data::CsvDirectorySource;
use engine::logging::{init_logging, LoggingConfig};
use engine::DashboardService;
use std::path::PathBuf;
use tracing::info;

/// Builds the market dashboard report from daily price history.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON settings file; built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding one `<SYMBOL>.csv` file per symbol.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Window for drawdown figures (e.g. "1m", "1y", "5y").
    #[arg(long)]
    drawdown_period: Option<String>,

    /// Window for the headline change and sparkline (e.g. "1d", "1w", "3m").
    #[arg(long)]
    change_period: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Write the report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig::from_env();
    init_logging(logging).map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    info!("Starting dashboard engine...");

    let mut settings = match &cli.config {
        Some(path) => DashboardSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => DashboardSettings::default(),
    };
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    let drawdown_period = cli
        .drawdown_period
        .as_deref()
        .map(Period::parse)
        .unwrap_or(settings.default_drawdown_period);
    let change_period = cli
        .change_period
        .as_deref()
        .map(Period::parse)
        .unwrap_or(settings.default_change_period);

    info!(data_dir = %settings.data_dir.display(), "Reading price history");
    let source = CsvDirectorySource::new(settings.data_dir.clone());
    let service = DashboardService::new(settings, source);
    let report = service.build_dashboard(drawdown_period, change_period);

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match cli.output {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("writing report to {}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => println!("{}", json),
    }
    Ok(())
}
