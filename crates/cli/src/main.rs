//! Vision Guard - Main Entry Point
//!
//! Reads detections recorded from the object detector and prints the
//! walking-safety report as JSON.

mod logging;
mod settings;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use hazard_estimator::{SafetyReport, SafetyTier};
use scene_analyzer::{PreparedFrame, ReplayDetector, SceneAnalyzer};
use tracing::{info, warn};

use crate::logging::{init_logging, LogFormat};
use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "vision-guard")]
#[command(about = "Walking-safety report from object detections", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON array of detections, or '-' for stdin
    #[arg(long, short)]
    detections: PathBuf,

    /// Photo the detections belong to; resized to the detector frame first
    #[arg(long, short)]
    image: Option<PathBuf>,

    /// Configuration file (toml, json or yaml)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format)?;

    info!("=== Vision Guard v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load(cli.config.as_deref()).context("failed to load configuration")?;
    let detector = load_detections(&cli.detections)?;
    let analyzer = SceneAnalyzer::new(settings.analyzer, detector)?;

    let report = match &cli.image {
        Some(path) => {
            let size = analyzer.estimator().geometry().image_size();
            let frame = PreparedFrame::open(path, size)
                .with_context(|| format!("failed to prepare image {}", path.display()))?;
            analyzer.analyze_frame(&frame)?
        }
        None => analyzer.analyze_detections(analyzer.detector().detections()),
    };

    log_summary(&report);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn log_summary(report: &SafetyReport) {
    info!(
        stop = report.count_tier(SafetyTier::Stop),
        warning = report.count_tier(SafetyTier::Warning),
        safe = report.count_tier(SafetyTier::Safe),
        "Report complete"
    );

    if !report.has_stop() {
        return;
    }
    for hazard in &report.hazards {
        if let Some(action) = hazard.action() {
            warn!("{} {}: {}", hazard.label, hazard.bearing, action);
        }
    }
}

fn load_detections(path: &Path) -> anyhow::Result<ReplayDetector> {
    let detector = if path == Path::new("-") {
        ReplayDetector::from_reader(io::stdin().lock())?
    } else {
        let file = File::open(path)
            .with_context(|| format!("failed to open detections {}", path.display()))?;
        ReplayDetector::from_reader(BufReader::new(file))?
    };
    Ok(detector)
}
