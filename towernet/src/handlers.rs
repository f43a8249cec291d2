use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use towernet_core::analysis::AnalysisProgressCallback;
use towernet_core::report::{
    ReportFormat, gather_report_data, generate_csv_report, generate_json_report,
    generate_markdown_report, generate_text_report, save_report,
};
use towernet_core::{
    AnalysisOptions, ClassifierThresholds, GeoPoint, Measurement, ReferenceNode, SearchStrategy,
    SignalClass, SignalClassifier, parse_rated_ceiling, run_analysis,
};
use tracing::info;

/// Rated ceiling as found in tower exports: `"-100 dBm"` or a bare number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CeilingValue {
    Number(i32),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TowerRecord {
    pub longitude: f64,
    pub latitude: f64,
    pub max_signal_rsrp: CeilingValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementRecord {
    pub longitude: f64,
    pub latitude: f64,
    pub signal_strength: f64,
}

/// Everything `analyze` needs, already parsed from the command line
pub struct AnalyzeRequest {
    pub towers: PathBuf,
    pub measurements: PathBuf,
    pub provider: String,
    pub format: ReportFormat,
    pub options: AnalysisOptions,
    pub show_progress: bool,
}

/// Expand `~` in a user-supplied path
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Load tower records and turn them into reference nodes
pub fn load_towers(path: &Path) -> anyhow::Result<Vec<ReferenceNode>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read towers file {}", path.display()))?;
    let records: Vec<TowerRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid towers JSON in {}", path.display()))?;

    if records.is_empty() {
        bail!("No towers found in {}", path.display());
    }
    info!("Loaded {} towers from {}", records.len(), path.display());

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| -> anyhow::Result<ReferenceNode> {
            let ceiling = match record.max_signal_rsrp {
                CeilingValue::Number(n) => n,
                CeilingValue::Text(ref s) => parse_rated_ceiling(s)
                    .with_context(|| format!("Tower {} in {}", index, path.display()))?,
            };
            Ok(ReferenceNode::new(
                index,
                GeoPoint::new(record.longitude, record.latitude),
                ceiling,
            ))
        })
        .collect()
}

/// Load measurement records in file order
pub fn load_measurements(path: &Path) -> anyhow::Result<Vec<Measurement>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read measurements file {}", path.display()))?;
    let records: Vec<MeasurementRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid measurements JSON in {}", path.display()))?;
    info!("Loaded {} measurements from {}", records.len(), path.display());

    Ok(records
        .into_iter()
        .enumerate()
        .map(|(index, r)| {
            Measurement::new(index, GeoPoint::new(r.longitude, r.latitude), r.signal_strength)
        })
        .collect())
}

/// Render report data in the requested format
pub fn render_report(
    data: &towernet_core::report::ReportData,
    format: &ReportFormat,
) -> Result<String, String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Json => {
            generate_json_report(data).map_err(|e| format!("Failed to encode JSON report: {}", e))
        }
        ReportFormat::Csv => Ok(generate_csv_report(data)),
        ReportFormat::Markdown => Ok(generate_markdown_report(data)),
    }
}

/// Load inputs, run the pipeline and render the report
pub fn run_analyze(request: &AnalyzeRequest) -> Result<String, String> {
    let spinner = if request.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .map_err(|e| e.to_string())?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(Arc::new(pb))
    } else {
        None
    };

    run_analyze_with_progress(request, spinner)
}

/// Same as [`run_analyze`], reporting on a caller-supplied progress bar.
///
/// The bar is always finished on return: with a summary on success, abandoned
/// with the error otherwise.
pub fn run_analyze_with_progress(
    request: &AnalyzeRequest,
    spinner: Option<Arc<ProgressBar>>,
) -> Result<String, String> {
    let result = analyze_inputs(request, spinner.clone());

    if let Some(ref pb) = spinner {
        match &result {
            Ok((_, towers, measurements)) => pb.finish_with_message(format!(
                "Analysis complete! {} measurements over {} towers",
                measurements, towers
            )),
            Err(e) => pb.abandon_with_message(format!("Analysis failed: {}", e)),
        }
    }

    result.map(|(report, _, _)| report)
}

fn analyze_inputs(
    request: &AnalyzeRequest,
    spinner: Option<Arc<ProgressBar>>,
) -> Result<(String, usize, usize), String> {
    if let Some(ref pb) = spinner {
        pb.set_message("Loading towers...");
    }
    let references = load_towers(&request.towers).map_err(|e| format!("{:#}", e))?;
    if let Some(ref pb) = spinner {
        pb.set_message("Loading measurements...");
    }
    let measurements = load_measurements(&request.measurements).map_err(|e| format!("{:#}", e))?;

    let progress_callback: Option<AnalysisProgressCallback> = spinner.map(|pb| {
        Arc::new(move |msg: String| pb.set_message(msg)) as AnalysisProgressCallback
    });

    let analysis = run_analysis(&references, &measurements, request.options, progress_callback)
        .map_err(|e| e.to_string())?;

    let data = gather_report_data(&analysis, &references, &measurements, &request.provider);
    let report = render_report(&data, &request.format)?;
    Ok((report, references.len(), measurements.len()))
}

pub fn handle_analyze(args: &ArgMatches, quiet: bool) {
    let towers = args.get_one::<String>("towers").map(|s| expand_path(s));
    let measurements = args.get_one::<String>("measurements").map(|s| expand_path(s));
    let (Some(towers), Some(measurements)) = (towers, measurements) else {
        fail("Both --towers and --measurements must be provided");
    };

    let margin = args
        .get_one::<f64>("margin")
        .copied()
        .unwrap_or(towernet_core::DEFAULT_MEDIUM_MARGIN);
    let strategy = args
        .get_one::<String>("index")
        .and_then(|s| SearchStrategy::from_str(s))
        .unwrap_or_default();
    let format = args
        .get_one::<String>("format")
        .and_then(|s| ReportFormat::from_str(s))
        .unwrap_or(ReportFormat::Text);
    let provider = args
        .get_one::<String>("provider")
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string());
    let output = args.get_one::<String>("output").map(|s| expand_path(s));

    let request = AnalyzeRequest {
        towers,
        measurements,
        provider,
        format,
        options: AnalysisOptions {
            thresholds: ClassifierThresholds {
                medium_margin: margin,
            },
            strategy,
        },
        show_progress: !quiet,
    };

    let report = match run_analyze(&request) {
        Ok(report) => report,
        Err(e) => fail(&e),
    };

    match output {
        Some(path) => match save_report(&report, &path) {
            Ok(()) => {
                if !quiet {
                    println!(
                        "{} Report saved to {}",
                        "✓".green().bold(),
                        path.display().to_string().bright_white()
                    );
                }
            }
            Err(e) => fail(&format!("Failed to save report to {}: {}", path.display(), e)),
        },
        None => print!("{}", report),
    }
}

/// Classify a single reading without building a network
pub fn classify_reading(ceiling: i32, observed: f64, margin: f64) -> SignalClass {
    SignalClassifier::with_margin(margin).classify_value(observed, ceiling)
}

pub fn handle_classify(args: &ArgMatches) {
    let (Some(&ceiling), Some(&observed)) = (
        args.get_one::<i32>("ceiling"),
        args.get_one::<f64>("observed"),
    ) else {
        fail("Both --ceiling and --observed must be provided");
    };
    let margin = args
        .get_one::<f64>("margin")
        .copied()
        .unwrap_or(towernet_core::DEFAULT_MEDIUM_MARGIN);

    let class = classify_reading(ceiling, observed, margin);
    let label = match class {
        SignalClass::Strong => "STRONG".green().bold(),
        SignalClass::Medium => "MEDIUM".yellow().bold(),
        SignalClass::Weak => "WEAK".red().bold(),
    };
    println!(
        "{} dBm against ceiling {} dBm (margin {}): {}",
        observed, ceiling, margin, label
    );
}

fn fail(msg: &str) -> ! {
    eprintln!("{} {}", "✗".red().bold(), msg.red());
    std::process::exit(1);
}
