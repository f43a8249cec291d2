// Report generation from an analysis run

use crate::analysis::{ClassCounts, NetworkAnalysis, TowerCoverage};
use crate::classify::ClassifierThresholds;
use crate::model::{Measurement, ReferenceNode};
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub run_id: String,
    pub provider: String,
    pub generated_at: i64,
    pub strategy: String,
    pub thresholds: ClassifierThresholds,
    pub summary: NetworkSummary,
    pub class_counts: ClassCounts,
    pub coverage: Vec<TowerCoverage>,
    pub tree_edges: Vec<TreeEdgeData>,
    pub measurements: Vec<MeasurementData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub towers: usize,
    pub measurements: usize,
    pub nodes: usize,
    pub edges: usize,
    pub tree_edges: usize,
    pub components: usize,
    pub tree_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEdgeData {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementData {
    pub label: String,
    pub longitude: f64,
    pub latitude: f64,
    pub signal_strength: f64,
    pub tower: String,
    pub rated_ceiling: i32,
    pub distance: f64,
    pub class: String,
}

pub fn gather_report_data(
    analysis: &NetworkAnalysis,
    references: &[ReferenceNode],
    measurements: &[Measurement],
    provider: &str,
) -> ReportData {
    let network = &analysis.network;
    let label = |id: usize| {
        network
            .node(NodeIndex::new(id))
            .map(|n| n.label())
            .unwrap_or_else(|| format!("Node_{}", id))
    };

    let tree_edges = analysis
        .tree
        .edges(network)
        .map(|e| TreeEdgeData {
            source: label(e.source),
            target: label(e.target),
            weight: e.weight,
        })
        .collect();

    let measurement_rows = analysis
        .classifications
        .iter()
        .filter_map(|c| {
            let m = measurements.get(c.slot)?;
            let tower = references.get(c.reference)?;
            Some(MeasurementData {
                label: m.label(),
                longitude: m.position.longitude,
                latitude: m.position.latitude,
                signal_strength: c.observed,
                tower: tower.label(),
                rated_ceiling: c.ceiling,
                distance: c.distance,
                class: c.class.to_string(),
            })
        })
        .collect();

    ReportData {
        run_id: uuid::Uuid::new_v4().to_string(),
        provider: provider.to_string(),
        generated_at: chrono::Utc::now().timestamp(),
        strategy: analysis.options.strategy.as_str().to_string(),
        thresholds: analysis.options.thresholds,
        summary: NetworkSummary {
            towers: network.reference_count(),
            measurements: network.measurement_count(),
            nodes: network.node_count(),
            edges: network.edge_count(),
            tree_edges: analysis.tree.edge_count(),
            components: analysis.tree.component_count(),
            tree_weight: analysis.tree.total_weight(),
        },
        class_counts: analysis.class_counts(),
        coverage: analysis.coverage(references),
        tree_edges,
        measurements: measurement_rows,
    }
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();
    let margin = data.thresholds.medium_margin;

    report.push_str(RULE);
    report.push_str("                     TOWERNET SIGNAL NETWORK REPORT\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("Run ID:        {}\n", data.run_id));
    report.push_str(&format!("Provider:      {}\n", data.provider));
    report.push_str(&format!("Generated:     {}\n", format_timestamp(data.generated_at)));
    report.push_str(&format!("Search:        {}\n", data.strategy));
    report.push_str(&format!("Medium margin: {} dBm\n", margin));
    report.push('\n');

    report.push_str(RULE);
    report.push_str("NETWORK SUMMARY\n");
    report.push_str(RULE);
    report.push('\n');
    report.push_str(&format!("Towers:          {}\n", data.summary.towers));
    report.push_str(&format!("Measurements:    {}\n", data.summary.measurements));
    report.push_str(&format!("Graph edges:     {}\n", data.summary.edges));
    report.push_str(&format!("Tree edges:      {}\n", data.summary.tree_edges));
    report.push_str(&format!("Components:      {}\n", data.summary.components));
    report.push_str(&format!("Tree weight:     {:.6}\n", data.summary.tree_weight));
    report.push('\n');

    report.push_str(RULE);
    report.push_str("SIGNAL CLASSES\n");
    report.push_str(RULE);
    report.push('\n');
    report.push_str(&format!(
        "  [STRONG] {}  (above ceiling + {})\n",
        data.class_counts.strong, margin
    ));
    report.push_str(&format!(
        "  [MEDIUM] {}  (above ceiling, up to ceiling + {})\n",
        data.class_counts.medium, margin
    ));
    report.push_str(&format!(
        "  [WEAK]   {}  (at or below ceiling)\n",
        data.class_counts.weak
    ));
    report.push('\n');

    if !data.coverage.is_empty() {
        report.push_str(RULE);
        report.push_str("TOWER COVERAGE\n");
        report.push_str(RULE);
        report.push('\n');

        for tower in &data.coverage {
            report.push_str(&format!(
                "{:<12} ceiling {:>5} dBm  assigned {:>5}  mean {}  max {}  [S {} / M {} / W {}]\n",
                tower.label,
                tower.rated_ceiling,
                tower.assigned,
                format_optional_distance(tower.mean_distance),
                format_optional_distance(tower.max_distance),
                tower.classes.strong,
                tower.classes.medium,
                tower.classes.weak
            ));
        }
        report.push('\n');
    }

    report.push_str(RULE);
    report.push_str("SPANNING TREE\n");
    report.push_str(RULE);
    report.push('\n');
    if data.tree_edges.is_empty() {
        report.push_str("  (no edges)\n");
    }
    for edge in &data.tree_edges {
        report.push_str(&format!(
            "  {} ── {}  {:.6}\n",
            edge.source, edge.target, edge.weight
        ));
    }
    report.push('\n');

    if !data.measurements.is_empty() {
        report.push_str(RULE);
        report.push_str("MEASUREMENTS\n");
        report.push_str(RULE);
        report.push('\n');

        for m in &data.measurements {
            report.push_str(&format!(
                "{:<14} ({:.5}, {:.5})  {:>7} dBm -> {:<12} ceiling {:>5}  dist {:.6}  [{}]\n",
                m.label,
                m.longitude,
                m.latitude,
                m.signal_strength,
                m.tower,
                m.rated_ceiling,
                m.distance,
                m.class.to_uppercase()
            ));
        }
        report.push('\n');
    }

    report.push_str(RULE);
    report.push_str("                          End of Report\n");
    report.push_str(RULE);
    report.push_str("\nGenerated by Towernet - nearest-tower signal network analysis\n");
    report.push_str("Distances are planar over raw longitude/latitude degrees.\n\n");

    report
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Towernet",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": format_iso8601_timestamp(data.generated_at),
                "format": "json",
                "distance": "planar"
            },
            "run": {
                "id": data.run_id,
                "provider": data.provider,
                "strategy": data.strategy,
                "thresholds": data.thresholds
            },
            "summary": {
                "network": data.summary,
                "classes": data.class_counts
            },
            "coverage": data.coverage,
            "spanning_tree": {
                "total_weight": data.summary.tree_weight,
                "edges": data.tree_edges
            },
            "measurements": data.measurements
        }
    });

    serde_json::to_string_pretty(&json_report)
}

/// One row per measurement, for spreadsheets and plotting tools.
pub fn generate_csv_report(data: &ReportData) -> String {
    let mut report = String::from(
        "measurement,longitude,latitude,signal_strength,tower,rated_ceiling,distance,class\n",
    );

    for m in &data.measurements {
        report.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            m.label,
            m.longitude,
            m.latitude,
            m.signal_strength,
            m.tower,
            m.rated_ceiling,
            m.distance,
            m.class
        ));
    }

    report
}

pub fn generate_markdown_report(data: &ReportData) -> String {
    let mut report = String::new();

    report.push_str(&format!("# Towernet Report: {}\n\n", data.provider));
    report.push_str(&format!("- **Run ID:** `{}`\n", data.run_id));
    report.push_str(&format!("- **Generated:** {}\n", format_timestamp(data.generated_at)));
    report.push_str(&format!("- **Search:** {}\n", data.strategy));
    report.push_str(&format!(
        "- **Medium margin:** {} dBm\n\n",
        data.thresholds.medium_margin
    ));

    report.push_str("## Network\n\n");
    report.push_str("| Towers | Measurements | Edges | Tree edges | Components | Tree weight |\n");
    report.push_str("|---|---|---|---|---|---|\n");
    report.push_str(&format!(
        "| {} | {} | {} | {} | {} | {:.6} |\n\n",
        data.summary.towers,
        data.summary.measurements,
        data.summary.edges,
        data.summary.tree_edges,
        data.summary.components,
        data.summary.tree_weight
    ));

    report.push_str("## Signal classes\n\n");
    report.push_str("| Strong | Medium | Weak |\n|---|---|---|\n");
    report.push_str(&format!(
        "| {} | {} | {} |\n\n",
        data.class_counts.strong, data.class_counts.medium, data.class_counts.weak
    ));

    if !data.coverage.is_empty() {
        report.push_str("## Tower coverage\n\n");
        report.push_str("| Tower | Ceiling (dBm) | Assigned | Mean distance | Max distance | Strong | Medium | Weak |\n");
        report.push_str("|---|---|---|---|---|---|---|---|\n");
        for tower in &data.coverage {
            report.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
                tower.label,
                tower.rated_ceiling,
                tower.assigned,
                format_optional_distance(tower.mean_distance),
                format_optional_distance(tower.max_distance),
                tower.classes.strong,
                tower.classes.medium,
                tower.classes.weak
            ));
        }
        report.push('\n');
    }

    report.push_str("## Spanning tree\n\n");
    report.push_str(&format!(
        "Total weight: {:.6}\n\n",
        data.summary.tree_weight
    ));
    if !data.tree_edges.is_empty() {
        report.push_str("| Source | Target | Weight |\n|---|---|---|\n");
        for edge in &data.tree_edges {
            report.push_str(&format!(
                "| {} | {} | {:.6} |\n",
                edge.source, edge.target, edge.weight
            ));
        }
        report.push('\n');
    }

    if !data.measurements.is_empty() {
        report.push_str("## Measurements\n\n");
        report.push_str("| Measurement | Longitude | Latitude | Signal (dBm) | Tower | Ceiling (dBm) | Distance | Class |\n");
        report.push_str("|---|---|---|---|---|---|---|---|\n");
        for m in &data.measurements {
            report.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {:.6} | {} |\n",
                m.label,
                m.longitude,
                m.latitude,
                m.signal_strength,
                m.tower,
                m.rated_ceiling,
                m.distance,
                m.class
            ));
        }
        report.push('\n');
    }

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn format_optional_distance(distance: Option<f64>) -> String {
    distance
        .map(|d| format!("{:.6}", d))
        .unwrap_or_else(|| "-".to_string())
}

fn format_timestamp(timestamp: i64) -> String {
    use chrono::{DateTime, Utc};
    let datetime = DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or_else(Utc::now);
    datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn format_iso8601_timestamp(timestamp: i64) -> String {
    use chrono::{DateTime, Utc};
    let datetime = DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or_else(Utc::now);
    datetime.to_rfc3339()
}
