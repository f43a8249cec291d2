pub mod analysis;
pub mod classify;
pub mod error;
pub mod geo;
pub mod model;
pub mod mst;
pub mod nearest;
pub mod network;
pub mod report;
pub mod spatial;

pub use analysis::{AnalysisOptions, NetworkAnalysis, run_analysis};
pub use classify::{ClassifierThresholds, DEFAULT_MEDIUM_MARGIN, SignalClass, SignalClassifier};
pub use error::{NetworkError, Result};
pub use geo::{GeoPoint, distance};
pub use model::{Measurement, ReferenceNode, parse_rated_ceiling};
pub use mst::{SpanningTree, SpanningTreeExtractor};
pub use nearest::{Assignment, SearchStrategy, assign};
pub use network::{Network, NetworkBuilder, NetworkEdge, NetworkNode};

const BANNER: &str = r#"
  _                                     _
 | |_ _____ __ _____ _ _ _ _  ___| |_
 |  _/ _ \ V  V / -_) '_| ' \/ -_)  _|
  \__\___/\_/\_/\___|_| |_||_\___|\__|
"#;

pub fn print_banner() {
    println!("{}", BANNER);
    println!("  nearest-tower signal network analysis v{}\n", env!("CARGO_PKG_VERSION"));
}
