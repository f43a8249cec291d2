// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    classify_reading, expand_path, load_measurements, load_towers, render_report, run_analyze,
    run_analyze_with_progress, AnalyzeRequest,
};
