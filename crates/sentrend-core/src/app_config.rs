use std::path::PathBuf;

/// Run-cycle configuration for the engine and its adapters.
///
/// Built once at startup (see [`crate::config::load_engine_config`]) and
/// passed explicitly to every stage; nothing in the engine reads globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Records whose normalized text is shorter than this are rejected.
    pub min_text_len: usize,
    /// Trailing rolling-mean window, in observed days.
    pub trend_window: usize,
    pub log_level: String,
    pub queries_path: PathBuf,
    pub output_dir: PathBuf,
    /// Rows per (query, category) shown in the report's sample section.
    pub sample_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_text_len: 10,
            trend_window: 7,
            log_level: "info".to_string(),
            queries_path: PathBuf::from("./config/queries.yaml"),
            output_dir: PathBuf::from("."),
            sample_size: 3,
        }
    }
}
