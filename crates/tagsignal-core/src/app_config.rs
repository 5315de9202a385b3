use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level settings read from the environment.
///
/// Threshold overrides are kept as `Option`s here and folded into a
/// [`crate::SignalConfig`] by [`crate::resolve_signal_config`].
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub signal_config_path: Option<PathBuf>,
    /// Size of the global worker pool. `None` keeps the rayon default.
    pub worker_threads: Option<usize>,
    pub min_item_count: Option<usize>,
    pub tag_min_confidence: Option<f64>,
    pub market_min_confidence: Option<f64>,
}
