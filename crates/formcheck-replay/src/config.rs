//! Replay configuration.

use formcheck_core::AnalyzerConfig;

/// Replay binary configuration.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Exercise name, resolved through the analyzer registry
    pub exercise: String,
    /// Install the Prometheus recorder and log its exposition at the end
    pub metrics_enabled: bool,
    /// Emit JSON log lines instead of ANSI text
    pub log_json: bool,
    pub analyzer: AnalyzerConfig,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            exercise: "squat".to_string(),
            metrics_enabled: false,
            log_json: false,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl ReplayConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            exercise: std::env::var("FORMCHECK_EXERCISE").unwrap_or_else(|_| "squat".to_string()),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            log_json: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
            analyzer: AnalyzerConfig::from_env(),
        }
    }
}
