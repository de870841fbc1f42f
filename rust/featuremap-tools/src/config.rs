use std::env;
use std::path::PathBuf;

pub const DEFAULT_FEATURES_DIR: &str = "./features";

#[derive(Clone, Debug)]
pub struct Config {
    /// Where feature files are read from and written to when no directory is given.
    pub features_dir: PathBuf,
    /// Emit logs as JSON lines instead of plain text.
    pub log_json: bool,
}

impl Config {
    /// Variables:
    /// - FEATUREMAP_FEATURES_DIR: feature directory (default ./features)
    /// - FEATUREMAP_LOG_JSON: "1"/"true" for JSON logs (default off)
    pub fn from_env() -> anyhow::Result<Self> {
        let features_dir = env::var("FEATUREMAP_FEATURES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_FEATURES_DIR));
        let log_json = env::var("FEATUREMAP_LOG_JSON")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self { features_dir, log_json })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { features_dir: PathBuf::from(DEFAULT_FEATURES_DIR), log_json: false }
    }
}
