use crate::error::Result;
use crate::types::RateTable;
use crate::utils::paths::{self, DEFAULT_LEDGER};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// First day of the week: a weekday name or 0..6 with 0 = Sunday
    #[serde(default = "default_week_start")]
    pub week_start: String,
    /// Hourly rate per project
    #[serde(default)]
    pub rates: RateTable,
    #[serde(default = "default_ledger")]
    pub ledger: PathBuf,
}

fn default_week_start() -> String {
    "Sunday".to_string()
}

fn default_ledger() -> PathBuf {
    PathBuf::from(DEFAULT_LEDGER)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            week_start: default_week_start(),
            rates: RateTable::new(),
            ledger: default_ledger(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file at the specified path
    /// Falls back to the default config if the file doesn't exist
    pub fn load_from_file(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let config = config::Config::builder()
            .add_source(config::File::from(config_path))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Load from `path`, or the per-user config file, then merge the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path.map(Path::to_path_buf).or_else(paths::config_file) {
            Some(path) => Self::load_from_file(&path)?,
            None => Config::default(),
        };
        config.merge_from_env();
        Ok(config)
    }

    /// Merge configuration from environment variables
    /// TIMETRACK_FILE: ledger path
    /// TIMETRACK_WEEK_START: first day of the week
    fn merge_from_env(&mut self) {
        self.merge_from_env_vars("TIMETRACK_FILE", "TIMETRACK_WEEK_START");
    }

    fn merge_from_env_vars(&mut self, file_var: &str, week_var: &str) {
        if let Some(file) = std::env::var_os(file_var).filter(|v| !v.is_empty()) {
            self.ledger = PathBuf::from(file);
        }
        if let Ok(week_start) = std::env::var(week_var) {
            let week_start = week_start.trim();
            if !week_start.is_empty() {
                self.week_start = week_start.to_string();
            }
        }
    }

    /// Ledger path with `~` expanded
    pub fn ledger_path(&self) -> PathBuf {
        paths::expand_home(&self.ledger)
    }
}
