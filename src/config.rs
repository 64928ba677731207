use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use strum_macros::Display;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level for the whole app; `RUST_LOG` overrides it when set.
    pub level: LogLevel,
    /// Per-module overrides, e.g. `{"hacky_news_tui::api": Debug}`.
    pub module_levels: HashMap<String, LogLevel>,
    /// Directory for the rolling log file. Defaults to "logs".
    pub log_directory: Option<String>,
    /// Emit timing spans for fetches and frame draws.
    pub enable_performance_metrics: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            module_levels: HashMap::new(),
            log_directory: None,
            enable_performance_metrics: false,
        }
    }
}

impl LoggingConfig {
    /// `EnvFilter` directive string built from the configured levels.
    pub fn filter_directives(&self) -> String {
        let mut filter_str = self.level.to_string();
        let mut modules: Vec<_> = self.module_levels.iter().collect();
        modules.sort_by(|a, b| a.0.cmp(b.0));
        for (module, level) in modules {
            filter_str.push_str(&format!(",{}={}", module, level));
        }
        filter_str
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Root URL of the news backend, e.g. "http://localhost:5001".
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional per-request timeout. No timeout when unset.
    pub request_timeout_secs: Option<u64>,
    /// Quiet period before autocomplete suggestions are fetched.
    #[serde(default = "default_autocomplete_debounce_ms")]
    pub autocomplete_debounce_ms: u64,
    /// How long the update trigger stays disabled after it completes.
    #[serde(default = "default_update_reset_delay_ms")]
    pub update_reset_delay_ms: u64,
    pub logging: LoggingConfig,
}

fn default_base_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_autocomplete_debounce_ms() -> u64 {
    300
}

fn default_update_reset_delay_ms() -> u64 {
    2_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
            autocomplete_debounce_ms: default_autocomplete_debounce_ms(),
            update_reset_delay_ms: default_update_reset_delay_ms(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        // Look for config.ron in current directory or next to executable
        let mut candidates = vec![PathBuf::from("config.ron")];

        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join("config.ron"));
        }

        for path in candidates {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match Self::from_ron(&content) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse config at {}: {}", path.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Self::default()
    }

    pub fn from_ron(content: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str::<AppConfig>(content)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn autocomplete_debounce(&self) -> Duration {
        Duration::from_millis(self.autocomplete_debounce_ms)
    }

    pub fn update_reset_delay(&self) -> Duration {
        Duration::from_millis(self.update_reset_delay_ms)
    }
}
