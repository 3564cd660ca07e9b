//! Configuration file support for sheetchat
//!
//! Config is loaded from `~/.sheetchat/config.toml` (or
//! `$SHEETCHAT_HOME/config.toml`). Environment variables override config file
//! settings.

use crate::storage::sheetchat_dir;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global config instance (loaded once on first access)
pub fn config() -> &'static Config {
    CONFIG.get_or_init(Config::load)
}

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Display/UI configuration
    pub display: DisplayConfig,

    /// Replay pacing configuration
    pub replay: ReplayConfig,
}

/// Display/UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Maximum rows rendered per table before eliding (default: 20)
    pub max_table_rows: usize,
    /// Width of chart bars in columns (default: 40)
    pub chart_width: usize,
    /// Bytes of raw payload shown in the unknown-block placeholder (default: 160)
    pub unknown_preview_bytes: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_table_rows: 20,
            chart_width: 40,
            unknown_preview_bytes: 160,
        }
    }
}

/// Replay pacing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Characters per chunk when replaying a raw document (default: 24)
    pub chunk_chars: usize,
    /// Delay between chunks in milliseconds (default: 30)
    pub chunk_delay_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            chunk_chars: 24,
            chunk_delay_ms: 30,
        }
    }
}

impl Config {
    /// Load config from disk, falling back to defaults on any problem
    fn load() -> Self {
        let mut config = Self::read_file().unwrap_or_default();
        config.apply_env_overrides();
        config
    }

    fn read_file() -> Option<Self> {
        let path = sheetchat_dir().ok()?.join("config.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                crate::logging::warn(&format!("ignoring malformed config.toml: {}", e));
                None
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SHEETCHAT_CHUNK_DELAY_MS") {
            if let Ok(ms) = v.parse() {
                self.replay.chunk_delay_ms = ms;
            }
        }
        if let Ok(v) = std::env::var("SHEETCHAT_CHART_WIDTH") {
            if let Ok(w) = v.parse() {
                self.display.chart_width = w;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.display.max_table_rows, 20);
        assert_eq!(config.replay.chunk_chars, 24);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[display]\nchart_width = 12\n").unwrap();
        assert_eq!(config.display.chart_width, 12);
        assert_eq!(config.display.max_table_rows, 20);
        assert_eq!(config.replay.chunk_delay_ms, 30);
    }
}
