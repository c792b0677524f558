//! Provides a ConfigManager to read and refresh config from files.
//!

use color_eyre::Result;
use config;
use log::*;
use notify::{RecommendedWatcher, Watcher};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};
use tokio::sync::mpsc::UnboundedSender;

use crate::event::{AppEvent, Event};

pub const DEFAULT_FILE: &str = "coremon.toml";

pub const MIN_INTERVAL_SECS: f64 = 0.1;
pub const MAX_INTERVAL_SECS: f64 = 60.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoremonConfig {
    /// Samples retained per metric. Fixed for the life of a session.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Seconds between samples, clamped to 0.1-60.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: f64,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_capacity() -> usize {
    60
}

fn default_interval_secs() -> f64 {
    1.0
}

fn default_theme() -> String {
    "dark".to_string()
}

impl Default for CoremonConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            interval_secs: default_interval_secs(),
            theme: default_theme(),
        }
    }
}

impl CoremonConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_secs.clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS))
    }
}

/// Load the config from a file plus `COREMON_` environment overrides.
/// A missing file yields the defaults.
pub fn load(file_path: &PathBuf) -> Result<CoremonConfig> {
    let raw = config::Config::builder()
        .add_source(config::File::from(file_path.clone()).required(false))
        .add_source(config::Environment::with_prefix("COREMON"))
        .build()?;
    Ok(raw.try_deserialize()?)
}

#[derive(Debug)]
pub struct ConfigManager {
    pub file_path: PathBuf,
    config: CoremonConfig,
    _watcher: Option<RecommendedWatcher>,
}

impl ConfigManager {
    pub fn new(file_path: PathBuf, sender: UnboundedSender<Event>) -> Result<ConfigManager> {
        let watcher = if file_path.exists() {
            let captured = sender.clone();
            let mut watcher = notify::recommended_watcher(move |_| {
                let _ = captured.send(Event::App(AppEvent::Reload));
            })?;
            info!(target: "Config", "Watching file {:?}", file_path);
            watcher.watch(&file_path, notify::RecursiveMode::NonRecursive)?;
            Some(watcher)
        } else {
            info!(target: "Config", "No config file at {:?}, using defaults", file_path);
            None
        };
        Ok(ConfigManager {
            file_path: file_path.clone(),
            config: load(&file_path)?,
            _watcher: watcher,
        })
    }

    pub fn current(&self) -> CoremonConfig {
        self.config.clone()
    }

    pub fn reload(&mut self) -> Result<CoremonConfig> {
        self.config = load(&self.file_path)?;
        Ok(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_chosen_variant() {
        let config = CoremonConfig::default();
        assert_eq!(config.capacity, 60);
        assert_eq!(config.interval(), Duration::from_secs(1));
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn interval_is_clamped_to_supported_range() {
        let mut config = CoremonConfig {
            interval_secs: 0.01,
            ..Default::default()
        };
        assert_eq!(config.interval(), Duration::from_secs_f64(0.1));
        config.interval_secs = 3600.0;
        assert_eq!(config.interval(), Duration::from_secs(60));
        config.interval_secs = 2.5;
        assert_eq!(config.interval(), Duration::from_secs_f64(2.5));
    }
}
