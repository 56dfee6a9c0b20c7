//! Configuration management for the latency core.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Validation on load with automatic defaults
//!
//! # Example
//!
//! ```no_run
//! use latency_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/latency.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Module color: {}", config.settings().derivation.module_color);
//!
//! config.settings_mut().import.default_fps = 120.0;
//! config.update_section(ConfigSection::Import).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, DerivationSettings, ImportSettings, LoggingSettings, Settings, StorageSettings,
};
