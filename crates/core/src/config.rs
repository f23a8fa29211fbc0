use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StripError;
use crate::protocol::packet::{check_led_capacity, MAX_LEDS};

pub const DEFAULT_PORT: u16 = 4003;
pub const DEFAULT_NUM_LEDS: usize = 10;
pub const DEFAULT_NUM_SECTIONS: usize = 5;
pub const DEFAULT_UPDATE_INTERVAL: f64 = 0.05;

/// Settings of one strip as accepted from the host platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripConfig {
    pub host: String,
    pub name: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_num_leds")]
    pub num_leds: usize,
    #[serde(default = "default_num_sections")]
    pub num_sections: usize,
    /// Seconds between frames
    #[serde(default = "default_update_interval")]
    pub update_interval: f64,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_num_leds() -> usize {
    DEFAULT_NUM_LEDS
}

fn default_num_sections() -> usize {
    DEFAULT_NUM_SECTIONS
}

fn default_update_interval() -> f64 {
    DEFAULT_UPDATE_INTERVAL
}

impl StripConfig {
    pub fn new(host: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            name: name.into(),
            port: DEFAULT_PORT,
            num_leds: DEFAULT_NUM_LEDS,
            num_sections: DEFAULT_NUM_SECTIONS,
            update_interval: DEFAULT_UPDATE_INTERVAL,
        }
    }

    pub fn validate(&self) -> Result<(), StripError> {
        ConfigManager::validate_strip(self)
    }

    /// Only meaningful once validated
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs_f64(self.update_interval)
    }
}

/// Bounds and defaults for every strip setting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSchema {
    pub port: ConfigOption<u16>,
    pub num_leds: ConfigOption<usize>,
    pub num_sections: ConfigOption<usize>,
    pub update_interval: ConfigOption<f64>,
}

/// Configuration option with its valid range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigOption<T> {
    pub default: T,
    pub valid_range: Option<(T, T)>,
    pub description: String,
}

/// Strip configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    pub strips: Vec<StripConfig>,
}

/// Loads and validates strip configuration.
/// Configuration is read from strips.json in the working directory by default.
pub struct ConfigManager {
    config_path: PathBuf,
    strips: Vec<StripConfig>,
}

impl ConfigManager {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        let config_path = config_path.unwrap_or_else(|| PathBuf::from("strips.json"));

        Self {
            config_path,
            strips: Vec::new(),
        }
    }

    /// Read, validate and keep every strip from the config file.
    /// Nothing is kept if any strip is invalid.
    pub fn load(&mut self) -> Result<Vec<StripConfig>, StripError> {
        let content = fs::read_to_string(&self.config_path)?;
        let config_file: ConfigFile = serde_json::from_str(&content)?;

        if config_file.version != env!("CARGO_PKG_VERSION") {
            log::warn!(
                "Config file version {} doesn't match application version {}",
                config_file.version,
                env!("CARGO_PKG_VERSION")
            );
        }

        let mut hosts = HashSet::new();
        for strip in &config_file.strips {
            strip.validate()?;
            if !hosts.insert(strip.host.as_str()) {
                return Err(StripError::DuplicateHost(strip.host.clone()));
            }
        }

        self.strips = config_file.strips;
        Ok(self.strips.clone())
    }

    pub fn strips(&self) -> &[StripConfig] {
        &self.strips
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn schema() -> ConfigSchema {
        ConfigSchema {
            port: ConfigOption {
                default: DEFAULT_PORT,
                valid_range: Some((1, u16::MAX)),
                description: "UDP port the strip listens on".to_string(),
            },
            num_leds: ConfigOption {
                default: DEFAULT_NUM_LEDS,
                valid_range: Some((1, MAX_LEDS)),
                description: "Number of LEDs addressed per frame".to_string(),
            },
            num_sections: ConfigOption {
                default: DEFAULT_NUM_SECTIONS,
                valid_range: Some((2, 10)),
                description: "Number of independently coloured sections".to_string(),
            },
            update_interval: ConfigOption {
                default: DEFAULT_UPDATE_INTERVAL,
                valid_range: Some((0.01, 1.0)),
                description: "Seconds between animation frames".to_string(),
            },
        }
    }

    /// Check a strip against the schema. Bound violations are collected
    /// into one [`StripError::Configuration`]; an LED count the protocol
    /// cannot carry is reported as [`StripError::ProtocolConstraint`].
    pub fn validate_strip(strip: &StripConfig) -> Result<(), StripError> {
        let mut errors = Vec::new();
        let schema = Self::schema();

        if strip.host.trim().is_empty() {
            errors.push("host must not be empty".to_string());
        }
        if strip.name.trim().is_empty() {
            errors.push("name must not be empty".to_string());
        }

        if let Some((min, max)) = schema.port.valid_range {
            if strip.port < min || strip.port > max {
                errors.push(format!("port must be between {} and {}", min, max));
            }
        }

        if let Some((min, _)) = schema.num_leds.valid_range {
            if strip.num_leds < min {
                errors.push(format!("num_leds must be at least {}", min));
            }
        }

        if let Some((min, max)) = schema.num_sections.valid_range {
            if strip.num_sections < min || strip.num_sections > max {
                errors.push(format!("num_sections must be between {} and {}", min, max));
            }
        }

        if let Some((min, max)) = schema.update_interval.valid_range {
            if !(min..=max).contains(&strip.update_interval) {
                errors.push(format!(
                    "update_interval must be between {} and {} seconds",
                    min, max
                ));
            }
        }

        if !errors.is_empty() {
            return Err(StripError::Configuration(errors));
        }

        check_led_capacity(strip.num_leds)
    }
}
