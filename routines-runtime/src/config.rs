use std::path::Path;

use chrono::NaiveTime;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::error::RoutineError;
use crate::interval::IntervalSpec;

/// Load config from a specific TOML file, with `ROUTINE_*` environment
/// variable overrides.
pub fn load_toml_config<P: AsRef<Path>>(path: P) -> Result<Config, RoutineError> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
        .add_source(Environment::with_prefix("ROUTINE").separator("_"))
        .build()?;
    Ok(config)
}

/// Load config from a specific YAML file, with `ROUTINE_*` environment
/// variable overrides.
pub fn load_yaml_config<P: AsRef<Path>>(path: P) -> Result<Config, RoutineError> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Yaml))
        .add_source(Environment::with_prefix("ROUTINE").separator("_"))
        .build()?;
    Ok(config)
}

/// Per-routine options as they appear in application config.
///
/// `seconds`/`minutes`/`hours` are summed into a duration-mode interval;
/// `time` ("HH:MM" or "HH:MM:SS") selects the daily wall-clock mode instead.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RoutineConfig {
    #[serde(default)]
    pub seconds: u64,
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub hours: u64,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub wait_first: bool,
    #[serde(default)]
    pub iterations: Option<u64>,
}

impl RoutineConfig {
    /// Deserialize one routine's options from a config subtree, e.g.
    /// `"announce"` for a `[announce]` TOML table.
    pub fn from_config(config: &Config, key: &str) -> Result<Self, RoutineError> {
        Ok(config.get(key)?)
    }

    /// Convert to a validated interval specification.
    pub fn interval_spec(&self) -> Result<IntervalSpec, RoutineError> {
        let time = self.time.as_deref().map(parse_time).transpose()?;
        Ok(IntervalSpec {
            seconds: self.seconds,
            minutes: self.minutes,
            hours: self.hours,
            time,
        })
    }
}

fn parse_time(s: &str) -> Result<NaiveTime, RoutineError> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| RoutineError::Configuration(format!("invalid time of day: {s}")))
}
