//! Configuration file – reads `~/.ev3-truck/config.toml`.
//!
//! The file is optional.  Every field falls back to the stock tuning, and
//! `TRUCK_*` environment variables override individual fields on top of
//! whatever the file says.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use truck_hal::sim::{DEFAULT_SIM_MILLIVOLTS, SimTruck};
use truck_runtime::TruckConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings for the simulated devices the truck runs on when no brick is
/// attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Distances replayed by the IR sensor.  `None` uses an obstacle that
    /// approaches to 0 and recedes again.
    pub distance_samples: Option<Vec<f32>>,
    /// Voltage the battery reports, in millivolts.
    pub battery_millivolts: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            distance_samples: None,
            battery_millivolts: DEFAULT_SIM_MILLIVOLTS,
        }
    }
}

impl SimConfig {
    /// A [`SimTruck`] builder configured from these settings.
    pub fn builder(&self) -> SimTruck {
        let builder = SimTruck::new().with_battery_millivolts(self.battery_millivolts);
        match &self.distance_samples {
            Some(samples) => builder.with_distance_samples(samples.clone()),
            None => builder,
        }
    }
}

/// Contents of `config.toml`: a `[truck]` table and a `[sim]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub truck: TruckConfig,
    pub sim: SimConfig,
}

impl Config {
    /// Reject settings the runtime cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.truck.worker_threads == 0 {
            return Err(ConfigError::Invalid(
                "truck.worker_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Return the config path: `$TRUCK_CONFIG` when set, otherwise
/// `~/.ev3-truck/config.toml`.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("TRUCK_CONFIG") {
        return PathBuf::from(path);
    }
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".ev3-truck").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, ConfigError> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(toml::from_str(&raw)?))
}

/// Apply `TRUCK_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `TRUCK_WORKER_THREADS` | `truck.worker_threads` |
/// | `TRUCK_DISTANCE_THRESHOLD` | `truck.distance_threshold` |
/// | `TRUCK_DRIVE_SPEED` | `truck.drive_speed` |
/// | `TRUCK_STEERING_INCREMENT` | `truck.steering_increment` |
///
/// Values that do not parse are ignored.
pub fn apply_env_overrides(cfg: &mut Config) {
    apply_overrides(cfg, |key| std::env::var(key).ok());
}

fn apply_overrides(cfg: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    let truck = &mut cfg.truck;
    if let Some(v) = lookup("TRUCK_WORKER_THREADS")
        && let Ok(n) = v.parse()
    {
        truck.worker_threads = n;
    }
    if let Some(v) = lookup("TRUCK_DISTANCE_THRESHOLD")
        && let Ok(n) = v.parse()
    {
        truck.distance_threshold = n;
    }
    if let Some(v) = lookup("TRUCK_DRIVE_SPEED")
        && let Ok(n) = v.parse()
    {
        truck.drive_speed = n;
    }
    if let Some(v) = lookup("TRUCK_STEERING_INCREMENT")
        && let Ok(n) = v.parse()
    {
        truck.steering_increment = n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use truck_runtime::FaultPolicy;

    fn overrides(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut cfg = Config::default();
        apply_overrides(&mut cfg, |key| vars.get(key).cloned());
        cfg
    }

    #[test]
    fn config_path_points_to_truck_dir() {
        let p = config_path_for_home("/home/testuser");
        assert_eq!(p, PathBuf::from("/home/testuser/.ev3-truck/config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(load_from(&path).expect("no error").is_none());
    }

    #[test]
    fn empty_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "").expect("write");

        let cfg = load_from(&path).expect("load ok").expect("some");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.truck.distance_threshold, 10);
        assert_eq!(cfg.sim.battery_millivolts, DEFAULT_SIM_MILLIVOLTS);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[truck]
drive_speed = 300
distance_interval_ms = 50
fault_policy = "stop"

[sim]
distance_samples = [30.0, 12.5, 4.0]
"#,
        )
        .expect("write");

        let cfg = load_from(&path).expect("load ok").expect("some");
        assert_eq!(cfg.truck.drive_speed, 300);
        assert_eq!(cfg.truck.distance_interval_ms, 50);
        assert_eq!(cfg.truck.fault_policy, FaultPolicy::Stop);
        assert_eq!(cfg.truck.distance_threshold, 10);
        assert_eq!(cfg.sim.distance_samples, Some(vec![30.0, 12.5, 4.0]));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[truck]\ndrive_speed = \"fast\"\n").expect("write");

        assert!(matches!(load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn env_overrides_apply() {
        let cfg = overrides(&[
            ("TRUCK_WORKER_THREADS", "2"),
            ("TRUCK_DISTANCE_THRESHOLD", "25"),
            ("TRUCK_DRIVE_SPEED", "700"),
            ("TRUCK_STEERING_INCREMENT", "-10"),
        ]);
        assert_eq!(cfg.truck.worker_threads, 2);
        assert_eq!(cfg.truck.distance_threshold, 25);
        assert_eq!(cfg.truck.drive_speed, 700);
        assert_eq!(cfg.truck.steering_increment, -10);
    }

    #[test]
    fn env_overrides_ignore_unparseable_values() {
        let cfg = overrides(&[("TRUCK_DRIVE_SPEED", "flat-out")]);
        assert_eq!(cfg.truck.drive_speed, 500);
    }

    #[test]
    fn zero_workers_is_invalid() {
        let cfg = overrides(&[("TRUCK_WORKER_THREADS", "0")]);
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
        assert!(Config::default().validate().is_ok());
    }
}
