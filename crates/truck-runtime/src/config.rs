//! [`TruckConfig`] – tuning knobs for the control loop.
//!
//! Every field defaults to the value the truck was originally tuned with, so
//! an empty TOML table (or no file at all) reproduces the stock behavior.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::scheduler::FaultPolicy;

/// Configuration bundle for the four truck tasks and their worker pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TruckConfig {
    /// Number of Tokio worker threads shared by every task.
    pub worker_threads: usize,
    /// Period of the IR distance sampler, in milliseconds.
    pub distance_interval_ms: u64,
    /// Period of the steering actuator, in milliseconds.
    pub direction_interval_ms: u64,
    /// Period of the battery monitor, in milliseconds.
    pub battery_interval_ms: u64,
    /// Distances at or above this value keep the truck moving.
    pub distance_threshold: i32,
    /// Regulated speed of both drive motors while moving.
    pub drive_speed: i32,
    /// Degrees the steering motor turns on every tick.
    pub steering_increment: i32,
    /// What a periodic task does when one of its ticks fails.
    pub fault_policy: FaultPolicy,
}

impl TruckConfig {
    pub fn distance_interval(&self) -> Duration {
        Duration::from_millis(self.distance_interval_ms)
    }

    pub fn direction_interval(&self) -> Duration {
        Duration::from_millis(self.direction_interval_ms)
    }

    pub fn battery_interval(&self) -> Duration {
        Duration::from_millis(self.battery_interval_ms)
    }
}

impl Default for TruckConfig {
    fn default() -> Self {
        Self {
            worker_threads: 1,
            distance_interval_ms: 100,
            direction_interval_ms: 1_000,
            battery_interval_ms: 1_000,
            distance_threshold: 10,
            drive_speed: 500,
            steering_increment: 20,
            fault_policy: FaultPolicy::SkipTick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_tuning() {
        let cfg = TruckConfig::default();
        assert_eq!(cfg.worker_threads, 1);
        assert_eq!(cfg.distance_interval(), Duration::from_millis(100));
        assert_eq!(cfg.direction_interval(), Duration::from_secs(1));
        assert_eq!(cfg.battery_interval(), Duration::from_secs(1));
        assert_eq!(cfg.distance_threshold, 10);
        assert_eq!(cfg.drive_speed, 500);
        assert_eq!(cfg.steering_increment, 20);
        assert_eq!(cfg.fault_policy, FaultPolicy::SkipTick);
    }
}
