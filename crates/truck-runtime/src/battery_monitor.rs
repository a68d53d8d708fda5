//! [`BatteryMonitor`] – logs the battery voltage on a timer.
//!
//! Only reports.  Nothing here stops the truck on a low battery.

use std::time::Duration;

use tracing::info;
use truck_hal::Battery;
use truck_types::TruckError;

use crate::scheduler::PeriodicTask;

pub struct BatteryMonitor {
    battery: Box<dyn Battery>,
    interval: Duration,
}

impl BatteryMonitor {
    pub fn new(battery: Box<dyn Battery>, interval: Duration) -> Self {
        Self { battery, interval }
    }

    /// Read the present voltage, in millivolts, and log it.
    pub fn read(&mut self) -> Result<u32, TruckError> {
        let millivolts = self.battery.voltage_millivolts()?;
        info!(millivolts, "battery voltage");
        Ok(millivolts)
    }
}

impl PeriodicTask for BatteryMonitor {
    fn name(&self) -> &str {
        "battery_monitor"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn on_tick(&mut self) -> Result<(), TruckError> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use truck_hal::sim::SimBattery;

    struct DeadBattery;

    impl Battery for DeadBattery {
        fn voltage_millivolts(&mut self) -> Result<u32, TruckError> {
            Err(TruckError::hardware("battery", "sysfs node missing"))
        }
    }

    #[test]
    fn reports_voltage() {
        let mut monitor = BatteryMonitor::new(Box::new(SimBattery::new(7_450)), Duration::from_secs(1));
        assert_eq!(monitor.read(), Ok(7_450));
        assert!(monitor.on_tick().is_ok());
    }

    #[test]
    fn read_fault_propagates() {
        let mut monitor = BatteryMonitor::new(Box::new(DeadBattery), Duration::from_secs(1));
        assert!(matches!(
            monitor.on_tick(),
            Err(TruckError::HardwareFault { .. })
        ));
    }
}
