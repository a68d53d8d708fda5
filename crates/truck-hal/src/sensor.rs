//! Sensor traits: the infrared distance sensor and the battery.

use truck_types::TruckError;

/// A sensor that reports the distance to the nearest obstacle.
pub trait DistanceSensor: Send {
    /// Stable identifier for this sensor, e.g. `"ir"`.
    fn id(&self) -> &str;

    /// Fetch one distance sample.
    ///
    /// Units are whatever the device reports (roughly centimetres for the
    /// EV3 IR sensor in proximity mode).
    ///
    /// # Errors
    ///
    /// Returns [`TruckError::HardwareFault`] if the sample cannot be read.
    fn fetch_sample(&mut self) -> Result<f32, TruckError>;
}

/// The power supply of the truck.
pub trait Battery: Send {
    /// Present battery voltage in millivolts.
    fn voltage_millivolts(&mut self) -> Result<u32, TruckError>;
}
