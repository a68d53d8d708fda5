//! [`TruckRig`] – the full set of device handles fitted to the truck.

use crate::motor::RegulatedMotor;
use crate::sensor::{Battery, DistanceSensor};

/// Every device on the truck, each owned exactly once.
///
/// The bootstrap code splits the rig apart and moves each handle into the
/// single task that drives it.
pub struct TruckRig {
    /// Left drive motor (port D on the brick).
    pub left_engine: Box<dyn RegulatedMotor>,
    /// Right drive motor (port C).
    pub right_engine: Box<dyn RegulatedMotor>,
    /// Medium motor turning the front axle (port A).
    pub steering: Box<dyn RegulatedMotor>,
    /// Infrared sensor in proximity mode (port S1).
    pub ir_sensor: Box<dyn DistanceSensor>,
    pub battery: Box<dyn Battery>,
}
