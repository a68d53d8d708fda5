//! `truck-hal` – Hardware Abstraction Layer
//!
//! Device traits for everything fitted to the truck, plus simulated drivers
//! so the stack runs without a brick.
//!
//! # Modules
//!
//! - [`motor`] – [`RegulatedMotor`]: drive wheels and steering.
//! - [`sensor`] – [`DistanceSensor`] and [`Battery`].
//! - [`rig`] – [`TruckRig`]: one owned handle per device.
//! - [`sim`] – recording stub drivers and the [`SimTruck`][sim::SimTruck]
//!   builder.

pub mod motor;
pub mod rig;
pub mod sensor;
pub mod sim;

pub use motor::RegulatedMotor;
pub use rig::TruckRig;
pub use sensor::{Battery, DistanceSensor};
