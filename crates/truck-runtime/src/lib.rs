//! `truck-runtime` – the control loop
//!
//! Periodic tasks that sample, steer, monitor and drive the truck, plus the
//! scheduler that runs them on a shared Tokio worker pool.
//!
//! # Modules
//!
//! - [`scheduler`] – [`Scheduler`][scheduler::Scheduler] and the
//!   [`PeriodicTask`][scheduler::PeriodicTask] trait every timed task
//!   implements.  A failing tick follows the task's
//!   [`FaultPolicy`][scheduler::FaultPolicy] and never affects other tasks.
//! - [`distance_sampler`] – reads the IR sensor every 100 ms and publishes
//!   the reading on `ir.distance`.
//! - [`motion_controller`] – consumes `ir.distance` and runs or stops the
//!   drive motors.
//! - [`direction_actuator`] – nudges the steering motor every second.
//! - [`battery_monitor`] – logs the battery voltage every second.
//! - [`deployment`] – [`deploy_truck`][deployment::deploy_truck]: splits a
//!   [`TruckRig`][truck_hal::TruckRig] across the four tasks and reports
//!   which ones started.
//! - [`config`] – [`TruckConfig`][config::TruckConfig]: intervals, threshold,
//!   speed and pool size.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: console
//!   logging with optional OTLP span export.

pub mod battery_monitor;
pub mod config;
pub mod deployment;
pub mod direction_actuator;
pub mod distance_sampler;
pub mod motion_controller;
pub mod scheduler;
pub mod telemetry;

pub use battery_monitor::BatteryMonitor;
pub use config::TruckConfig;
pub use deployment::{DeploymentReport, deploy_truck};
pub use direction_actuator::DirectionActuator;
pub use distance_sampler::DistanceSampler;
pub use motion_controller::{MotionController, MotionSubscription};
pub use scheduler::{FaultPolicy, PeriodicTask, Scheduler, TaskHandle};
pub use telemetry::{TracerProviderGuard, init_tracing};
