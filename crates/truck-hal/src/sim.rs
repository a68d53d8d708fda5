//! In-process simulated drivers for running the truck without a brick.
//!
//! [`SimTruck`] builds a [`TruckRig`] populated with stub drivers that record
//! every command and return scripted readings.  This lets the whole stack run
//! headless on a laptop and in CI.
//!
//! # Example
//!
//! ```rust
//! use truck_hal::sim::SimTruck;
//! use truck_hal::{DistanceSensor, RegulatedMotor};
//! use truck_types::MotorCommand;
//!
//! let (mut rig, journals) = SimTruck::new().with_distance_samples(vec![25.0]).build();
//!
//! rig.left_engine.set_speed(500).expect("sim motor must succeed");
//! assert_eq!(journals.left.commands(), vec![MotorCommand::SetSpeed(500)]);
//! assert_eq!(rig.ir_sensor.fetch_sample().expect("scripted sample"), 25.0);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;
use truck_types::{MotorCommand, TruckError};

use crate::motor::RegulatedMotor;
use crate::rig::TruckRig;
use crate::sensor::{Battery, DistanceSensor};

/// Voltage reported by [`SimBattery`] unless told otherwise: a fresh set of
/// six AA cells.
pub const DEFAULT_SIM_MILLIVOLTS: u32 = 8_100;

// ────────────────────────────────────────────────────────────────────────────
// Command journal
// ────────────────────────────────────────────────────────────────────────────

/// Shared, append-only record of the commands a [`SimMotor`] received.
///
/// Cloning the journal shares the underlying record, so tests can keep a
/// clone while the motor itself is moved into a task.
#[derive(Debug, Clone, Default)]
pub struct CommandJournal {
    entries: Arc<Mutex<Vec<MotorCommand>>>,
}

impl CommandJournal {
    /// Snapshot of every command recorded so far, oldest first.
    pub fn commands(&self) -> Vec<MotorCommand> {
        self.lock().clone()
    }

    /// Number of commands recorded so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// `true` when no command has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn record(&self, command: MotorCommand) {
        self.lock().push(command);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<MotorCommand>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stub motor
// ────────────────────────────────────────────────────────────────────────────

/// A simulated regulated motor.  Records every command in its
/// [`CommandJournal`] and keeps a tacho counter that moves only on
/// [`rotate`][RegulatedMotor::rotate].
pub struct SimMotor {
    id: String,
    position: i32,
    journal: CommandJournal,
    fault: Option<String>,
}

impl SimMotor {
    /// Create a new simulated motor with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position: 0,
            journal: CommandJournal::default(),
            fault: None,
        }
    }

    /// Make every subsequent command fail with a hardware fault carrying
    /// `details`.
    pub fn with_fault(mut self, details: impl Into<String>) -> Self {
        self.fault = Some(details.into());
        self
    }

    /// A handle onto this motor's command record.
    pub fn journal(&self) -> CommandJournal {
        self.journal.clone()
    }

    fn apply(&mut self, command: MotorCommand) -> Result<(), TruckError> {
        if let Some(details) = &self.fault {
            return Err(TruckError::hardware(&self.id, details.clone()));
        }
        debug!(motor = %self.id, ?command, "sim motor command");
        self.journal.record(command);
        Ok(())
    }
}

impl RegulatedMotor for SimMotor {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_speed(&mut self, speed: i32) -> Result<(), TruckError> {
        self.apply(MotorCommand::SetSpeed(speed))
    }

    fn backward(&mut self) -> Result<(), TruckError> {
        self.apply(MotorCommand::Backward)
    }

    fn stop(&mut self) -> Result<(), TruckError> {
        self.apply(MotorCommand::Stop)
    }

    fn reset_tacho_count(&mut self) -> Result<(), TruckError> {
        self.apply(MotorCommand::ResetTachoCount)?;
        self.position = 0;
        Ok(())
    }

    fn rotate(&mut self, angle: i32, immediate_return: bool) -> Result<(), TruckError> {
        self.apply(MotorCommand::Rotate {
            angle,
            immediate_return,
        })?;
        self.position += angle;
        Ok(())
    }

    fn position(&self) -> i32 {
        self.position
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stub sensors
// ────────────────────────────────────────────────────────────────────────────

/// A simulated distance sensor that cycles through a scripted list of
/// samples, one per fetch.
pub struct SimDistanceSensor {
    id: String,
    samples: Vec<f32>,
    cursor: usize,
}

impl SimDistanceSensor {
    /// Create a sensor that replays `samples` in order, wrapping around at the
    /// end.  An empty script makes every fetch fail.
    pub fn scripted(id: impl Into<String>, samples: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            samples,
            cursor: 0,
        }
    }

    /// A sensor that watches an obstacle approach from 40 down to 0 and then
    /// recede again.
    pub fn approaching(id: impl Into<String>) -> Self {
        let closing = (0..=40).rev().map(|d| d as f32);
        let receding = (1..40).map(|d| d as f32);
        Self::scripted(id, closing.chain(receding).collect())
    }
}

impl DistanceSensor for SimDistanceSensor {
    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_sample(&mut self) -> Result<f32, TruckError> {
        if self.samples.is_empty() {
            return Err(TruckError::hardware(&self.id, "no samples scripted"));
        }
        let sample = self.samples[self.cursor];
        self.cursor = (self.cursor + 1) % self.samples.len();
        Ok(sample)
    }
}

/// A simulated battery that always reports the same voltage.
pub struct SimBattery {
    millivolts: u32,
}

impl SimBattery {
    pub fn new(millivolts: u32) -> Self {
        Self { millivolts }
    }
}

impl Default for SimBattery {
    fn default() -> Self {
        Self::new(DEFAULT_SIM_MILLIVOLTS)
    }
}

impl Battery for SimBattery {
    fn voltage_millivolts(&mut self) -> Result<u32, TruckError> {
        Ok(self.millivolts)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SimTruck builder
// ────────────────────────────────────────────────────────────────────────────

/// Command journals of the motors in a simulated rig.
#[derive(Debug, Clone)]
pub struct SimJournals {
    pub left: CommandJournal,
    pub right: CommandJournal,
    pub steering: CommandJournal,
}

/// Builder for a [`TruckRig`] made entirely of simulated drivers.
///
/// Wires the standard truck layout: drive motors `left` (port D) and `right`
/// (port C), the `steering` motor (port A), the `ir` sensor (port S1) and the
/// battery.
pub struct SimTruck {
    distance_samples: Option<Vec<f32>>,
    battery_millivolts: u32,
}

impl SimTruck {
    /// Create a builder with an approaching-obstacle distance script and a
    /// fully charged battery.
    pub fn new() -> Self {
        Self {
            distance_samples: None,
            battery_millivolts: DEFAULT_SIM_MILLIVOLTS,
        }
    }

    /// Replay `samples` from the IR sensor instead of the default script.
    pub fn with_distance_samples(mut self, samples: Vec<f32>) -> Self {
        self.distance_samples = Some(samples);
        self
    }

    /// Report `millivolts` from the battery.
    pub fn with_battery_millivolts(mut self, millivolts: u32) -> Self {
        self.battery_millivolts = millivolts;
        self
    }

    /// Consume the builder and return the rig plus the motors' journals.
    pub fn build(self) -> (TruckRig, SimJournals) {
        let left = SimMotor::new("left");
        let right = SimMotor::new("right");
        let steering = SimMotor::new("steering");
        let journals = SimJournals {
            left: left.journal(),
            right: right.journal(),
            steering: steering.journal(),
        };

        let ir_sensor = match self.distance_samples {
            Some(samples) => SimDistanceSensor::scripted("ir", samples),
            None => SimDistanceSensor::approaching("ir"),
        };

        let rig = TruckRig {
            left_engine: Box::new(left),
            right_engine: Box::new(right),
            steering: Box::new(steering),
            ir_sensor: Box::new(ir_sensor),
            battery: Box::new(SimBattery::new(self.battery_millivolts)),
        };
        (rig, journals)
    }
}

impl Default for SimTruck {
    fn default() -> Self {
        Self::new()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_motor_records_commands_in_order() {
        let mut motor = SimMotor::new("left");
        let journal = motor.journal();

        motor.set_speed(500).unwrap();
        motor.backward().unwrap();
        motor.stop().unwrap();

        assert_eq!(
            journal.commands(),
            vec![
                MotorCommand::SetSpeed(500),
                MotorCommand::Backward,
                MotorCommand::Stop,
            ]
        );
    }

    #[test]
    fn sim_motor_rotation_moves_tacho_counter() {
        let mut motor = SimMotor::new("steering");
        motor.rotate(20, true).unwrap();
        motor.rotate(20, true).unwrap();
        assert_eq!(motor.position(), 40);

        motor.reset_tacho_count().unwrap();
        assert_eq!(motor.position(), 0);
    }

    #[test]
    fn faulty_sim_motor_rejects_commands_without_recording() {
        let mut motor = SimMotor::new("right").with_fault("cable unplugged");
        let journal = motor.journal();

        let err = motor.backward().unwrap_err();
        assert_eq!(err, TruckError::hardware("right", "cable unplugged"));
        assert!(journal.is_empty());
    }

    #[test]
    fn scripted_sensor_wraps_around() {
        let mut sensor = SimDistanceSensor::scripted("ir", vec![1.0, 2.0]);
        let samples: Vec<f32> = (0..5).map(|_| sensor.fetch_sample().unwrap()).collect();
        assert_eq!(samples, vec![1.0, 2.0, 1.0, 2.0, 1.0]);
    }

    #[test]
    fn empty_script_is_a_hardware_fault() {
        let mut sensor = SimDistanceSensor::scripted("ir", Vec::new());
        assert!(matches!(
            sensor.fetch_sample(),
            Err(TruckError::HardwareFault { .. })
        ));
    }

    #[test]
    fn approaching_script_crosses_the_stop_distance() {
        let mut sensor = SimDistanceSensor::approaching("ir");
        let first = sensor.fetch_sample().unwrap();
        assert_eq!(first, 40.0);
        let min = (0..100)
            .map(|_| sensor.fetch_sample().unwrap())
            .fold(f32::MAX, f32::min);
        assert_eq!(min, 0.0);
    }

    #[test]
    fn sim_truck_wires_standard_rig() {
        let (mut rig, journals) = SimTruck::new().with_battery_millivolts(7_200).build();

        assert_eq!(rig.left_engine.id(), "left");
        assert_eq!(rig.right_engine.id(), "right");
        assert_eq!(rig.steering.id(), "steering");
        assert_eq!(rig.ir_sensor.id(), "ir");
        assert_eq!(rig.battery.voltage_millivolts().unwrap(), 7_200);

        rig.steering.rotate(20, true).unwrap();
        assert_eq!(journals.steering.len(), 1);
        assert!(journals.left.is_empty());
        assert!(journals.right.is_empty());
    }
}
