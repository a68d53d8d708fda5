//! Generic `RegulatedMotor` trait for speed-regulated tacho motors.
//!
//! Drive wheels and the steering column are both regulated motors.  Tasks only
//! ever talk to the trait, so the simulated drivers in [`crate::sim`] and a
//! real device driver can be swapped without touching control logic.

use truck_types::TruckError;

/// A speed-regulated motor with a tacho (position) counter.
///
/// Every motor has a stable identifier so log lines and faults can name the
/// device that misbehaved.
pub trait RegulatedMotor: Send {
    /// Stable identifier for this motor, e.g. `"left"` or `"steering"`.
    fn id(&self) -> &str;

    /// Set the regulated speed used by subsequent run commands, in degrees
    /// per second.
    fn set_speed(&mut self, speed: i32) -> Result<(), TruckError>;

    /// Run the motor backward at the configured speed until told otherwise.
    fn backward(&mut self) -> Result<(), TruckError>;

    /// Stop the motor.
    fn stop(&mut self) -> Result<(), TruckError>;

    /// Zero the tacho counter so [`position`][Self::position] restarts at 0.
    fn reset_tacho_count(&mut self) -> Result<(), TruckError>;

    /// Rotate by `angle` degrees relative to the current position.
    ///
    /// With `immediate_return` the call returns as soon as the command has
    /// been issued instead of waiting for the rotation to complete.
    ///
    /// # Errors
    ///
    /// Returns [`TruckError::HardwareFault`] if the command cannot be applied.
    fn rotate(&mut self, angle: i32, immediate_return: bool) -> Result<(), TruckError>;

    /// Current absolute position of the tacho counter, in degrees.
    fn position(&self) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal in-process motor used only for tests.
    struct MockMotor {
        id: String,
        position: i32,
    }

    impl RegulatedMotor for MockMotor {
        fn id(&self) -> &str {
            &self.id
        }
        fn set_speed(&mut self, _speed: i32) -> Result<(), TruckError> {
            Ok(())
        }
        fn backward(&mut self) -> Result<(), TruckError> {
            Ok(())
        }
        fn stop(&mut self) -> Result<(), TruckError> {
            Ok(())
        }
        fn reset_tacho_count(&mut self) -> Result<(), TruckError> {
            self.position = 0;
            Ok(())
        }
        fn rotate(&mut self, angle: i32, _immediate_return: bool) -> Result<(), TruckError> {
            self.position += angle;
            Ok(())
        }
        fn position(&self) -> i32 {
            self.position
        }
    }

    #[test]
    fn boxed_motor_tracks_relative_rotation() {
        let mut motor: Box<dyn RegulatedMotor> = Box::new(MockMotor {
            id: "steering".to_string(),
            position: 5,
        });
        assert_eq!(motor.id(), "steering");

        motor.reset_tacho_count().unwrap();
        motor.rotate(20, true).unwrap();
        motor.rotate(-5, false).unwrap();
        assert_eq!(motor.position(), 15);
    }
}
