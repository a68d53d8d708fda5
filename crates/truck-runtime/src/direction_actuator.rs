//! [`DirectionActuator`] – sweeps the steering column on a timer.

use std::time::Duration;

use tracing::info;
use truck_hal::RegulatedMotor;
use truck_types::TruckError;

use crate::scheduler::PeriodicTask;

/// Turns the steering motor by a fixed increment every tick, without waiting
/// for the rotation to finish, then logs where the motor reports it is.
///
/// There is no target heading: the increment is unconditional and ignores
/// every other task.
pub struct DirectionActuator {
    steering: Box<dyn RegulatedMotor>,
    increment: i32,
    interval: Duration,
}

impl DirectionActuator {
    pub fn new(steering: Box<dyn RegulatedMotor>, increment: i32, interval: Duration) -> Self {
        Self {
            steering,
            increment,
            interval,
        }
    }
}

impl PeriodicTask for DirectionActuator {
    fn name(&self) -> &str {
        "direction_actuator"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn on_tick(&mut self) -> Result<(), TruckError> {
        self.steering.rotate(self.increment, true)?;
        info!(position = self.steering.position(), "steering position");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{FaultPolicy, Scheduler};
    use truck_hal::sim::SimMotor;
    use truck_types::MotorCommand;

    const NUDGE: MotorCommand = MotorCommand::Rotate {
        angle: 20,
        immediate_return: true,
    };

    #[test]
    fn tick_rotates_once_without_blocking() {
        let motor = SimMotor::new("steering");
        let journal = motor.journal();
        let mut actuator = DirectionActuator::new(Box::new(motor), 20, Duration::from_secs(1));

        actuator.on_tick().unwrap();
        assert_eq!(journal.commands(), vec![NUDGE]);

        actuator.on_tick().unwrap();
        assert_eq!(journal.commands(), vec![NUDGE, NUDGE]);
        assert_eq!(actuator.steering.position(), 40);
    }

    #[test]
    fn rotation_fault_propagates() {
        let motor = SimMotor::new("steering").with_fault("gear slipped");
        let mut actuator = DirectionActuator::new(Box::new(motor), 20, Duration::from_secs(1));
        assert!(matches!(
            actuator.on_tick(),
            Err(TruckError::HardwareFault { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn rotates_exactly_once_per_interval() {
        let motor = SimMotor::new("steering");
        let journal = motor.journal();
        let actuator = DirectionActuator::new(Box::new(motor), 20, Duration::from_secs(1));

        let mut scheduler = Scheduler::current();
        scheduler.deploy(actuator, FaultPolicy::SkipTick).unwrap();

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(journal.commands(), vec![NUDGE; 3]);
    }
}
