//! [`deploy_truck`] – wires a [`TruckRig`] into the four truck tasks.
//!
//! Each device handle is moved into exactly one task.  Deployment failures
//! are reported once and do not prevent the remaining tasks from starting.

use tracing::{error, info};
use truck_hal::TruckRig;
use truck_middleware::EventBus;
use truck_types::TruckError;

use crate::battery_monitor::BatteryMonitor;
use crate::config::TruckConfig;
use crate::direction_actuator::DirectionActuator;
use crate::distance_sampler::DistanceSampler;
use crate::motion_controller::{MotionController, MotionSubscription};
use crate::scheduler::{FaultPolicy, PeriodicTask, Scheduler};

/// Outcome of [`deploy_truck`].
pub struct DeploymentReport {
    /// Names of the tasks that started, in deployment order.
    pub deployed: Vec<String>,
    /// Tasks that failed to start, with the reason.
    pub failed: Vec<(String, TruckError)>,
    /// The attached controller, when it deployed.
    pub motion: Option<MotionSubscription>,
}

/// Deploy the motion controller, distance sampler, steering actuator and
/// battery monitor.
///
/// The controller subscribes before the sampler starts so the very first
/// reading already has a consumer.
pub fn deploy_truck(
    rig: TruckRig,
    bus: &EventBus,
    config: &TruckConfig,
    scheduler: &mut Scheduler,
) -> DeploymentReport {
    let TruckRig {
        left_engine,
        right_engine,
        steering,
        ir_sensor,
        battery,
    } = rig;

    let mut report = DeploymentReport {
        deployed: Vec::new(),
        failed: Vec::new(),
        motion: None,
    };

    let controller = MotionController::new(
        left_engine,
        right_engine,
        config.distance_threshold,
        config.drive_speed,
    );
    match controller.attach(bus) {
        Ok(subscription) => {
            report.record("motion_controller", Ok(()));
            report.motion = Some(subscription);
        }
        Err(e) => report.record("motion_controller", Err(e)),
    }

    let policy = config.fault_policy;
    report.deploy(
        scheduler,
        DistanceSampler::new(ir_sensor, bus.clone(), config.distance_interval()),
        policy,
    );
    report.deploy(
        scheduler,
        DirectionActuator::new(steering, config.steering_increment, config.direction_interval()),
        policy,
    );
    report.deploy(
        scheduler,
        BatteryMonitor::new(battery, config.battery_interval()),
        policy,
    );

    report
}

impl DeploymentReport {
    /// `true` when every task started.
    pub fn all_deployed(&self) -> bool {
        self.failed.is_empty()
    }

    fn deploy<T: PeriodicTask>(&mut self, scheduler: &mut Scheduler, task: T, policy: FaultPolicy) {
        let name = task.name().to_string();
        let result = scheduler.deploy(task, policy).map(|_| ());
        self.record(&name, result);
    }

    fn record(&mut self, name: &str, result: Result<(), TruckError>) {
        match result {
            Ok(()) => {
                info!(task = name, "deployed");
                self.deployed.push(name.to_string());
            }
            Err(e) => {
                error!(task = name, error = %e, "deployment failed");
                self.failed.push((name.to_string(), e));
            }
        }
    }
}
