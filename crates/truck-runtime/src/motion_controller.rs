//! [`MotionController`] – keeps the truck a safe distance from obstacles.
//!
//! Listens on [`IR_DISTANCE`].  Every reading at or above the threshold runs
//! both drive motors backward at the cruise speed; anything closer stops
//! them.  The decision is level-triggered: it is recomputed from scratch on
//! every message, so repeated readings simply re-issue the same command.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};
use truck_hal::RegulatedMotor;
use truck_middleware::{EventBus, SubscriptionHandle};
use truck_types::{IR_DISTANCE, MotionState, TruckError};

/// Pick the drive state for `distance`.  The threshold itself counts as
/// far enough to move.
pub fn decide(distance: i32, threshold: i32) -> MotionState {
    if distance >= threshold {
        MotionState::Moving
    } else {
        MotionState::Stopped
    }
}

/// Owns the two drive motors and turns distance readings into commands.
pub struct MotionController {
    left: Box<dyn RegulatedMotor>,
    right: Box<dyn RegulatedMotor>,
    threshold: i32,
    speed: i32,
    state: Option<MotionState>,
}

impl MotionController {
    pub fn new(
        left: Box<dyn RegulatedMotor>,
        right: Box<dyn RegulatedMotor>,
        threshold: i32,
        speed: i32,
    ) -> Self {
        Self {
            left,
            right,
            threshold,
            speed,
            state: None,
        }
    }

    /// State chosen for the most recent reading, `None` before the first.
    pub fn state(&self) -> Option<MotionState> {
        self.state
    }

    /// Zero both motors' tacho counters.
    pub fn reset(&mut self) -> Result<(), TruckError> {
        self.on_both(|m| m.reset_tacho_count())
    }

    /// Apply the drive command for one distance reading.
    ///
    /// # Errors
    ///
    /// Every command goes to both motors even when one of them faults, so a
    /// healthy motor is never left running.  The first fault is returned and
    /// the recorded state is left unchanged so the next reading retries.
    pub fn on_distance(&mut self, distance: i32) -> Result<MotionState, TruckError> {
        let next = decide(distance, self.threshold);
        let speed = self.speed;
        match next {
            MotionState::Moving => {
                let set = self.on_both(|m| m.set_speed(speed));
                let run = self.on_both(|m| m.backward());
                set.and(run)?;
            }
            MotionState::Stopped => self.on_both(|m| m.stop())?,
        }

        if self.state != Some(next) {
            info!(distance, state = ?next, "motion state changed");
        }
        self.state = Some(next);
        Ok(next)
    }

    fn on_both(
        &mut self,
        mut command: impl FnMut(&mut dyn RegulatedMotor) -> Result<(), TruckError>,
    ) -> Result<(), TruckError> {
        let left = command(self.left.as_mut());
        let right = command(self.right.as_mut());
        left.and(right)
    }

    /// Reset the tacho counters once, then subscribe to [`IR_DISTANCE`].
    ///
    /// # Errors
    ///
    /// Returns [`TruckError::Deployment`] if the reset fails; nothing is
    /// subscribed in that case.
    pub fn attach(mut self, bus: &EventBus) -> Result<MotionSubscription, TruckError> {
        self.reset().map_err(|e| TruckError::Deployment {
            task: "motion_controller".to_string(),
            reason: e.to_string(),
        })?;

        let controller = Arc::new(Mutex::new(self));
        let shared = Arc::clone(&controller);
        let handle = bus.subscribe(IR_DISTANCE, move |msg| {
            let mut controller = lock(&shared);
            match controller.on_distance(msg.body) {
                Ok(state) => debug!(distance = msg.body, ?state, "drive command issued"),
                Err(e) => warn!(distance = msg.body, error = %e, "drive command failed"),
            }
        });

        Ok(MotionSubscription { handle, controller })
    }
}

/// A [`MotionController`] attached to the bus.
pub struct MotionSubscription {
    handle: SubscriptionHandle,
    controller: Arc<Mutex<MotionController>>,
}

impl MotionSubscription {
    /// State chosen for the most recent reading.
    pub fn state(&self) -> Option<MotionState> {
        lock(&self.controller).state()
    }

    /// Stop listening on the bus.
    pub fn detach(self, bus: &EventBus) -> bool {
        bus.unsubscribe(&self.handle)
    }
}

fn lock(controller: &Mutex<MotionController>) -> MutexGuard<'_, MotionController> {
    controller.lock().unwrap_or_else(PoisonError::into_inner)
}
