//! [`DistanceSampler`] – publishes IR distance readings on the bus.

use std::time::Duration;

use tracing::trace;
use truck_hal::DistanceSensor;
use truck_middleware::EventBus;
use truck_types::{IR_DISTANCE, TruckError};

use crate::scheduler::PeriodicTask;

/// Reads one sample per tick and publishes it, truncated toward zero, on
/// [`IR_DISTANCE`].  The sampler is the only producer on that topic.
pub struct DistanceSampler {
    sensor: Box<dyn DistanceSensor>,
    bus: EventBus,
    interval: Duration,
}

impl DistanceSampler {
    pub fn new(sensor: Box<dyn DistanceSensor>, bus: EventBus, interval: Duration) -> Self {
        Self {
            sensor,
            bus,
            interval,
        }
    }

    /// Read and publish one sample.  Returns the published distance.
    ///
    /// # Errors
    ///
    /// Propagates sensor faults, and returns [`TruckError::InvalidReading`]
    /// for NaN or infinite samples.  Nothing is published in either case.
    pub fn sample(&mut self) -> Result<i32, TruckError> {
        let raw = self.sensor.fetch_sample()?;
        if !raw.is_finite() {
            return Err(TruckError::InvalidReading {
                component: self.sensor.id().to_string(),
                value: raw,
            });
        }
        let distance = raw.trunc() as i32;
        let delivered = self.bus.publish(IR_DISTANCE, distance);
        trace!(distance, delivered, "distance published");
        Ok(distance)
    }
}

impl PeriodicTask for DistanceSampler {
    fn name(&self) -> &str {
        "distance_sampler"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn on_tick(&mut self) -> Result<(), TruckError> {
        self.sample().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use truck_hal::sim::SimDistanceSensor;

    fn sampler(samples: Vec<f32>) -> (DistanceSampler, Arc<Mutex<Vec<i32>>>) {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.subscribe(IR_DISTANCE, move |msg| sink.lock().unwrap().push(msg.body));
        let sensor = Box::new(SimDistanceSensor::scripted("ir", samples));
        (
            DistanceSampler::new(sensor, bus, Duration::from_millis(100)),
            seen,
        )
    }

    #[test]
    fn publishes_truncated_samples() {
        let (mut sampler, seen) = sampler(vec![15.9, 9.99, 10.0, 0.4]);
        for _ in 0..4 {
            sampler.on_tick().unwrap();
        }
        assert_eq!(*seen.lock().unwrap(), vec![15, 9, 10, 0]);
    }

    #[test]
    fn non_finite_sample_is_rejected_and_not_published() {
        let (mut sampler, seen) = sampler(vec![f32::NAN, f32::INFINITY, 12.0]);

        assert!(matches!(
            sampler.sample(),
            Err(TruckError::InvalidReading { .. })
        ));
        assert!(matches!(
            sampler.sample(),
            Err(TruckError::InvalidReading { .. })
        ));
        assert_eq!(sampler.sample(), Ok(12));
        assert_eq!(*seen.lock().unwrap(), vec![12]);
    }

    #[test]
    fn sensor_fault_propagates() {
        let (mut sampler, seen) = sampler(Vec::new());
        assert!(matches!(
            sampler.on_tick(),
            Err(TruckError::HardwareFault { .. })
        ));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn publishing_without_subscribers_is_not_an_error() {
        let sensor = Box::new(SimDistanceSensor::scripted("ir", vec![30.0]));
        let mut sampler = DistanceSampler::new(sensor, EventBus::new(), Duration::from_millis(100));
        assert_eq!(sampler.sample(), Ok(30));
    }
}
