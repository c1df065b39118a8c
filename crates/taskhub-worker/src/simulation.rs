//! Simulated work: bounded random delays and fabricated metrics.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

/// Scales the simulated delays of operation handlers.
///
/// A `time_scale` of `1.0` sleeps the nominal duration; `0.0` skips
/// sleeping entirely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simulation {
    time_scale: f64,
}

impl Simulation {
    /// Create a simulation with the given scale. Negative values clamp to 0.
    pub fn new(time_scale: f64) -> Self {
        Self {
            time_scale: time_scale.max(0.0),
        }
    }

    /// A simulation that never sleeps.
    pub fn instant() -> Self {
        Self::new(0.0)
    }

    /// The configured scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Scaled duration for a nominal number of seconds.
    pub fn scaled(&self, seconds: f64) -> Duration {
        Duration::from_secs_f64((seconds * self.time_scale).max(0.0))
    }

    /// Sleep a uniformly random nominal duration (in seconds) from `range`.
    pub async fn pause(&self, range: RangeInclusive<f64>) {
        let delay = self.scaled(uniform(range));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Uniform float from `range`.
pub fn uniform(range: RangeInclusive<f64>) -> f64 {
    rand::thread_rng().gen_range(range)
}

/// Uniform integer from `range`.
pub fn int_between(range: RangeInclusive<u64>) -> u64 {
    rand::thread_rng().gen_range(range)
}

/// Round to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_duration() {
        assert_eq!(Simulation::new(0.5).scaled(4.0), Duration::from_secs(2));
        assert!(Simulation::instant().scaled(10.0).is_zero());
        assert_eq!(Simulation::new(-3.0).time_scale(), 0.0);
    }

    #[test]
    fn test_random_values_stay_in_range() {
        for _ in 0..100 {
            let f = uniform(1.5..=10.2);
            assert!((1.5..=10.2).contains(&f));
            let n = int_between(10..=100);
            assert!((10..=100).contains(&n));
        }
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(97.46, 1), 97.5);
    }

    #[tokio::test]
    async fn test_instant_pause_returns_immediately() {
        let started = std::time::Instant::now();
        Simulation::instant().pause(5.0..=15.0).await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
