//! Time provider abstraction for simulation time.
//!
//! Workload code takes a [`TimeProvider`] rather than touching the
//! simulation world directly, keeping the clock a swappable seam.

use std::time::Duration;

use crate::{SimulationError, SimulationResult};

/// Core time provider trait implementations
pub mod provider;

pub use provider::{SimTimeProvider, TimeProvider};

/// Seconds per simulated minute.
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Convert a duration expressed in simulated minutes into a [`Duration`].
///
/// This is the one boundary where signed, floating-point time enters the
/// engine; negative or non-finite values fail with
/// [`SimulationError::InvalidDelay`]. Inside the engine all delays are
/// [`Duration`] values, which cannot be negative.
pub fn from_minutes(minutes: f64) -> SimulationResult<Duration> {
    if !minutes.is_finite() || minutes < 0.0 {
        return Err(SimulationError::InvalidDelay { minutes });
    }
    Ok(Duration::from_secs_f64(minutes * SECONDS_PER_MINUTE))
}
