//! Time provider implementations for simulation time.

use async_trait::async_trait;
use std::time::Duration;

use crate::{SimulationResult, WeakSimWorld};

/// Provider trait for time operations.
///
/// Workload code sleeps and reads the clock through this trait instead of
/// holding the simulation world, so the clock stays a seam rather than a
/// hard dependency.
#[async_trait(?Send)]
pub trait TimeProvider: Clone {
    /// Sleep for the specified duration of simulation time.
    async fn sleep(&self, duration: Duration) -> SimulationResult<()>;

    /// Get the current simulation time.
    fn now(&self) -> Duration;
}

/// Simulation time provider that integrates with [`crate::SimWorld`].
#[derive(Debug, Clone)]
pub struct SimTimeProvider {
    sim: WeakSimWorld,
}

impl SimTimeProvider {
    /// Create a new simulation time provider.
    pub fn new(sim: WeakSimWorld) -> Self {
        Self { sim }
    }
}

#[async_trait(?Send)]
impl TimeProvider for SimTimeProvider {
    async fn sleep(&self, duration: Duration) -> SimulationResult<()> {
        let sleep_future = self.sim.sleep(duration)?;
        sleep_future.await
    }

    fn now(&self) -> Duration {
        self.sim.current_time().unwrap_or(Duration::ZERO)
    }
}
