use thiserror::Error;

/// Errors that can occur during simulation operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The simulation has been shut down and is no longer accessible.
    #[error("Simulation has been shut down")]
    SimulationShutdown,
    /// A resource pool was configured with a capacity that is not a positive integer.
    #[error("Invalid capacity {value} for pool '{pool}': capacity must be at least 1")]
    InvalidCapacity {
        /// Name of the offending pool.
        pool: String,
        /// The rejected capacity value.
        value: usize,
    },
    /// A simulated delay was requested that cannot be represented as a duration.
    #[error("Invalid delay of {minutes} minutes: delays must be finite and non-negative")]
    InvalidDelay {
        /// The rejected value, in minutes.
        minutes: f64,
    },
    /// A pool slot was released without a matching prior acquisition.
    #[error("Release without hold on pool '{pool}'")]
    ReleaseWithoutHold {
        /// Name of the pool the release was issued against.
        pool: String,
    },
    /// Summary statistics were requested but no entity completed its lifecycle.
    #[error("No completed sojourns to summarize")]
    EmptyStatistics,
    /// The simulation is in an invalid state.
    #[error("Invalid simulation state: {0}")]
    InvalidState(String),
}

/// A type alias for `Result<T, SimulationError>`.
pub type SimulationResult<T> = Result<T, SimulationError>;
