//! # Matinee
//!
//! A deterministic discrete-event simulation of a movie theater queueing
//! network: moviegoers arrive on a fixed cadence and flow through three
//! finite-capacity service stations (cashiers, snack servers, ushers),
//! each visit being an acquire, a stochastic timed hold, and a release.
//!
//! The engine advances a logical clock event-by-event - never wall-clock -
//! over a single-threaded cooperative runtime. All contention is resolved
//! through FIFO wait queues and all wake-ups flow through one event queue
//! whose same-time ties break by insertion order, so a fixed seed replays
//! an identical run.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

/// Error types and utilities for simulation operations.
pub mod error;
/// Event scheduling and processing for the simulation engine.
pub mod events;
/// Finite-capacity resource pools with FIFO waiters.
pub mod resource;
/// Thread-local random number generation for simulation.
pub mod rng;
/// Simulation driver and run configuration.
pub mod runner;
/// Core simulation world and coordination logic.
pub mod sim;
/// Sleep functionality for simulation time.
pub mod sleep;
/// Sojourn time recording and summary statistics.
pub mod stats;
/// The movie theater queueing network.
pub mod theater;
/// Time provider abstraction for simulation time.
pub mod time;

// Public API exports
pub use error::{SimulationError, SimulationResult};
pub use events::{Event, EventQueue, ScheduledEvent};
pub use resource::{AcquireFuture, PoolId, ResourcePool, SlotGuard};
pub use rng::{
    get_current_sim_seed, reset_sim_rng, set_sim_seed, sim_random, sim_random_bool,
    sim_random_range,
};
pub use runner::{DEFAULT_HORIZON, TheaterConfig, TheaterSimulation};
pub use sim::{SimWorld, WeakSimWorld};
pub use sleep::SleepFuture;
pub use stats::{SojournRecords, WaitSummary};
pub use theater::{ARRIVAL_INTERVAL, TICKET_CHECK_DURATION, Theater, attend, generate_arrivals};
pub use time::{SimTimeProvider, TimeProvider, from_minutes};
