//! Simulation driver: configuration, wiring, and the horizon-bounded event loop.

use std::rc::Rc;
use std::time::Duration;

use crate::sim::SimWorld;
use crate::stats::SojournRecords;
use crate::theater::{Theater, generate_arrivals};
use crate::{SimulationError, SimulationResult};

/// Default simulated duration of a run: 600 minutes (10 hours).
pub const DEFAULT_HORIZON: Duration = Duration::from_secs(600 * 60);

/// Capacities of the three service-station pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TheaterConfig {
    /// Number of cashier stations.
    pub cashiers: usize,
    /// Number of snack counter servers.
    pub servers: usize,
    /// Number of ushers.
    pub ushers: usize,
}

impl TheaterConfig {
    /// The minimal staffing used when input cannot be honored.
    pub const FALLBACK: TheaterConfig = TheaterConfig {
        cashiers: 1,
        servers: 1,
        ushers: 1,
    };

    /// Creates a configuration, rejecting any zero capacity.
    pub fn new(cashiers: usize, servers: usize, ushers: usize) -> SimulationResult<Self> {
        for (pool, value) in [
            ("cashier", cashiers),
            ("server", servers),
            ("usher", ushers),
        ] {
            if value == 0 {
                return Err(SimulationError::InvalidCapacity {
                    pool: pool.to_string(),
                    value,
                });
            }
        }
        Ok(Self {
            cashiers,
            servers,
            ushers,
        })
    }

    /// Builds a configuration from raw input values.
    ///
    /// Any non-positive value makes the whole input fall back to
    /// [`TheaterConfig::FALLBACK`]; the returned flag reports whether the
    /// fallback was applied so the input layer can surface it.
    pub fn from_input(cashiers: i64, servers: i64, ushers: i64) -> (Self, bool) {
        let all_positive = cashiers > 0 && servers > 0 && ushers > 0;
        if all_positive {
            (
                Self {
                    cashiers: cashiers as usize,
                    servers: servers as usize,
                    ushers: ushers as usize,
                },
                false,
            )
        } else {
            (Self::FALLBACK, true)
        }
    }
}

impl Default for TheaterConfig {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Builder-style driver for a theater simulation run.
///
/// Wires a fresh seeded [`SimWorld`], the three resource pools, and the
/// arrival generator, then drives the event loop up to the horizon and
/// returns the recorded sojourn times.
#[derive(Debug, Clone)]
pub struct TheaterSimulation {
    config: TheaterConfig,
    horizon: Duration,
    seed: u64,
}

impl TheaterSimulation {
    /// Creates a driver with the default horizon (600 minutes) and seed 0.
    pub fn new(config: TheaterConfig) -> Self {
        Self {
            config,
            horizon: DEFAULT_HORIZON,
            seed: 0,
        }
    }

    /// Sets the simulated time horizon.
    pub fn horizon(mut self, horizon: Duration) -> Self {
        self.horizon = horizon;
        self
    }

    /// Sets the seed for service-time and snack-choice draws.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Runs the simulation to the horizon.
    ///
    /// Must be called from within a `tokio::task::LocalSet` (or local
    /// runtime), since moviegoers are spawned with `spawn_local`. The loop
    /// interleaves event processing with `yield_now` so every woken task
    /// runs to its next suspension point before the following event fires,
    /// keeping same-time resumptions in scheduling order.
    pub async fn run(self) -> SimulationResult<SojournRecords> {
        let config = TheaterConfig::new(self.config.cashiers, self.config.servers, self.config.ushers)?;

        let mut sim = SimWorld::new_with_seed(self.seed);
        let cashier = sim.create_resource("cashier", config.cashiers)?;
        let server = sim.create_resource("server", config.servers)?;
        let usher = sim.create_resource("usher", config.ushers)?;

        let theater = Rc::new(Theater::new(sim.time_provider(), cashier, server, usher));
        let records = SojournRecords::new();

        tracing::debug!(
            cashiers = config.cashiers,
            servers = config.servers,
            ushers = config.ushers,
            horizon_s = self.horizon.as_secs_f64(),
            seed = self.seed,
            "starting theater simulation"
        );

        let arrivals =
            tokio::task::spawn_local(generate_arrivals(Rc::clone(&theater), records.clone()));

        // Let the generator reach its first suspension before stepping.
        tokio::task::yield_now().await;

        while sim.next_event_time().is_some_and(|due| due <= self.horizon) {
            sim.step();
            tokio::task::yield_now().await;
        }

        // Reaching the horizon abandons the generator and any moviegoer
        // still mid-service: their events stay queued, never processed.
        drop(arrivals);

        tracing::debug!(
            completed = records.len(),
            events = sim.events_processed(),
            final_time_s = sim.current_time().as_secs_f64(),
            "simulation reached its horizon"
        );

        Ok(records)
    }
}
