//! The movie theater queueing network.
//!
//! Three finite-capacity service stations (cashiers, snack servers, ushers)
//! chained together, a stream of arriving moviegoers, and the service-time
//! policy for each station.

use std::time::Duration;

use crate::resource::ResourcePool;
use crate::rng::sim_random_range;
use crate::time::TimeProvider;

pub mod arrivals;
pub mod moviegoer;

pub use arrivals::generate_arrivals;
pub use moviegoer::attend;

/// Simulated interval between moviegoer arrivals.
pub const ARRIVAL_INTERVAL: Duration = Duration::from_secs(12);

/// Fixed duration of a ticket check by an usher.
pub const TICKET_CHECK_DURATION: Duration = Duration::from_secs(3);

/// The theater's service stations and clock.
///
/// Generic over the time provider so workload code stays decoupled from the
/// simulation world that drives it.
pub struct Theater<T: TimeProvider> {
    time: T,
    cashier: ResourcePool,
    server: ResourcePool,
    usher: ResourcePool,
}

impl<T: TimeProvider> Theater<T> {
    /// Creates a theater from its clock and three service-station pools.
    pub fn new(time: T, cashier: ResourcePool, server: ResourcePool, usher: ResourcePool) -> Self {
        Self {
            time,
            cashier,
            server,
            usher,
        }
    }

    /// The theater's clock.
    pub fn time(&self) -> &T {
        &self.time
    }

    /// The cashier stations where tickets are purchased.
    pub fn cashier(&self) -> &ResourcePool {
        &self.cashier
    }

    /// The snack counter servers.
    pub fn server(&self) -> &ResourcePool {
        &self.server
    }

    /// The ushers checking tickets at the door.
    pub fn usher(&self) -> &ResourcePool {
        &self.usher
    }

    /// Draw a ticket purchase duration: 1 to 3 whole minutes, uniform.
    pub fn draw_ticket_service(&self) -> Duration {
        Duration::from_secs(60 * sim_random_range(1..4u64))
    }

    /// Draw a snack purchase duration: 1 to 5 whole minutes, uniform.
    pub fn draw_snack_service(&self) -> Duration {
        Duration::from_secs(60 * sim_random_range(1..6u64))
    }
}
