//! The per-moviegoer lifecycle.

use std::rc::Rc;

use crate::SimulationResult;
use crate::rng::sim_random_bool;
use crate::stats::SojournRecords;
use crate::time::TimeProvider;

use super::{TICKET_CHECK_DURATION, Theater};

/// Run one moviegoer through the theater.
///
/// The lifecycle is strictly sequential: buy a ticket at a cashier, maybe
/// buy snacks at the counter (a fair coin decides), then have the ticket
/// checked by an usher. Each station is an acquire, a timed hold, and a
/// release; the slot guards release on every exit path. On completion the
/// total sojourn time is appended to `records`.
///
/// An error ends this moviegoer only; pool and clock state stay valid for
/// everyone else.
pub async fn attend<T: TimeProvider>(
    theater: Rc<Theater<T>>,
    moviegoer: u64,
    records: SojournRecords,
) -> SimulationResult<()> {
    let arrival = theater.time().now();
    tracing::debug!(moviegoer, arrival_s = arrival.as_secs_f64(), "arrived at the theater");

    {
        tracing::debug!(moviegoer, "waiting for a cashier");
        let slot = theater.cashier().acquire().await?;
        theater.time().sleep(theater.draw_ticket_service()).await?;
        slot.release()?;
        tracing::debug!(moviegoer, "purchased a ticket");
    }

    if sim_random_bool(0.5) {
        tracing::debug!(moviegoer, "waiting for a snack server");
        let slot = theater.server().acquire().await?;
        theater.time().sleep(theater.draw_snack_service()).await?;
        slot.release()?;
        tracing::debug!(moviegoer, "purchased snacks");
    }

    {
        tracing::debug!(moviegoer, "waiting for an usher");
        let slot = theater.usher().acquire().await?;
        theater.time().sleep(TICKET_CHECK_DURATION).await?;
        slot.release()?;
        tracing::debug!(moviegoer, "ticket checked");
    }

    let sojourn = theater.time().now() - arrival;
    records.append(sojourn);
    tracing::debug!(moviegoer, sojourn_s = sojourn.as_secs_f64(), "left for the screening");

    Ok(())
}
