//! The arrival generator.

use std::rc::Rc;

use crate::SimulationResult;
use crate::stats::SojournRecords;
use crate::time::TimeProvider;

use super::{ARRIVAL_INTERVAL, Theater, moviegoer::attend};

/// Spawn a steady stream of moviegoers, one every [`ARRIVAL_INTERVAL`].
///
/// Runs forever in simulation time; the driver abandons it by no longer
/// processing events once the horizon is reached. Moviegoer ids start at 1.
/// Each moviegoer runs as its own task; a failing moviegoer is logged and
/// dropped without disturbing the rest of the simulation.
pub async fn generate_arrivals<T: TimeProvider + 'static>(
    theater: Rc<Theater<T>>,
    records: SojournRecords,
) -> SimulationResult<()> {
    let mut next_id: u64 = 0;
    loop {
        theater.time().sleep(ARRIVAL_INTERVAL).await?;
        next_id += 1;

        let theater = Rc::clone(&theater);
        let records = records.clone();
        let id = next_id;
        tokio::task::spawn_local(async move {
            if let Err(error) = attend(theater, id, records).await {
                tracing::error!(moviegoer = id, %error, "moviegoer abandoned after error");
            }
        });
    }
}
