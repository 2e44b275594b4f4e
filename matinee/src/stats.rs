//! Sojourn time recording and summary statistics.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::{SimulationError, SimulationResult};

/// Append-only collection of completed sojourn times.
///
/// The driver creates the collection and hands clones of the handle to
/// entity tasks, which only append on completion. Entities abandoned at the
/// horizon never reach their append step, so the collection holds exactly
/// the entities whose full lifecycle finished within the run.
#[derive(Debug, Clone, Default)]
pub struct SojournRecords {
    inner: Rc<RefCell<Vec<Duration>>>,
}

impl SojournRecords {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a completed sojourn time.
    pub fn append(&self, sojourn: Duration) {
        self.inner.borrow_mut().push(sojourn);
    }

    /// Returns the number of recorded sojourns.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns `true` if no sojourn has been recorded.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Returns a copy of the recorded sojourns, in completion order.
    pub fn snapshot(&self) -> Vec<Duration> {
        self.inner.borrow().clone()
    }

    /// Computes the average sojourn time split into whole minutes and seconds.
    ///
    /// The mean is floored to whole minutes; the fractional remainder is
    /// converted to seconds and rounded half-up (`f64::round` rounds half
    /// away from zero, which is half-up for the non-negative values possible
    /// here). A remainder that rounds to a full minute carries over.
    ///
    /// Fails with [`SimulationError::EmptyStatistics`] when no sojourn has
    /// been recorded.
    pub fn summary(&self) -> SimulationResult<WaitSummary> {
        let records = self.inner.borrow();
        if records.is_empty() {
            return Err(SimulationError::EmptyStatistics);
        }

        let total_seconds: f64 = records.iter().map(Duration::as_secs_f64).sum();
        let mean_minutes = total_seconds / records.len() as f64 / 60.0;

        let mut whole_minutes = mean_minutes.floor();
        let mut whole_seconds = ((mean_minutes - whole_minutes) * 60.0).round();
        if whole_seconds >= 60.0 {
            whole_minutes += 1.0;
            whole_seconds = 0.0;
        }

        Ok(WaitSummary {
            whole_minutes: whole_minutes as u64,
            whole_seconds: whole_seconds as u32,
        })
    }
}

/// Average wait time split into whole minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSummary {
    /// Whole minutes of the average sojourn time.
    pub whole_minutes: u64,
    /// Remaining whole seconds, rounded half-up.
    pub whole_seconds: u32,
}

impl fmt::Display for WaitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} minutes and {} seconds",
            self.whole_minutes, self.whole_seconds
        )
    }
}
