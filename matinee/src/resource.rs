//! Finite-capacity resource pools with FIFO waiters.
//!
//! A [`ResourcePool`] models a service station with `capacity` identical
//! slots. Acquiring when a slot is free succeeds synchronously; otherwise the
//! acquiring task joins a FIFO wait queue and suspends. Releasing a slot
//! hands it to the longest-waiting task by scheduling its resumption at the
//! current simulation time, so the hand-off is ordered through the event
//! queue like every other wake-up.

use std::collections::{HashSet, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::{SimulationResult, WeakSimWorld};

/// Identifier for a resource pool registered with a simulation world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolId(pub(crate) u64);

/// Per-pool bookkeeping owned by the simulation world.
///
/// Invariant: `in_use <= capacity`. A slot freed while the wait queue is
/// non-empty stays counted in `in_use` and is recorded in `granted` until
/// the head waiter resumes, so a late synchronous acquirer can never
/// overtake the queue.
#[derive(Debug)]
pub(crate) struct PoolState {
    pub(crate) name: String,
    pub(crate) capacity: usize,
    pub(crate) in_use: usize,
    /// Task ids waiting for a slot, in arrival order.
    pub(crate) wait_queue: VecDeque<u64>,
    /// Slots reserved for waiters that have been woken but not yet resumed.
    pub(crate) granted: HashSet<u64>,
    /// Task ids currently holding a slot.
    pub(crate) holders: HashSet<u64>,
}

impl PoolState {
    pub(crate) fn new(name: String, capacity: usize) -> Self {
        Self {
            name,
            capacity,
            in_use: 0,
            wait_queue: VecDeque::new(),
            granted: HashSet::new(),
            holders: HashSet::new(),
        }
    }
}

/// Handle to a finite-capacity resource pool.
///
/// Handles are cheap to clone and reference the pool state owned by the
/// simulation world, following the same handle pattern as [`WeakSimWorld`].
#[derive(Debug, Clone)]
pub struct ResourcePool {
    sim: WeakSimWorld,
    id: PoolId,
    name: String,
}

impl ResourcePool {
    pub(crate) fn new(sim: WeakSimWorld, id: PoolId, name: String) -> Self {
        Self { sim, id, name }
    }

    /// Returns the pool's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the pool's configured capacity.
    pub fn capacity(&self) -> SimulationResult<usize> {
        self.sim.upgrade()?.pool_capacity(self.id)
    }

    /// Returns the number of slots currently held or reserved.
    pub fn in_use(&self) -> SimulationResult<usize> {
        self.sim.upgrade()?.pool_in_use(self.id)
    }

    /// Returns the number of tasks waiting for a slot.
    pub fn queue_len(&self) -> SimulationResult<usize> {
        self.sim.upgrade()?.pool_queue_len(self.id)
    }

    /// Acquire a slot from the pool.
    ///
    /// Resolves immediately when a slot is free; otherwise the caller
    /// suspends until a release hands it the slot, in FIFO order. The
    /// returned [`SlotGuard`] releases the slot when dropped.
    pub fn acquire(&self) -> AcquireFuture {
        AcquireFuture {
            sim: self.sim.clone(),
            pool: self.id,
            name: self.name.clone(),
            task_id: None,
        }
    }
}

/// Future returned by [`ResourcePool::acquire`].
///
/// The first poll claims a free slot synchronously when one is available;
/// otherwise it enrolls the task in the pool's wait queue and suspends until
/// the corresponding `SlotGranted` event is processed.
pub struct AcquireFuture {
    sim: WeakSimWorld,
    pool: PoolId,
    name: String,
    /// Assigned on first poll; identifies this acquisition in the pool state.
    task_id: Option<u64>,
}

impl Future for AcquireFuture {
    type Output = SimulationResult<SlotGuard>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let sim = match self.sim.upgrade() {
            Ok(sim) => sim,
            Err(e) => return Poll::Ready(Err(e)),
        };

        let task_id = match self.task_id {
            Some(id) => id,
            None => {
                let id = sim.generate_task_id();
                self.task_id = Some(id);
                id
            }
        };

        match sim.poll_acquire(self.pool, task_id, cx.waker()) {
            Ok(true) => Poll::Ready(Ok(SlotGuard {
                sim: self.sim.clone(),
                pool: self.pool,
                name: self.name.clone(),
                holder: task_id,
                released: false,
            })),
            Ok(false) => Poll::Pending,
            Err(e) => Poll::Ready(Err(e)),
        }
    }
}

/// A held slot in a resource pool.
///
/// The slot is returned to the pool when the guard is dropped, so every exit
/// path of an entity's step releases what it acquired. Use
/// [`SlotGuard::release`] to release explicitly and observe the result.
#[derive(Debug)]
pub struct SlotGuard {
    sim: WeakSimWorld,
    pool: PoolId,
    name: String,
    holder: u64,
    released: bool,
}

impl SlotGuard {
    /// Returns the name of the pool this slot belongs to.
    pub fn pool_name(&self) -> &str {
        &self.name
    }

    /// Release the slot, handing it to the longest-waiting task if any.
    ///
    /// Fails with [`crate::SimulationError::ReleaseWithoutHold`] if the slot is no
    /// longer recorded as held, leaving the pool's counters untouched.
    pub fn release(mut self) -> SimulationResult<()> {
        self.released = true;
        self.sim.upgrade()?.release_slot(self.pool, self.holder)
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        // A dropped guard after the world is gone has nothing left to release.
        if let Ok(sim) = self.sim.upgrade() {
            if let Err(error) = sim.release_slot(self.pool, self.holder) {
                tracing::error!(pool = %self.name, %error, "slot release failed on drop");
            }
        }
    }
}
