//! Core simulation world and coordination logic.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::{Rc, Weak},
    task::Waker,
    time::Duration,
};
use tracing::instrument;

use crate::{
    error::{SimulationError, SimulationResult},
    events::{Event, EventQueue, ScheduledEvent},
    resource::{PoolId, PoolState, ResourcePool},
    rng::{reset_sim_rng, set_sim_seed},
    sleep::SleepFuture,
};

#[derive(Debug)]
struct SimInner {
    current_time: Duration,
    event_queue: EventQueue,
    next_sequence: u64,

    // Resource pool management
    pools: HashMap<PoolId, PoolState>,
    next_pool_id: u64,

    // Async coordination
    task_wakers: HashMap<u64, Waker>,
    awakened_tasks: HashSet<u64>,
    next_task_id: u64,

    // Event processing metrics
    events_processed: u64,
}

impl SimInner {
    fn new() -> Self {
        Self {
            current_time: Duration::ZERO,
            event_queue: EventQueue::new(),
            next_sequence: 0,
            pools: HashMap::new(),
            next_pool_id: 0,
            task_wakers: HashMap::new(),
            awakened_tasks: HashSet::new(),
            next_task_id: 0,
            events_processed: 0,
        }
    }

    fn pool(&self, id: PoolId) -> SimulationResult<&PoolState> {
        self.pools
            .get(&id)
            .ok_or_else(|| SimulationError::InvalidState(format!("unknown pool id {:?}", id)))
    }

    fn pool_mut(&mut self, id: PoolId) -> SimulationResult<&mut PoolState> {
        self.pools
            .get_mut(&id)
            .ok_or_else(|| SimulationError::InvalidState(format!("unknown pool id {:?}", id)))
    }
}

/// The central simulation coordinator that manages time and event processing.
///
/// `SimWorld` owns all mutable simulation state and provides the main interface
/// for scheduling events and advancing simulation time. It uses a centralized
/// ownership model with handle-based access to avoid borrow checker conflicts:
/// futures and pool handles hold a [`WeakSimWorld`] and upgrade per operation.
#[derive(Debug)]
pub struct SimWorld {
    inner: Rc<RefCell<SimInner>>,
}

impl SimWorld {
    /// Creates a new simulation world.
    ///
    /// Uses default seed (0) for reproducible behavior. For custom seeds,
    /// use [`SimWorld::new_with_seed`].
    pub fn new() -> Self {
        Self::new_with_seed(0)
    }

    /// Creates a new simulation world with a specific seed for deterministic randomness.
    ///
    /// This method resets the thread-local RNG state before setting the seed,
    /// making it safe for consecutive simulations on the same thread.
    pub fn new_with_seed(seed: u64) -> Self {
        reset_sim_rng();
        set_sim_seed(seed);

        Self {
            inner: Rc::new(RefCell::new(SimInner::new())),
        }
    }

    /// Processes the next scheduled event and advances time.
    ///
    /// Returns `true` if more events are available for processing,
    /// `false` if this was the last event or if no events are available.
    #[instrument(skip(self))]
    pub fn step(&mut self) -> bool {
        let mut inner = self.inner.borrow_mut();

        if let Some(scheduled_event) = inner.event_queue.pop_earliest() {
            // Advance logical time to event timestamp
            inner.current_time = scheduled_event.time();

            Self::process_event_with_inner(&mut inner, scheduled_event.into_event());

            !inner.event_queue.is_empty()
        } else {
            false
        }
    }

    /// Processes events until the queue is empty.
    pub fn run_until_empty(&mut self) {
        while self.step() {}
    }

    /// Processes events while the earliest due time is at or before `horizon`.
    ///
    /// Once the next event is due after the horizon (or the queue is empty)
    /// the loop stops. Remaining events stay queued and the tasks waiting on
    /// them are simply never resumed again.
    pub fn run_until(&mut self, horizon: Duration) {
        while self
            .next_event_time()
            .is_some_and(|due| due <= horizon)
        {
            self.step();
        }
    }

    /// Returns the current simulation time.
    pub fn current_time(&self) -> Duration {
        self.inner.borrow().current_time
    }

    /// Returns the due time of the earliest scheduled event, if any.
    pub fn next_event_time(&self) -> Option<Duration> {
        self.inner
            .borrow()
            .event_queue
            .peek_earliest()
            .map(|scheduled| scheduled.time())
    }

    /// Schedules an event to execute after the specified delay from the current time.
    #[instrument(skip(self))]
    pub fn schedule_event(&self, event: Event, delay: Duration) {
        let mut inner = self.inner.borrow_mut();
        let scheduled_time = inner.current_time + delay;
        let sequence = inner.next_sequence;
        inner.next_sequence += 1;

        let scheduled_event = ScheduledEvent::new(scheduled_time, event, sequence);
        inner.event_queue.schedule(scheduled_event);
    }

    /// Schedules an event to execute at the specified absolute time.
    pub fn schedule_event_at(&self, event: Event, time: Duration) {
        let mut inner = self.inner.borrow_mut();
        let sequence = inner.next_sequence;
        inner.next_sequence += 1;

        let scheduled_event = ScheduledEvent::new(time, event, sequence);
        inner.event_queue.schedule(scheduled_event);
    }

    /// Creates a weak reference to this simulation world.
    ///
    /// Weak references can be used to access the simulation without preventing
    /// it from being dropped, enabling handle-based access patterns.
    pub fn downgrade(&self) -> WeakSimWorld {
        WeakSimWorld {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Returns `true` if there are events waiting to be processed.
    pub fn has_pending_events(&self) -> bool {
        !self.inner.borrow().event_queue.is_empty()
    }

    /// Returns the number of events waiting to be processed.
    pub fn pending_event_count(&self) -> usize {
        self.inner.borrow().event_queue.len()
    }

    /// Returns the number of events processed so far.
    pub fn events_processed(&self) -> u64 {
        self.inner.borrow().events_processed
    }

    /// Create a time provider for this simulation.
    pub fn time_provider(&self) -> crate::time::SimTimeProvider {
        crate::time::SimTimeProvider::new(self.downgrade())
    }

    /// Registers a finite-capacity resource pool with FIFO waiters.
    ///
    /// Fails with [`SimulationError::InvalidCapacity`] when `capacity` is 0.
    pub fn create_resource(
        &self,
        name: impl Into<String>,
        capacity: usize,
    ) -> SimulationResult<ResourcePool> {
        let name = name.into();
        if capacity == 0 {
            return Err(SimulationError::InvalidCapacity {
                pool: name,
                value: capacity,
            });
        }

        let mut inner = self.inner.borrow_mut();
        let id = PoolId(inner.next_pool_id);
        inner.next_pool_id += 1;
        inner.pools.insert(id, PoolState::new(name.clone(), capacity));

        Ok(ResourcePool::new(self.downgrade(), id, name))
    }

    /// Sleep for the specified duration in simulation time.
    ///
    /// Returns a future that will complete when the simulation time has
    /// advanced by the specified duration. This integrates with the event
    /// system by scheduling a Timer event and coordinating with the runtime.
    #[instrument(skip(self))]
    pub fn sleep(&self, duration: Duration) -> SleepFuture {
        let task_id = self.generate_task_id();

        // Schedule a wake event for this task
        self.schedule_event(Event::Timer { task_id }, duration);

        // Return a future that will be woken when the event is processed
        SleepFuture::new(self.downgrade(), task_id)
    }

    /// Generate a unique task ID for suspension points.
    pub(crate) fn generate_task_id(&self) -> u64 {
        let mut inner = self.inner.borrow_mut();
        let task_id = inner.next_task_id;
        inner.next_task_id += 1;
        task_id
    }

    /// Check if a task has been awakened.
    ///
    /// This is used internally by SleepFuture to determine if its corresponding
    /// Timer event has been processed.
    pub(crate) fn is_task_awake(&self, task_id: u64) -> bool {
        self.inner.borrow().awakened_tasks.contains(&task_id)
    }

    /// Register a waker for a task.
    ///
    /// This is used internally by suspended futures to register a waker that
    /// should be called when the task's wake event is processed.
    pub(crate) fn register_task_waker(&self, task_id: u64, waker: Waker) {
        let mut inner = self.inner.borrow_mut();
        inner.task_wakers.insert(task_id, waker);
    }

    /// Attempt to acquire a slot, enrolling the task as a FIFO waiter on contention.
    ///
    /// Returns `Ok(true)` when the task holds a slot after this call. A task
    /// that was granted a slot by a release resumes through here on its next
    /// poll. `Ok(false)` means the task is queued and its waker registered.
    pub(crate) fn poll_acquire(
        &self,
        pool_id: PoolId,
        task_id: u64,
        waker: &Waker,
    ) -> SimulationResult<bool> {
        let mut inner = self.inner.borrow_mut();
        let pool = inner.pool_mut(pool_id)?;

        // Slot reserved for us by a release while we were queued.
        if pool.granted.remove(&task_id) {
            pool.holders.insert(task_id);
            return Ok(true);
        }

        if !pool.wait_queue.contains(&task_id) {
            if pool.in_use < pool.capacity {
                // Free slot: acquire synchronously, no suspension.
                pool.in_use += 1;
                pool.holders.insert(task_id);
                return Ok(true);
            }
            pool.wait_queue.push_back(task_id);
        }

        inner.task_wakers.insert(task_id, waker.clone());
        Ok(false)
    }

    /// Release a held slot, handing it to the longest-waiting task if any.
    ///
    /// The hand-off is scheduled as a `SlotGranted` event at the current
    /// simulation time (zero delay), so resumption order stays under the
    /// event queue's deterministic tie-breaking. The freed slot is reserved
    /// for the waiter immediately, keeping `in_use <= capacity` observable
    /// at every step.
    pub(crate) fn release_slot(&self, pool_id: PoolId, task_id: u64) -> SimulationResult<()> {
        let mut inner = self.inner.borrow_mut();

        let next = {
            let pool = inner.pool_mut(pool_id)?;
            if !pool.holders.remove(&task_id) {
                return Err(SimulationError::ReleaseWithoutHold {
                    pool: pool.name.clone(),
                });
            }
            pool.in_use -= 1;

            pool.wait_queue.pop_front().map(|waiter| {
                pool.in_use += 1;
                pool.granted.insert(waiter);
                waiter
            })
        };

        if let Some(waiter) = next {
            // Schedule directly on the queue: `inner` is already borrowed.
            let time = inner.current_time;
            let sequence = inner.next_sequence;
            inner.next_sequence += 1;
            inner.event_queue.schedule(ScheduledEvent::new(
                time,
                Event::SlotGranted {
                    pool: pool_id,
                    task_id: waiter,
                },
                sequence,
            ));
        }

        Ok(())
    }

    pub(crate) fn pool_capacity(&self, pool_id: PoolId) -> SimulationResult<usize> {
        Ok(self.inner.borrow().pool(pool_id)?.capacity)
    }

    pub(crate) fn pool_in_use(&self, pool_id: PoolId) -> SimulationResult<usize> {
        Ok(self.inner.borrow().pool(pool_id)?.in_use)
    }

    pub(crate) fn pool_queue_len(&self, pool_id: PoolId) -> SimulationResult<usize> {
        Ok(self.inner.borrow().pool(pool_id)?.wait_queue.len())
    }

    /// Static event processor for simulation events.
    ///
    /// Implemented as a static method to avoid borrowing conflicts when event
    /// processing needs to modify simulation state.
    fn process_event_with_inner(inner: &mut SimInner, event: Event) {
        inner.events_processed += 1;

        match event {
            Event::Timer { task_id } => {
                // Mark this task as awakened
                inner.awakened_tasks.insert(task_id);

                // Wake the future that was sleeping
                if let Some(waker) = inner.task_wakers.remove(&task_id) {
                    waker.wake();
                }
            }
            Event::SlotGranted { pool: _, task_id } => {
                // The slot was reserved at release time; resuming the waiter
                // is all that is left to do. An absent waker means the task
                // was abandoned at the horizon.
                if let Some(waker) = inner.task_wakers.remove(&task_id) {
                    waker.wake();
                }
            }
        }
    }
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak reference to a [`SimWorld`].
///
/// Futures and pool handles hold weak references so they do not keep the
/// simulation alive; operations on a dropped world fail with
/// [`SimulationError::SimulationShutdown`].
#[derive(Debug)]
pub struct WeakSimWorld {
    inner: Weak<RefCell<SimInner>>,
}

impl WeakSimWorld {
    /// Attempts to upgrade this weak reference to a strong reference.
    ///
    /// Returns `Err(SimulationError::SimulationShutdown)` if the simulation
    /// has been dropped.
    pub fn upgrade(&self) -> SimulationResult<SimWorld> {
        self.inner
            .upgrade()
            .map(|inner| SimWorld { inner })
            .ok_or(SimulationError::SimulationShutdown)
    }

    /// Returns the current simulation time.
    ///
    /// Returns `Err(SimulationError::SimulationShutdown)` if the simulation
    /// has been dropped.
    pub fn current_time(&self) -> SimulationResult<Duration> {
        let sim = self.upgrade()?;
        Ok(sim.current_time())
    }

    /// Schedules an event to execute after the specified delay from the current time.
    ///
    /// Returns `Err(SimulationError::SimulationShutdown)` if the simulation
    /// has been dropped.
    pub fn schedule_event(&self, event: Event, delay: Duration) -> SimulationResult<()> {
        let sim = self.upgrade()?;
        sim.schedule_event(event, delay);
        Ok(())
    }

    /// Sleep for the specified duration in simulation time.
    ///
    /// Returns `Err(SimulationError::SimulationShutdown)` if the simulation
    /// has been dropped.
    pub fn sleep(&self, duration: Duration) -> SimulationResult<SleepFuture> {
        let sim = self.upgrade()?;
        Ok(sim.sleep(duration))
    }
}

impl Clone for WeakSimWorld {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
