//! Thread-local random number generation for simulation.
//!
//! This module provides deterministic randomness through thread-local storage,
//! enabling clean API design without passing RNG state through the simulation.
//! Each thread maintains its own RNG state, ensuring deterministic behavior
//! within each simulation run while supporting parallel test execution.

use rand::SeedableRng;
use rand::{
    Rng,
    distr::{Distribution, StandardUniform, uniform::SampleUniform},
};
use rand_chacha::ChaCha8Rng;
use std::cell::RefCell;

thread_local! {
    /// Thread-local random number generator for simulation.
    ///
    /// Uses ChaCha8Rng for deterministic, reproducible randomness.
    /// Each thread maintains independent state for parallel test execution.
    static SIM_RNG: RefCell<ChaCha8Rng> = RefCell::new(ChaCha8Rng::seed_from_u64(0));

    /// Thread-local storage for the current simulation seed.
    static CURRENT_SEED: RefCell<u64> = const { RefCell::new(0) };
}

/// Generate a random value using the thread-local simulation RNG.
///
/// The same seed set via [`set_sim_seed`] always produces the same sequence
/// of values within a single thread.
pub fn sim_random<T>() -> T
where
    StandardUniform: Distribution<T>,
{
    SIM_RNG.with(|rng| rng.borrow_mut().sample(StandardUniform))
}

/// Generate a random value within a range using the thread-local simulation RNG.
///
/// The range is exclusive of the upper bound (`start..end`).
pub fn sim_random_range<T>(range: std::ops::Range<T>) -> T
where
    T: SampleUniform + PartialOrd,
{
    SIM_RNG.with(|rng| rng.borrow_mut().random_range(range))
}

/// Generate a random bool with the given probability of being `true`.
pub fn sim_random_bool(probability: f64) -> bool {
    debug_assert!(
        (0.0..=1.0).contains(&probability),
        "Probability must be between 0.0 and 1.0, got {}",
        probability
    );
    sim_random::<f64>() < probability
}

/// Set the seed of the thread-local simulation RNG.
///
/// All subsequent values from [`sim_random`] and [`sim_random_range`] on this
/// thread are determined by this seed.
pub fn set_sim_seed(seed: u64) {
    SIM_RNG.with(|rng| *rng.borrow_mut() = ChaCha8Rng::seed_from_u64(seed));
    CURRENT_SEED.with(|current| *current.borrow_mut() = seed);
}

/// Reset the thread-local simulation RNG to its default state (seed 0).
///
/// Call before seeding when running consecutive simulations on the same
/// thread, so leftover state from a previous run cannot leak into the next.
pub fn reset_sim_rng() {
    set_sim_seed(0);
}

/// Returns the seed most recently set via [`set_sim_seed`].
///
/// Useful for reporting which seed produced a failing run.
pub fn get_current_sim_seed() -> u64 {
    CURRENT_SEED.with(|current| *current.borrow())
}
