use matinee::{TheaterConfig, TheaterSimulation};
use std::time::Duration;

/// Create a single-threaded runtime with a `LocalSet` for `spawn_local` tests.
fn run_local<F: std::future::Future>(future: F) -> F::Output {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build runtime");
    tokio::task::LocalSet::new().block_on(&runtime, future)
}

fn run_records(seed: u64) -> Vec<Duration> {
    run_local(async move {
        let config = TheaterConfig::new(2, 1, 3).expect("config");
        TheaterSimulation::new(config)
            .horizon(Duration::from_secs(120 * 60))
            .seed(seed)
            .run()
            .await
            .expect("run")
            .snapshot()
    })
}

#[test]
fn same_seed_same_records() {
    let seed = 12345;
    let first = run_records(seed);
    let second = run_records(seed);

    assert!(!first.is_empty());
    assert_eq!(
        first, second,
        "identical seeds must replay identical sojourn sequences"
    );
}

#[test]
fn different_seeds_diverge() {
    // Two hours of arrivals make hundreds of independent draws; distinct
    // seeds producing identical sequences would mean the seed is ignored.
    let first = run_records(1);
    let second = run_records(2);

    assert_ne!(first, second);
}
