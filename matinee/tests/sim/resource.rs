use matinee::{SimWorld, TimeProvider};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Create a single-threaded runtime with a `LocalSet` for `spawn_local` tests.
fn run_local<F: std::future::Future>(future: F) -> F::Output {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build runtime");
    tokio::task::LocalSet::new().block_on(&runtime, future)
}

/// Step all pending events, then yield so woken tasks run, until every
/// handle has finished.
async fn drive(sim: &mut SimWorld, handles: &[tokio::task::JoinHandle<()>]) {
    while handles.iter().any(|handle| !handle.is_finished()) {
        while sim.pending_event_count() > 0 {
            sim.step();
        }
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn acquire_is_synchronous_below_capacity() {
    let sim = SimWorld::new();
    let pool = sim.create_resource("cashier", 2).expect("create pool");

    // Both slots are free: acquisition completes without any event.
    let first = pool.acquire().await.expect("first slot");
    let second = pool.acquire().await.expect("second slot");

    assert_eq!(pool.in_use().unwrap(), 2);
    assert_eq!(pool.queue_len().unwrap(), 0);
    assert!(!sim.has_pending_events());

    first.release().expect("release");
    assert_eq!(pool.in_use().unwrap(), 1);

    // Dropping a guard releases too.
    drop(second);
    assert_eq!(pool.in_use().unwrap(), 0);
}

#[test]
fn contended_slot_is_granted_at_release_time() {
    run_local(async {
        let mut sim = SimWorld::new();
        let pool = sim.create_resource("cashier", 1).expect("create pool");
        let grants: Rc<RefCell<Vec<(&str, Duration)>>> = Rc::new(RefCell::new(Vec::new()));

        // First moviegoer takes the only slot at t=0 and holds it for 60s.
        let first = {
            let pool = pool.clone();
            let time = sim.time_provider();
            let grants = Rc::clone(&grants);
            tokio::task::spawn_local(async move {
                let slot = pool.acquire().await.expect("slot");
                grants.borrow_mut().push(("first", time.now()));
                time.sleep(Duration::from_secs(60)).await.expect("sleep");
                slot.release().expect("release");
            })
        };

        // Second arrives 12s later and must wait for the release.
        let second = {
            let pool = pool.clone();
            let time = sim.time_provider();
            let grants = Rc::clone(&grants);
            tokio::task::spawn_local(async move {
                time.sleep(Duration::from_secs(12)).await.expect("sleep");
                let slot = pool.acquire().await.expect("slot");
                grants.borrow_mut().push(("second", time.now()));
                slot.release().expect("release");
            })
        };

        drive(&mut sim, &[first, second]).await;

        assert_eq!(
            *grants.borrow(),
            vec![
                ("first", Duration::ZERO),
                ("second", Duration::from_secs(60)),
            ]
        );
    });
}

#[test]
fn waiters_are_granted_in_fifo_order() {
    run_local(async {
        let mut sim = SimWorld::new();
        let pool = sim.create_resource("usher", 1).expect("create pool");
        let grants: Rc<RefCell<Vec<(&str, Duration)>>> = Rc::new(RefCell::new(Vec::new()));

        let mut handles = Vec::new();
        for (name, arrival, hold) in [
            ("a", 0u64, 100u64),
            ("b", 10, 10),
            ("c", 20, 10),
            ("d", 30, 10),
        ] {
            let pool = pool.clone();
            let time = sim.time_provider();
            let grants = Rc::clone(&grants);
            handles.push(tokio::task::spawn_local(async move {
                if arrival > 0 {
                    time.sleep(Duration::from_secs(arrival)).await.expect("sleep");
                }
                let slot = pool.acquire().await.expect("slot");
                grants.borrow_mut().push((name, time.now()));
                time.sleep(Duration::from_secs(hold)).await.expect("sleep");
                slot.release().expect("release");
            }));
        }

        drive(&mut sim, &handles).await;

        // The slot is handed over strictly in arrival order, each grant at
        // the previous holder's release time.
        assert_eq!(
            *grants.borrow(),
            vec![
                ("a", Duration::ZERO),
                ("b", Duration::from_secs(100)),
                ("c", Duration::from_secs(110)),
                ("d", Duration::from_secs(120)),
            ]
        );
    });
}

#[test]
fn freed_slot_stays_reserved_for_the_head_waiter() {
    run_local(async {
        let mut sim = SimWorld::new();
        let pool = sim.create_resource("cashier", 1).expect("create pool");

        let holder = {
            let pool = pool.clone();
            let time = sim.time_provider();
            tokio::task::spawn_local(async move {
                let slot = pool.acquire().await.expect("slot");
                time.sleep(Duration::from_secs(30)).await.expect("sleep");
                slot.release().expect("release");
            })
        };
        let waiter = {
            let pool = pool.clone();
            let time = sim.time_provider();
            tokio::task::spawn_local(async move {
                time.sleep(Duration::from_secs(10)).await.expect("sleep");
                let slot = pool.acquire().await.expect("slot");
                time.sleep(Duration::from_secs(10)).await.expect("sleep");
                slot.release().expect("release");
            })
        };

        // Run until just past the release at t=30: between the release and
        // the waiter's resumption the slot is reserved, never free.
        tokio::task::yield_now().await;
        while sim.next_event_time().is_some_and(|due| due <= Duration::from_secs(30)) {
            sim.step();
            tokio::task::yield_now().await;
            assert!(pool.in_use().expect("in_use") <= 1);
        }

        drive(&mut sim, &[holder, waiter]).await;
        assert_eq!(pool.in_use().expect("in_use"), 0);
        assert_eq!(pool.queue_len().expect("queue_len"), 0);
    });
}
