use odbdp_algorithms::genetic::BestTracker;
use odbdp_challenge::{Candidate, Instance, INFEASIBLE};
use std::sync::Mutex;
use std::thread;

/// One query, and configuration `c` gains `c` on it at no cost.
fn ladder(num_configs: usize) -> Instance {
    Instance::new(
        1,
        1,
        num_configs,
        10,
        vec![vec![true]; num_configs],
        vec![0],
        vec![1],
        (0..num_configs).map(|c| vec![c as u64]).collect(),
    )
    .unwrap()
}

fn candidate(instance: &Instance, config: usize) -> Candidate {
    let mut c = Candidate::from_assignment(vec![Some(config)]);
    c.evaluate(instance);
    c
}

#[test]
fn test_empty_tracker() {
    let tracker = BestTracker::new(None);
    assert_eq!(tracker.objective(), INFEASIBLE);
    assert!(tracker.into_best().is_none());
}

#[test]
fn test_only_strict_improvements_are_kept() {
    let instance = ladder(10);
    let saved = Mutex::new(Vec::new());
    let save = |c: &Candidate| -> anyhow::Result<()> {
        saved.lock().unwrap().push(c.objective_value());
        Ok(())
    };
    let tracker = BestTracker::new(Some(&save));

    assert!(tracker.try_update(&candidate(&instance, 5)));
    assert!(!tracker.try_update(&candidate(&instance, 5)));
    assert!(!tracker.try_update(&candidate(&instance, 3)));
    assert!(tracker.try_update(&candidate(&instance, 7)));
    assert_eq!(tracker.objective(), 7);
    assert_eq!(*saved.lock().unwrap(), vec![5, 7]);
}

#[test]
fn test_infeasible_is_rejected() {
    let mut instance = ladder(3);
    instance.memory_budget = 1;
    let tracker = BestTracker::new(None);
    let c = candidate(&instance, 2);
    assert!(!c.is_feasible());
    assert!(!tracker.try_update(&c));
    assert_eq!(tracker.objective(), INFEASIBLE);
    assert!(tracker.into_best().is_none());
}

#[test]
fn test_save_failure_keeps_best() {
    let instance = ladder(3);
    let save = |_: &Candidate| -> anyhow::Result<()> { Err(anyhow::anyhow!("disk full")) };
    let tracker = BestTracker::new(Some(&save));
    assert!(tracker.try_update(&candidate(&instance, 2)));
    assert_eq!(tracker.objective(), 2);
}

#[test]
fn test_concurrent_updates_are_monotonic() {
    let instance = ladder(400);
    let saved = Mutex::new(Vec::new());
    let save = |c: &Candidate| -> anyhow::Result<()> {
        saved.lock().unwrap().push(c.objective_value());
        Ok(())
    };
    let tracker = BestTracker::new(Some(&save));

    thread::scope(|s| {
        for t in 0..4 {
            let tracker = &tracker;
            let instance = &instance;
            s.spawn(move || {
                for i in 0..100 {
                    let config = (i * 4 + t) * 7 % 400;
                    tracker.try_update(&candidate(instance, config));
                }
            });
        }
    });

    assert_eq!(tracker.into_best().map(|c| c.objective_value()), Some(399));
    let saved = saved.into_inner().unwrap();
    assert!(saved.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(saved.last().copied(), Some(399));
}
