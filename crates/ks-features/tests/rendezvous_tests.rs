//! Repeated rendezvous runs in both release modes

use ks_features::threading::{ThreadingFeature, WORKER_COUNT};
use ks_harness::{ReleaseMode, WorkerState};
use ks_test_utils::{fast_config_with_mode, logger_for};
use proptest::prelude::*;

fn assert_clean_run(mode: ReleaseMode) {
    let feature = ThreadingFeature::new(&fast_config_with_mode(mode));
    let (log, sink) = logger_for("Threading");

    let report = feature.rendezvous(&log).unwrap();

    assert!(report.all_stopped(), "{report:?}");
    assert_eq!(report.peak_running, WORKER_COUNT);
    assert_eq!(report.final_running, 0);
    assert!(report.broadcasts >= 1);
    for worker in &report.workers {
        assert_eq!(worker.history, WorkerState::ALL.to_vec());
    }

    let lines = sink.lines();
    let all_running = lines
        .iter()
        .position(|l| l.ends_with("All threads running!"))
        .unwrap();
    for worker in &report.workers {
        let ending = lines
            .iter()
            .position(|l| l.contains(&format!("Ending thread {}.", worker.label)))
            .unwrap();
        assert!(ending > all_running, "{} ended before release", worker.label);
    }
}

#[test]
fn test_broadcast_mode_survives_repeated_runs() {
    for _ in 0..20 {
        assert_clean_run(ReleaseMode::Broadcast);
    }
}

#[test]
fn test_predicate_mode_survives_repeated_runs() {
    for _ in 0..20 {
        assert_clean_run(ReleaseMode::Predicate);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_every_mode_releases_all_workers(predicate in any::<bool>()) {
        let mode = if predicate { ReleaseMode::Predicate } else { ReleaseMode::Broadcast };
        let feature = ThreadingFeature::new(&fast_config_with_mode(mode));
        let (log, _sink) = logger_for("Threading");

        let report = feature.rendezvous(&log).unwrap();

        prop_assert!(report.all_stopped());
        prop_assert_eq!(report.peak_running, WORKER_COUNT);
    }
}
