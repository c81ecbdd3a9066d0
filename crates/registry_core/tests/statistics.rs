mod common;

use registry_core::model::{Experiment, Status};
use registry_core::service::{ExperimentStatistics, StatisticsFilter, TimeWindow};
use registry_core::{RegistryService, Resource, ResourceType, Store};

fn experiment(store: &Store, project: &Resource, id: &str, app: &str, created: i64) -> Resource {
    common::add::<Experiment>(store, project, ResourceType::Experiment, |e| {
        e.experiment_id = id.to_string();
        e.application_id = Some(app.to_string());
        e.creation_time = created;
    })
}

fn status(store: &Store, experiment: &Resource, state: &str, at: i64) {
    common::add::<Status>(store, experiment, ResourceType::Status, |s| {
        s.status_id = format!("{}-{at}", experiment.key_string());
        s.state = Some(state.to_string());
        s.status_update_time = at;
    });
}

/// Experiments created at 100..=900 with one history each; `e-900` sits on
/// the window's upper bound and `e-0` has no status at all.
fn seeded() -> (RegistryService, common::Tree) {
    let store = common::store();
    let tree = common::seed(&store);
    let histories: [(&str, &str, i64, &[&str]); 9] = [
        ("e-100", "echo", 100, &["CREATED"]),
        ("e-200", "echo", 200, &["CREATED", "VALIDATED"]),
        ("e-300", "echo", 300, &["CREATED", "LAUNCHED", "EXECUTING"]),
        ("e-400", "gromacs", 400, &["SCHEDULED"]),
        ("e-500", "gromacs", 500, &["EXECUTING", "COMPLETED"]),
        ("e-600", "echo", 600, &["EXECUTING", "FAILED"]),
        ("e-700", "echo", 700, &["CANCELING"]),
        ("e-800", "echo", 800, &["CANCELING", "CANCELED", "SUSPENDED"]),
        ("e-900", "echo", 900, &["COMPLETED"]),
    ];
    for (id, app, created, states) in histories {
        let experiment = experiment(&store, &tree.project, id, app, created);
        for (step, state) in states.iter().enumerate() {
            status(&store, &experiment, state, created + step as i64);
        }
    }
    experiment(&store, &tree.project, "e-0", "echo", 50);
    (RegistryService::new(store), tree)
}

fn window() -> TimeWindow {
    TimeWindow {
        from_ms: 10,
        to_ms: 900,
    }
}

#[test]
fn latest_states_are_counted_per_bucket() {
    let (service, _tree) = seeded();

    let statistics = service
        .experiment_statistics("g1", window(), StatisticsFilter::default())
        .unwrap();
    assert_eq!(
        statistics,
        ExperimentStatistics {
            all: 9,
            created: 2,
            running: 2,
            completed: 1,
            failed: 1,
            cancelled: 1,
        }
    );
}

#[test]
fn user_and_application_narrow_the_counts() {
    let (service, _tree) = seeded();

    let gromacs = service
        .experiment_statistics(
            "g1",
            window(),
            StatisticsFilter {
                application_id: Some("groma"),
                ..StatisticsFilter::default()
            },
        )
        .unwrap();
    assert_eq!(gromacs.all, 2);
    assert_eq!(gromacs.running, 1);
    assert_eq!(gromacs.completed, 1);

    let bob = service
        .experiment_statistics(
            "g1",
            window(),
            StatisticsFilter {
                user_name: Some("bob"),
                ..StatisticsFilter::default()
            },
        )
        .unwrap();
    assert_eq!(bob, ExperimentStatistics::default());
}

#[test]
fn window_and_gateway_bound_the_population() {
    let (service, _tree) = seeded();

    let narrow = service
        .experiment_statistics(
            "g1",
            TimeWindow {
                from_ms: 100,
                to_ms: 300,
            },
            StatisticsFilter::default(),
        )
        .unwrap();
    assert_eq!(narrow.all, 1);
    assert_eq!(narrow.created, 1);

    let inverted = service
        .experiment_statistics(
            "g1",
            TimeWindow {
                from_ms: 900,
                to_ms: 10,
            },
            StatisticsFilter::default(),
        )
        .unwrap();
    assert_eq!(inverted.all, 0);

    let other_gateway = service
        .experiment_statistics("g2", window(), StatisticsFilter::default())
        .unwrap();
    assert_eq!(other_gateway.all, 0);
}
