mod common;

use registry_core::model::{Experiment, Project, Status};
use registry_core::service::{
    search_experiments, search_projects, ExperimentField, ProjectField, SearchOptions, SortOrder,
    TimeWindow,
};
use registry_core::{RegistryError, Resource, ResourceNode, ResourceType, Store};

fn experiment(store: &Store, project: &Resource, id: &str, name: &str, created: i64) {
    common::add::<Experiment>(store, project, ResourceType::Experiment, |e| {
        e.experiment_id = id.to_string();
        e.experiment_name = Some(name.to_string());
        e.application_id = Some("echo".to_string());
        e.creation_time = created;
    });
}

fn set_state(store: &Store, project: &Resource, experiment_id: &str, state: &str, at: i64) {
    let experiment = project
        .get(store, ResourceType::Experiment, experiment_id)
        .unwrap();
    common::add::<Status>(store, &experiment, ResourceType::Status, |s| {
        s.status_id = format!("{experiment_id}-{at}");
        s.state = Some(state.to_string());
        s.status_update_time = at;
    });
}

fn ascending() -> SearchOptions {
    SearchOptions {
        order: SortOrder::Ascending,
        ..SearchOptions::default()
    }
}

fn ids(found: Vec<Resource>) -> Vec<String> {
    found.iter().map(Resource::key_string).collect()
}

fn seeded() -> (Store, common::Tree) {
    let store = common::store();
    let tree = common::seed(&store);
    for (id, name, created) in [
        ("e-100", "alpha 100%", 100),
        ("e-200", "alpha_beta", 200),
        ("e-300", "gamma", 300),
    ] {
        experiment(&store, &tree.project, id, name, created);
    }
    (store, tree)
}

#[test]
fn experiments_are_ordered_and_paged() {
    let (store, _tree) = seeded();
    let filters = [(ExperimentField::ApplicationId, "echo")];

    let newest_first = search_experiments(
        &store,
        "g1",
        "alice",
        &filters,
        None,
        &SearchOptions::default(),
    )
    .unwrap();
    assert_eq!(ids(newest_first), vec!["e-300", "e-200", "e-100"]);

    let page = search_experiments(
        &store,
        "g1",
        "alice",
        &filters,
        None,
        &SearchOptions {
            limit: Some(1),
            offset: 1,
            order: SortOrder::Ascending,
            ..SearchOptions::default()
        },
    )
    .unwrap();
    assert_eq!(ids(page), vec!["e-200"]);

    let empty = search_experiments(
        &store,
        "g1",
        "alice",
        &filters,
        None,
        &SearchOptions {
            limit: Some(0),
            ..SearchOptions::default()
        },
    )
    .unwrap();
    assert!(empty.is_empty());
}

#[test]
fn text_filters_treat_wildcards_literally() {
    let (store, _tree) = seeded();
    let options = ascending();

    let underscore =
        search_experiments(&store, "g1", "alice", &[(ExperimentField::Name, "a_b")], None, &options)
            .unwrap();
    assert_eq!(ids(underscore), vec!["e-200"]);

    let percent =
        search_experiments(&store, "g1", "alice", &[(ExperimentField::Name, "0%")], None, &options)
            .unwrap();
    assert_eq!(ids(percent), vec!["e-100"]);

    let prefix =
        search_experiments(&store, "g1", "alice", &[(ExperimentField::Name, "ALPHA")], None, &options)
            .unwrap();
    assert_eq!(ids(prefix), vec!["e-100", "e-200"]);
}

#[test]
fn creation_window_bounds_are_exclusive() {
    let (store, _tree) = seeded();
    let filters = [(ExperimentField::ApplicationId, "echo")];

    let found = search_experiments(
        &store,
        "g1",
        "alice",
        &filters,
        Some(TimeWindow {
            from_ms: 100,
            to_ms: 300,
        }),
        &ascending(),
    )
    .unwrap();
    assert_eq!(ids(found), vec!["e-200"]);
}

#[test]
fn inverted_creation_window_is_ignored() {
    let (store, _tree) = seeded();
    let filters = [(ExperimentField::ApplicationId, "echo")];

    for to_ms in [100, 300] {
        let found = search_experiments(
            &store,
            "g1",
            "alice",
            &filters,
            Some(TimeWindow { from_ms: 300, to_ms }),
            &ascending(),
        )
        .unwrap();
        assert_eq!(ids(found), vec!["e-100", "e-200", "e-300"], "window 300..{to_ms}");
    }
}

#[test]
fn state_filter_follows_the_latest_experiment_status() {
    let (store, tree) = seeded();
    set_state(&store, &tree.project, "e-100", "CREATED", 10);
    set_state(&store, &tree.project, "e-100", "EXECUTING", 20);
    set_state(&store, &tree.project, "e-200", "EXECUTING", 10);
    set_state(&store, &tree.project, "e-200", "COMPLETED", 30);

    let executing = search_experiments(
        &store,
        "g1",
        "alice",
        &[(ExperimentField::State, "executing")],
        None,
        &ascending(),
    )
    .unwrap();
    assert_eq!(ids(executing), vec!["e-100"]);

    let completed = search_experiments(
        &store,
        "g1",
        "alice",
        &[(ExperimentField::State, "COMPLETED"), (ExperimentField::Name, "beta")],
        None,
        &ascending(),
    )
    .unwrap();
    assert_eq!(ids(completed), vec!["e-200"]);

    let err = search_experiments(
        &store,
        "g1",
        "alice",
        &[(ExperimentField::State, "RUNNING")],
        None,
        &ascending(),
    )
    .unwrap_err();
    assert!(matches!(err, RegistryError::Validation(_)));
}

#[test]
fn accessible_ids_restrict_results() {
    let (store, _tree) = seeded();
    let filters = [(ExperimentField::ApplicationId, "echo")];

    let visible = search_experiments(
        &store,
        "g1",
        "alice",
        &filters,
        None,
        &SearchOptions {
            accessible_ids: Some(
                ["e-300", "e-100", "missing"]
                    .map(str::to_string)
                    .to_vec(),
            ),
            ..ascending()
        },
    )
    .unwrap();
    assert_eq!(ids(visible), vec!["e-100", "e-300"]);

    let none = search_experiments(
        &store,
        "g1",
        "alice",
        &filters,
        None,
        &SearchOptions {
            accessible_ids: Some(Vec::new()),
            ..ascending()
        },
    )
    .unwrap();
    assert!(none.is_empty());

    let projects = search_projects(
        &store,
        "g1",
        "alice",
        &[],
        &SearchOptions {
            accessible_ids: Some(vec!["p2".to_string()]),
            ..SearchOptions::default()
        },
    )
    .unwrap();
    assert!(projects.is_empty());
}

#[test]
fn searches_are_scoped_to_gateway_and_user() {
    let (store, _tree) = seeded();

    let other_user = search_experiments(
        &store,
        "g1",
        "bob",
        &[],
        None,
        &SearchOptions::default(),
    )
    .unwrap();
    assert!(other_user.is_empty());

    let other_gateway =
        search_projects(&store, "g2", "alice", &[], &SearchOptions::default()).unwrap();
    assert!(other_gateway.is_empty());
}

#[test]
fn projects_match_ids_exactly_and_names_by_substring() {
    let (store, tree) = seeded();
    common::add::<Project>(&store, &tree.worker, ResourceType::Project, |p| {
        p.project_id = "p10".to_string();
        p.project_name = Some("Protein folding".to_string());
    });

    let by_id = search_projects(
        &store,
        "g1",
        "alice",
        &[(ProjectField::ProjectId, "p1")],
        &SearchOptions::default(),
    )
    .unwrap();
    assert_eq!(ids(by_id), vec!["p1"]);

    let by_name = search_projects(
        &store,
        "g1",
        "alice",
        &[(ProjectField::ProjectName, "prot"), (ProjectField::Description, " ")],
        &SearchOptions::default(),
    )
    .unwrap();
    assert_eq!(by_name.len(), 2);
    assert!(by_name
        .iter()
        .all(|project| project.ancestor(ResourceType::GatewayWorker).is_some()));
}
