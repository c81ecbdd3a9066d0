mod common;

use registry_core::db::DbError;
use registry_core::model::{
    ComputationalResourceScheduling, Experiment, ExperimentInput, GatewayWorker, JobDetail, Project,
    Status, StatusType,
};
use registry_core::{RegistryError, Resource, ResourceNode, ResourceType, Store};

#[test]
fn project_saved_twice_keeps_one_row_with_latest_name() {
    let store = common::store();
    let tree = common::seed(&store);

    let mut project = tree.worker.create(ResourceType::Project).unwrap();
    {
        let entity = project.entity_mut::<Project>().unwrap();
        entity.project_id = "p2".to_string();
        entity.project_name = Some("Genomics".to_string());
    }
    project.save(&store).unwrap();

    project.entity_mut::<Project>().unwrap().project_name = Some("Genomics v2".to_string());
    project.save(&store).unwrap();

    let loaded = tree.worker.get(&store, ResourceType::Project, "p2").unwrap();
    assert_eq!(
        loaded.entity::<Project>().unwrap().project_name.as_deref(),
        Some("Genomics v2")
    );

    let ids: Vec<String> = tree
        .worker
        .list(&store, ResourceType::Project)
        .unwrap()
        .into_iter()
        .map(|resource| resource.into_entity::<Project>().unwrap().project_id)
        .collect();
    assert_eq!(ids.iter().filter(|id| id.as_str() == "p2").count(), 1);
    assert_eq!(ids.len(), 2);
}

#[test]
fn deleting_missing_status_under_task_succeeds() {
    let store = common::store();
    let tree = common::seed(&store);

    tree.task
        .delete(&store, ResourceType::Status, "nonexistent-id")
        .unwrap();
    assert!(tree
        .task
        .list(&store, ResourceType::Status)
        .unwrap()
        .is_empty());
}

#[test]
fn get_requires_exactly_one_row() {
    let store = common::store();
    let tree = common::seed(&store);

    let err = tree
        .experiment
        .get(&store, ResourceType::ExperimentInput, "missing")
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::NotFound {
            kind: ResourceType::ExperimentInput,
            ref key,
        } if key == "missing"
    ));

    for host in ["hpc-a", "hpc-b"] {
        let mut scheduling = tree
            .experiment
            .create(ResourceType::ComputationalResourceScheduling)
            .unwrap();
        scheduling
            .entity_mut::<ComputationalResourceScheduling>()
            .unwrap()
            .resource_host_id = Some(host.to_string());
        scheduling.save(&store).unwrap();
    }

    let err = tree
        .experiment
        .get(&store, ResourceType::ComputationalResourceScheduling, "")
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::AmbiguousResult { matches: 2, .. }
    ));
}

#[test]
fn list_is_scoped_to_parent_and_empty_when_none() {
    let store = common::store();
    let tree = common::seed(&store);

    let other = common::add::<Experiment>(&store, &tree.project, ResourceType::Experiment, |e| {
        e.experiment_id = "e2".to_string();
    });
    for key in ["alpha", "beta"] {
        common::add::<ExperimentInput>(&store, &tree.experiment, ResourceType::ExperimentInput, |i| {
            i.input.input_key = key.to_string();
        });
    }
    common::add::<ExperimentInput>(&store, &other, ResourceType::ExperimentInput, |i| {
        i.input.input_key = "gamma".to_string();
    });

    let keys: Vec<String> = tree
        .experiment
        .list(&store, ResourceType::ExperimentInput)
        .unwrap()
        .into_iter()
        .map(|resource| resource.into_entity::<ExperimentInput>().unwrap().input.input_key)
        .collect();
    assert_eq!(keys, vec!["alpha".to_string(), "beta".to_string()]);

    assert!(tree
        .experiment
        .list(&store, ResourceType::ExperimentOutput)
        .unwrap()
        .is_empty());
}

#[test]
fn exists_tracks_save_and_delete() {
    let store = common::store();
    let tree = common::seed(&store);

    assert!(tree.gateway.exists(&store, ResourceType::Project, "p1"));
    assert!(!tree.gateway.exists(&store, ResourceType::Project, "p9"));
    assert!(!tree
        .gateway
        .try_exists(&store, ResourceType::Project, "p9")
        .unwrap());

    tree.worker
        .delete(&store, ResourceType::Project, "p1")
        .unwrap();
    assert!(!tree.gateway.exists(&store, ResourceType::Project, "p1"));
    // Cascading keys removed the experiment below the project.
    assert!(!tree.gateway.exists(&store, ResourceType::Experiment, "e1"));
}

#[test]
fn exists_hides_storage_failures_but_try_exists_reports_them() {
    let store = common::store();
    let tree = common::seed(&store);

    store.cancel_token().cancel();
    assert!(!tree.gateway.exists(&store, ResourceType::Project, "p1"));
    let err = tree
        .gateway
        .try_exists(&store, ResourceType::Project, "p1")
        .unwrap_err();
    assert!(matches!(err, RegistryError::Storage(DbError::Cancelled)));

    store.cancel_token().reset();
    assert!(tree.gateway.exists(&store, ResourceType::Project, "p1"));
}

#[test]
fn job_status_children_span_job_and_application_types() {
    let store = common::store();
    let tree = common::seed(&store);

    let job_status = common::add::<Status>(&store, &tree.job, ResourceType::Status, |s| {
        s.state = Some("QUEUED".to_string());
        s.status_update_time = 10;
    });
    assert_eq!(
        job_status.entity::<Status>().unwrap().status_type,
        StatusType::Job
    );
    common::add::<Status>(&store, &tree.job, ResourceType::Status, |s| {
        s.status_type = StatusType::Application;
        s.state = Some("LAUNCHED".to_string());
        s.status_update_time = 20;
    });

    assert_eq!(tree.job.list(&store, ResourceType::Status).unwrap().len(), 2);

    let own = tree.job.own_status(&store).unwrap().unwrap();
    assert_eq!(own.entity::<Status>().unwrap().state.as_deref(), Some("QUEUED"));
    assert!(matches!(
        tree.project.own_status(&store),
        Err(RegistryError::UnsupportedType { .. })
    ));
}

#[test]
fn materialized_children_carry_their_parent_chain() {
    let store = common::store();
    let tree = common::seed(&store);

    let job = tree.task.get(&store, ResourceType::JobDetail, "j1").unwrap();
    assert_eq!(job.entity::<JobDetail>().unwrap().task_id, "t1");

    let worker = job.ancestor(ResourceType::GatewayWorker).unwrap();
    assert_eq!(worker.entity::<GatewayWorker>().unwrap().user_name, "alice");
    let experiment = job.ancestor(ResourceType::Experiment).unwrap();
    assert_eq!(experiment.key_string(), "e1");
    assert!(job.ancestor(ResourceType::Gateway).is_some());
}

#[test]
fn save_rejects_blank_keys_and_multi_owner_statuses() {
    let store = common::store();
    let tree = common::seed(&store);

    let blank = tree.worker.create(ResourceType::Project).unwrap();
    assert!(matches!(
        blank.save(&store),
        Err(RegistryError::Validation(_))
    ));

    let mut status = tree.task.create(ResourceType::Status).unwrap();
    status.entity_mut::<Status>().unwrap().owners.job_id = Some("j1".to_string());
    assert!(matches!(
        status.save(&store),
        Err(RegistryError::Validation(_))
    ));
}

#[test]
fn dangling_foreign_keys_surface_as_storage_errors() {
    let store = common::store();
    let tree = common::seed(&store);

    let mut project = Resource::blank(ResourceType::Project);
    {
        let entity = project.entity_mut::<Project>().unwrap();
        entity.project_id = "orphan".to_string();
        entity.gateway_id = "g1".to_string();
        entity.user_name = "bob".to_string();
    }
    assert!(matches!(
        project.save(&store),
        Err(RegistryError::Storage(DbError::Sqlite(_)))
    ));
    assert!(!tree.gateway.exists(&store, ResourceType::Project, "orphan"));
}

#[test]
fn store_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Store>();
}
