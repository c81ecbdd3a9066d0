#![allow(dead_code)]

use registry_core::model::{
    DataTransferDetail, Experiment, Gateway, GatewayWorker, JobDetail, Project, TaskDetail, User,
    WorkflowNodeDetail,
};
use registry_core::{EntityCast, Resource, ResourceNode, ResourceType, Store};

/// One persisted branch of every level of the hierarchy:
/// g1 / alice / p1 / e1 / n1 / t1 / {j1, x1}; user `bob` exists but is not
/// a worker.
pub struct Tree {
    pub gateway: Resource,
    pub worker: Resource,
    pub project: Resource,
    pub experiment: Resource,
    pub node: Resource,
    pub task: Resource,
    pub job: Resource,
    pub transfer: Resource,
}

impl Tree {
    pub fn parent(&self, kind: ResourceType) -> &Resource {
        match kind {
            ResourceType::Gateway => &self.gateway,
            ResourceType::GatewayWorker => &self.worker,
            ResourceType::Project => &self.project,
            ResourceType::Experiment => &self.experiment,
            ResourceType::WorkflowNodeDetail => &self.node,
            ResourceType::TaskDetail => &self.task,
            ResourceType::JobDetail => &self.job,
            ResourceType::DataTransferDetail => &self.transfer,
            other => panic!("{other} is not a parent kind"),
        }
    }
}

pub fn store() -> Store {
    Store::open_in_memory().unwrap()
}

/// Creates `child` under `parent`, edits it, and saves it.
pub fn add<E: EntityCast>(
    store: &Store,
    parent: &Resource,
    child: ResourceType,
    edit: impl FnOnce(&mut E),
) -> Resource {
    let mut resource = parent.create(child).unwrap();
    edit(resource.entity_mut::<E>().unwrap());
    resource.save(store).unwrap();
    resource
}

pub fn seed(store: &Store) -> Tree {
    let gateway = Resource::from_entity(Gateway {
        gateway_id: "g1".to_string(),
        gateway_name: Some("Science Gateway".to_string()),
        ..Gateway::default()
    });
    gateway.save(store).unwrap();
    for name in ["alice", "bob"] {
        Resource::from_entity(User {
            user_name: name.to_string(),
            password: None,
        })
        .save(store)
        .unwrap();
    }

    let worker = add::<GatewayWorker>(store, &gateway, ResourceType::GatewayWorker, |w| {
        w.user_name = "alice".to_string();
    });
    let project = add::<Project>(store, &worker, ResourceType::Project, |p| {
        p.project_id = "p1".to_string();
        p.project_name = Some("Proteins".to_string());
    });
    let experiment = add::<Experiment>(store, &project, ResourceType::Experiment, |e| {
        e.experiment_id = "e1".to_string();
        e.experiment_name = Some("Folding run".to_string());
    });
    let node = add::<WorkflowNodeDetail>(
        store,
        &experiment,
        ResourceType::WorkflowNodeDetail,
        |n| n.node_instance_id = "n1".to_string(),
    );
    let task = add::<TaskDetail>(store, &node, ResourceType::TaskDetail, |t| {
        t.task_id = "t1".to_string();
    });
    let job = add::<JobDetail>(store, &task, ResourceType::JobDetail, |j| {
        j.job_id = "j1".to_string();
    });
    let transfer = add::<DataTransferDetail>(store, &task, ResourceType::DataTransferDetail, |x| {
        x.transfer_id = "x1".to_string();
    });

    Tree {
        gateway,
        worker,
        project,
        experiment,
        node,
        task,
        job,
        transfer,
    }
}
