mod common;

use registry_core::db::StoreOptions;
use registry_core::model::{Configuration, GatewayWorker, Project};
use registry_core::{Resource, ResourceNode, ResourceType, Store, UpsertStrategy};

fn stores() -> Vec<Store> {
    [UpsertStrategy::TwoPhase, UpsertStrategy::SingleStatement]
        .into_iter()
        .map(|upsert| {
            common::store().with_options(StoreOptions {
                upsert,
                ..StoreOptions::default()
            })
        })
        .collect()
}

fn row_count(store: &Store, table: &str) -> i64 {
    let handle = store.acquire().unwrap();
    handle
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn saving_twice_is_idempotent_under_both_strategies() {
    for store in stores() {
        let tree = common::seed(&store);
        let before = row_count(&store, "project");

        tree.project.save(&store).unwrap();
        tree.project.save(&store).unwrap();

        assert_eq!(row_count(&store, "project"), before, "{:?}", store.upsert_strategy());
        let loaded = tree.worker.get(&store, ResourceType::Project, "p1").unwrap();
        assert_eq!(loaded.data(), tree.project.data());
    }
}

#[test]
fn merge_updates_non_key_columns_under_both_strategies() {
    for store in stores() {
        let tree = common::seed(&store);

        let mut project = tree.project.clone();
        {
            let entity = project.entity_mut::<Project>().unwrap();
            entity.project_name = Some("Renamed".to_string());
            entity.description = Some("second pass".to_string());
        }
        project.save(&store).unwrap();

        let loaded = tree
            .worker
            .get(&store, ResourceType::Project, "p1")
            .unwrap()
            .into_entity::<Project>()
            .unwrap();
        assert_eq!(loaded.project_name.as_deref(), Some("Renamed"));
        assert_eq!(loaded.description.as_deref(), Some("second pass"));
    }
}

#[test]
fn merging_a_parent_keeps_its_children() {
    for store in stores() {
        let tree = common::seed(&store);

        let mut project = tree.project.clone();
        project.entity_mut::<Project>().unwrap().project_name = Some("Again".to_string());
        project.save(&store).unwrap();

        assert!(tree.project.exists(&store, ResourceType::Experiment, "e1"));
        assert_eq!(row_count(&store, "task_detail"), 1);
    }
}

#[test]
fn key_only_rows_save_repeatedly() {
    for store in stores() {
        let tree = common::seed(&store);

        let worker = tree.worker.clone();
        worker.save(&store).unwrap();
        worker.save(&store).unwrap();

        assert_eq!(
            worker.entity::<GatewayWorker>().unwrap().user_name,
            "alice"
        );
        assert_eq!(row_count(&store, "gateway_worker"), 1);
    }
}

#[test]
fn composite_keys_distinguish_rows() {
    for store in stores() {
        for (value, expire) in [("a", 1), ("b", 2), ("a", 3)] {
            Resource::from_entity(Configuration {
                config_key: "gfac.url".to_string(),
                config_val: value.to_string(),
                expire_date: expire,
                category_id: None,
            })
            .save(&store)
            .unwrap();
        }

        assert_eq!(row_count(&store, "configuration"), 2);
        let handle = store.acquire().unwrap();
        let expire: i64 = handle
            .query_row(
                "SELECT expire_date FROM configuration WHERE config_val = 'a'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(expire, 3);
    }
}
