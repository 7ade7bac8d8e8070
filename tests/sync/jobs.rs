use admin_sync::collections::{toggle_visibility, Job, JobStats};
use admin_sync::{ListSync, Predicate, StoreError, StoreOp, SyncError};

use crate::support::{job, seed, SlowStore};

fn job_titles(list: &ListSync<SlowStore, Job>) -> Vec<String> {
    list.mirror()
        .unwrap()
        .into_iter()
        .map(|doc| doc.fields.title)
        .collect()
}

#[tokio::test]
async fn jobs_are_listed_newest_first() {
    let store = SlowStore::new();
    seed(&store, &[job("Old")]);
    std::thread::sleep(std::time::Duration::from_millis(5));
    seed(&store, &[job("New")]);

    let list = ListSync::<_, Job>::new(store);
    list.refresh().await.unwrap();

    assert_eq!(job_titles(&list), vec!["New", "Old"]);
}

#[tokio::test]
async fn created_jobs_are_prepended_without_a_refetch() {
    let store = SlowStore::new();
    seed(&store, &[job("Backend")]);
    let list = ListSync::<_, Job>::new(store);
    list.refresh().await.unwrap();

    list.create(job("Frontend")).await.unwrap();

    assert_eq!(job_titles(&list), vec!["Frontend", "Backend"]);
    assert_eq!(list.store().inner.calls(StoreOp::ListAll), 1);
}

#[tokio::test]
async fn toggle_visibility_flips_and_persists() {
    let store = SlowStore::new();
    let ids = seed(&store, &[job("Backend")]);
    let list = ListSync::<_, Job>::new(store);
    list.refresh().await.unwrap();

    assert!(!toggle_visibility(&list, &ids[0]).await.unwrap());
    assert!(!list.get(&ids[0]).unwrap().unwrap().fields.is_active);

    let stored = list.store().inner.get("jobs", &ids[0]).unwrap();
    assert_eq!(stored.fields["isActive"], false);
    assert_eq!(stored.fields["skills"], serde_json::json!(["Rust"]));

    let stats = JobStats::from_mirror(&list.mirror().unwrap());
    assert_eq!((stats.total, stats.active, stats.inactive), (1, 0, 1));
    assert_eq!(list.view(&Predicate::field("isActive", true)).unwrap().len(), 0);

    assert!(toggle_visibility(&list, &ids[0]).await.unwrap());
}

#[tokio::test]
async fn toggling_an_unmirrored_job_is_not_found() {
    let list = ListSync::<_, Job>::new(SlowStore::new());
    let err = toggle_visibility(&list, "missing").await.unwrap_err();
    assert!(matches!(err, SyncError::Store(StoreError::NotFound { .. })));
    assert_eq!(list.store().inner.calls(StoreOp::Update), 0);
}
