//! A refresh overlapping a mutation, against a store that fixes its snapshot
//! before the refresh resumes. The mutation must survive in the mirror.

use admin_sync::collections::{ConnectRequest, Job};
use admin_sync::{AlwaysConfirm, Delete, ListSync, Record, StoreOp};

use crate::support::{blog, blogs, job, seed, titles, SlowStore};

fn lagging_snapshots() -> SlowStore {
    SlowStore::new().lag(StoreOp::ListAll, 10)
}

fn request(name: &str) -> ConnectRequest {
    ConnectRequest {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        message: "Hello".to_string(),
        ..ConnectRequest::default()
    }
}

#[tokio::test]
async fn refetched_create_survives_overlapping_refresh() {
    let list = blogs(lagging_snapshots()).await;

    let (refreshed, created) = tokio::join!(list.refresh(), list.create(blog("New", &[])));
    refreshed.unwrap();
    let id = created.unwrap();

    assert!(list.get(&id).unwrap().is_some());
    assert_eq!(titles(&list), vec!["New"]);
}

#[tokio::test]
async fn appended_create_survives_overlapping_refresh() {
    let list = ListSync::<_, ConnectRequest>::new(lagging_snapshots());
    list.refresh().await.unwrap();

    let (refreshed, created) = tokio::join!(list.refresh(), list.create(request("Ada")));
    refreshed.unwrap();
    let id = created.unwrap();

    assert_eq!(list.store().inner.len(ConnectRequest::COLLECTION), 1);
    assert_eq!(list.len().unwrap(), 1);
    assert!(list.get(&id).unwrap().is_some());
}

#[tokio::test]
async fn prepended_create_survives_overlapping_refresh() {
    let store = lagging_snapshots();
    seed(&store, &[job("Backend")]);
    let list = ListSync::<_, Job>::new(store);
    list.refresh().await.unwrap();

    let (refreshed, created) = tokio::join!(list.refresh(), list.create(job("Frontend")));
    refreshed.unwrap();
    let id = created.unwrap();

    assert!(list.get(&id).unwrap().is_some());
    assert_eq!(list.len().unwrap(), 2);
}

#[tokio::test]
async fn update_survives_overlapping_refresh() {
    let store = lagging_snapshots();
    let ids = seed(&store, &[blog("A", &[]), blog("B", &[])]);
    let list = blogs(store).await;

    let (refreshed, updated) = tokio::join!(list.refresh(), list.update(&ids[0], blog("A2", &[])));
    refreshed.unwrap();
    updated.unwrap();

    assert_eq!(titles(&list), vec!["A2", "B"]);
}

#[tokio::test]
async fn delete_survives_overlapping_refresh() {
    let store = lagging_snapshots();
    let ids = seed(&store, &[blog("A", &[]), blog("B", &[])]);
    let list = blogs(store).await;

    let (refreshed, deleted) = tokio::join!(list.refresh(), list.delete(&ids[0], &AlwaysConfirm));
    refreshed.unwrap();
    assert_eq!(deleted.unwrap(), Delete::Removed);

    assert_eq!(titles(&list), vec!["B"]);
}
