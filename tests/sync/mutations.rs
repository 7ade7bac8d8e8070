use admin_sync::collections::Blog;
use admin_sync::{AlwaysConfirm, Delete, Record, StoreError, StoreOp, SyncError};

use crate::support::{blog, blogs, seed, titles, SlowStore};

#[tokio::test]
async fn update_patches_the_mirror_in_place() {
    let store = SlowStore::new();
    let ids = seed(&store, &[blog("A", &[]), blog("B", &[]), blog("C", &[])]);
    let list = blogs(store).await;

    let draft = blog("B2", &["Food"]);
    list.update(&ids[1], draft.clone()).await.unwrap();

    assert_eq!(titles(&list), vec!["A", "B2", "C"]);
    assert_eq!(list.get(&ids[1]).unwrap().unwrap().fields, draft);
    assert_eq!(list.store().inner.calls(StoreOp::ListAll), 1);

    let stored = list.store().inner.get(Blog::COLLECTION, &ids[1]).unwrap();
    assert_eq!(stored.fields["title"], "B2");
    assert!(stored.updated_at.is_some());
}

#[tokio::test]
async fn repeated_update_is_idempotent() {
    let store = SlowStore::new();
    let ids = seed(&store, &[blog("A", &[])]);
    let list = blogs(store).await;

    let draft = blog("A2", &[]);
    list.update(&ids[0], draft.clone()).await.unwrap();
    let once = list.mirror().unwrap();
    list.update(&ids[0], draft).await.unwrap();

    assert_eq!(list.mirror().unwrap(), once);
}

#[tokio::test]
async fn overlapping_updates_of_one_document_are_rejected() {
    let store = SlowStore::new().delay(StoreOp::Update, 3);
    let ids = seed(&store, &[blog("A", &[])]);
    let list = blogs(store).await;

    let (first, second) = tokio::join!(
        list.update(&ids[0], blog("first", &[])),
        list.update(&ids[0], blog("second", &[])),
    );
    let results = [first, second];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().any(|r| matches!(r, Err(SyncError::Busy { .. }))));
    assert_eq!(list.store().inner.calls(StoreOp::Update), 1);
}

#[tokio::test]
async fn updates_of_different_documents_run_together() {
    let store = SlowStore::new().delay(StoreOp::Update, 3);
    let ids = seed(&store, &[blog("A", &[]), blog("B", &[])]);
    let list = blogs(store).await;

    let (first, second) = tokio::join!(
        list.update(&ids[0], blog("A2", &[])),
        list.update(&ids[1], blog("B2", &[])),
    );
    first.unwrap();
    second.unwrap();
    assert_eq!(titles(&list), vec!["A2", "B2"]);
}

#[tokio::test]
async fn failed_update_leaves_mirror_alone() {
    let store = SlowStore::new();
    let ids = seed(&store, &[blog("A", &[])]);
    let list = blogs(store).await;

    list.store().inner.fail_next(StoreOp::Update, "permission denied");
    assert!(list.update(&ids[0], blog("A2", &[])).await.is_err());
    assert_eq!(titles(&list), vec!["A"]);

    // The document lock was released with the failure.
    list.update(&ids[0], blog("A2", &[])).await.unwrap();
}

#[tokio::test]
async fn update_of_missing_document_is_not_found() {
    let store = SlowStore::new();
    let list = blogs(store).await;

    let err = list.update("missing", blog("A", &[])).await.unwrap_err();
    assert!(matches!(err, SyncError::Store(StoreError::NotFound { .. })));
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn delete_removes_exactly_one_entry() {
    let store = SlowStore::new();
    let ids = seed(&store, &[blog("A", &[]), blog("B", &[]), blog("C", &[])]);
    let list = blogs(store).await;

    assert_eq!(list.delete(&ids[1], &AlwaysConfirm).await.unwrap(), Delete::Removed);

    assert_eq!(titles(&list), vec!["A", "C"]);
    assert_eq!(list.store().inner.len(Blog::COLLECTION), 2);
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let store = SlowStore::new();
    let ids = seed(&store, &[blog("A", &[])]);
    let list = blogs(store).await;

    let decline = |_: &str| false;
    assert_eq!(list.delete(&ids[0], &decline).await.unwrap(), Delete::Declined);

    assert_eq!(list.store().inner.calls(StoreOp::Delete), 0);
    assert_eq!(titles(&list), vec!["A"]);
}

#[tokio::test]
async fn confirm_prompt_names_the_document() {
    let store = SlowStore::new();
    let ids = seed(&store, &[blog("A", &[])]);
    let list = blogs(store).await;

    let prompts = std::sync::Mutex::new(Vec::new());
    let record = |prompt: &str| {
        prompts.lock().unwrap().push(prompt.to_string());
        true
    };
    list.delete(&ids[0], &record).await.unwrap();

    let prompts = prompts.into_inner().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(&ids[0]));
}

#[tokio::test]
async fn failed_delete_leaves_mirror_alone() {
    let store = SlowStore::new();
    let ids = seed(&store, &[blog("A", &[]), blog("B", &[])]);
    let list = blogs(store).await;

    list.store().inner.fail_next(StoreOp::Delete, "offline");
    assert!(list.delete(&ids[0], &AlwaysConfirm).await.is_err());

    assert_eq!(titles(&list), vec!["A", "B"]);
    assert_eq!(list.store().inner.len(Blog::COLLECTION), 2);
}

#[tokio::test]
async fn refresh_during_update_discards_the_local_patch() {
    // The refresh snapshot is taken before the update lands, so patching the
    // replaced mirror would be wrong either way. The controller refetches.
    let store = SlowStore::new()
        .delay(StoreOp::Update, 4)
        .delay(StoreOp::ListAll, 1);
    let ids = seed(&store, &[blog("A", &[]), blog("B", &[])]);
    let list = blogs(store).await;

    let (updated, refreshed) = tokio::join!(list.update(&ids[0], blog("A2", &[])), list.refresh());
    updated.unwrap();
    refreshed.unwrap();

    assert_eq!(list.store().inner.calls(StoreOp::ListAll), 3);
    assert_eq!(titles(&list), vec!["A2", "B"]);
}

#[tokio::test]
async fn refresh_during_delete_refetches() {
    let store = SlowStore::new()
        .delay(StoreOp::Delete, 4)
        .delay(StoreOp::ListAll, 1);
    let ids = seed(&store, &[blog("A", &[]), blog("B", &[])]);
    let list = blogs(store).await;

    let (deleted, refreshed) = tokio::join!(list.delete(&ids[0], &AlwaysConfirm), list.refresh());
    assert_eq!(deleted.unwrap(), Delete::Removed);
    refreshed.unwrap();

    assert_eq!(titles(&list), vec!["B"]);
    assert_eq!(list.store().inner.calls(StoreOp::ListAll), 3);
}
