use admin_sync::collections::{Blog, ConnectRequest};
use admin_sync::{ListSync, Record, StoreOp, SyncError, ValidationError};

use crate::support::{blog, blogs, seed, titles, SlowStore};

#[tokio::test]
async fn create_refetches_blogs() {
    let store = SlowStore::new();
    seed(&store, &[blog("A", &[])]);
    let list = blogs(store).await;

    let id = list.create(blog("B", &["Tech"])).await.unwrap();

    assert_eq!(titles(&list), vec!["A", "B"]);
    let created = list.get(&id).unwrap().unwrap();
    assert!(created.created_at.is_some());
    assert_eq!(list.store().inner.calls(StoreOp::ListAll), 2);
}

#[tokio::test]
async fn concurrent_creates_store_one_document() {
    let store = SlowStore::new().delay(StoreOp::Create, 3);
    let list = blogs(store).await;

    let (first, second) = tokio::join!(list.create(blog("A", &[])), list.create(blog("A", &[])));
    let (ok, rejected) = match (first, second) {
        (Ok(id), Err(err)) | (Err(err), Ok(id)) => (id, err),
        other => panic!("expected one create to win, got {:?}", other),
    };

    assert_eq!(
        rejected,
        SyncError::CreateInFlight {
            collection: Blog::COLLECTION
        }
    );
    assert!(rejected.is_rejected_locally());
    assert_eq!(list.store().inner.calls(StoreOp::Create), 1);
    assert_eq!(list.store().inner.len(Blog::COLLECTION), 1);
    assert_eq!(list.mirror().unwrap().len(), 1);
    assert!(list.get(&ok).unwrap().is_some());
}

#[tokio::test]
async fn create_slot_frees_after_failure() {
    let store = SlowStore::new();
    let list = blogs(store).await;

    list.store().inner.fail_next(StoreOp::Create, "quota exceeded");
    assert!(matches!(
        list.create(blog("A", &[])).await,
        Err(SyncError::Store(_))
    ));
    assert!(!list.is_creating().unwrap());
    assert!(list.is_empty().unwrap());

    list.create(blog("A", &[])).await.unwrap();
    assert_eq!(titles(&list), vec!["A"]);
}

#[tokio::test]
async fn blank_title_never_reaches_the_store() {
    let store = SlowStore::new();
    let list = blogs(store).await;

    let err = list.create(blog("   ", &[])).await.unwrap_err();

    assert_eq!(err, SyncError::Validation(ValidationError::MissingField("title")));
    assert_eq!(list.store().inner.calls(StoreOp::Create), 0);
    assert!(list.is_empty().unwrap());
}

#[tokio::test]
async fn appended_documents_skip_the_refetch() {
    let store = SlowStore::new();
    let list = ListSync::<_, ConnectRequest>::new(store);
    list.refresh().await.unwrap();

    let request = ConnectRequest {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        message: "Let's talk".into(),
        ..ConnectRequest::default()
    };
    let id = list.create(request.clone()).await.unwrap();

    let mirror = list.mirror().unwrap();
    assert_eq!(mirror.len(), 1);
    assert_eq!(mirror[0].id, id);
    assert_eq!(mirror[0].fields, request);
    assert_eq!(list.store().inner.calls(StoreOp::ListAll), 1);
}
