use admin_sync::collections::{Blog, Link};
use admin_sync::{FormSession, FormState, StoreOp, Submitted, SyncError, ValidationError};

use crate::support::{blog, blogs, seed, titles, SlowStore};

#[tokio::test]
async fn submit_creates_and_closes_the_form() {
    let list = blogs(SlowStore::new()).await;
    let mut form = FormSession::<Blog>::new();

    form.start_create();
    let draft = form.draft_mut().unwrap();
    draft.title = "Launch".into();
    draft.content = "We shipped".into();
    draft.toggle_tag("Tech");

    let id = match form.submit(&list).await.unwrap() {
        Submitted::Created(id) => id,
        other => panic!("expected a create, got {:?}", other),
    };

    assert!(form.is_empty());
    let created = list.get(&id).unwrap().unwrap();
    assert_eq!(created.fields.tags, vec!["Tech"]);
    // The placeholder link row was blank and never stored.
    assert!(created.fields.links.is_empty());
}

#[tokio::test]
async fn blank_title_keeps_the_draft_and_skips_the_store() {
    let list = blogs(SlowStore::new()).await;
    let mut form = FormSession::<Blog>::new();

    form.start_create();
    form.draft_mut().unwrap().content = "body only".into();
    let before = form.state().clone();

    let err = form.submit(&list).await.unwrap_err();

    assert_eq!(err, SyncError::Validation(ValidationError::MissingField("title")));
    assert_eq!(form.state(), &before);
    assert_eq!(list.store().inner.calls(StoreOp::Create), 0);
}

#[tokio::test]
async fn submit_without_a_draft_is_rejected() {
    let list = blogs(SlowStore::new()).await;
    let mut form = FormSession::<Blog>::new();

    let err = form.submit(&list).await.unwrap_err();
    assert_eq!(err, SyncError::Validation(ValidationError::NoDraft));
    assert!(form.is_empty());
}

#[tokio::test]
async fn edit_submits_an_update() {
    let store = SlowStore::new();
    let ids = seed(&store, &[blog("A", &[]), blog("B", &[])]);
    let list = blogs(store).await;
    let mut form = FormSession::<Blog>::new();

    form.start_edit(&list.get(&ids[1]).unwrap().unwrap());
    form.draft_mut().unwrap().title = "B2".into();

    assert_eq!(
        form.submit(&list).await.unwrap(),
        Submitted::Updated(ids[1].clone())
    );
    assert_eq!(titles(&list), vec!["A", "B2"]);
    assert_eq!(list.store().inner.calls(StoreOp::Create), 0);
}

#[tokio::test]
async fn switching_edits_discards_the_first_draft() {
    let store = SlowStore::new();
    let ids = seed(&store, &[blog("A", &[]), blog("B", &[])]);
    let list = blogs(store).await;
    let mut form = FormSession::<Blog>::new();

    form.start_edit(&list.get(&ids[0]).unwrap().unwrap());
    form.draft_mut().unwrap().title = "never saved".into();
    form.start_edit(&list.get(&ids[1]).unwrap().unwrap());

    assert_eq!(form.editing_id(), Some(ids[1].as_str()));
    assert_eq!(form.draft().unwrap().title, "B");
    assert_eq!(titles(&list), vec!["A", "B"]);
    assert_eq!(list.store().inner.calls(StoreOp::Update), 0);
}

#[tokio::test]
async fn failed_update_keeps_draft_and_mirror() {
    let store = SlowStore::new();
    let ids = seed(&store, &[blog("A", &[])]);
    let list = blogs(store).await;
    let mut form = FormSession::<Blog>::new();

    form.start_edit(&list.get(&ids[0]).unwrap().unwrap());
    let draft = form.draft_mut().unwrap();
    draft.title = "A2".into();
    draft.links = vec![Link::new("Docs", "https://example.com"), Link::default()];
    let before = form.state().clone();

    list.store().inner.fail_next(StoreOp::Update, "offline");
    assert!(matches!(form.submit(&list).await, Err(SyncError::Store(_))));

    // The blank link row the operator left is still there to edit.
    assert_eq!(form.state(), &before);
    assert!(matches!(form.state(), FormState::Editing { .. }));
    assert_eq!(titles(&list), vec!["A"]);

    assert_eq!(
        form.submit(&list).await.unwrap(),
        Submitted::Updated(ids[0].clone())
    );
    assert_eq!(titles(&list), vec!["A2"]);
    assert_eq!(list.get(&ids[0]).unwrap().unwrap().fields.links.len(), 1);
}
