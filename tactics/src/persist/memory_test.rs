use super::*;

fn new_snapshot(owner_id: OwnerId, name: &str) -> NewSnapshot {
    NewSnapshot { owner_id, name: name.to_owned(), scene: Scene::seeded() }
}

#[tokio::test]
async fn list_is_newest_first_and_scoped_to_owner() {
    let store = MemoryStore::new();
    let me = Uuid::new_v4();
    let other = Uuid::new_v4();
    let first = store.insert(new_snapshot(me, "first")).await.unwrap();
    store.insert(new_snapshot(other, "not mine")).await.unwrap();
    let second = store.insert(new_snapshot(me, "second")).await.unwrap();

    let list = store.list(me).await.unwrap();
    let ids: Vec<SnapshotId> = list.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![second, first]);
    assert!(list[0].created_at > list[1].created_at);
}

#[tokio::test]
async fn list_for_unknown_owner_is_empty() {
    let store = MemoryStore::new();
    store.insert(new_snapshot(Uuid::new_v4(), "x")).await.unwrap();
    assert!(store.list(Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_replaces_scene_and_keeps_name() {
    let store = MemoryStore::new();
    let me = Uuid::new_v4();
    let id = store.insert(new_snapshot(me, "keep me")).await.unwrap();

    let mut scene = Scene::seeded();
    scene.tokens[0].x = 10.0;
    store.update(me, id, &scene).await.unwrap();

    let row = store.get(id).unwrap();
    assert_eq!(row.name, "keep me");
    assert_eq!(row.scene, scene);
    assert_eq!(store.write_count(), 2);
}

#[tokio::test]
async fn update_by_other_owner_is_forbidden() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let id = store.insert(new_snapshot(owner, "mine")).await.unwrap();

    let err = store.update(Uuid::new_v4(), id, &Scene::default()).await.unwrap_err();
    assert_eq!(err, StoreError::Rejected { status: 403 });
    assert_eq!(store.get(id).unwrap().scene, Scene::seeded());
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn update_of_missing_snapshot_is_not_found() {
    let store = MemoryStore::new();
    let err = store.update(Uuid::new_v4(), Uuid::new_v4(), &Scene::default()).await.unwrap_err();
    assert_eq!(err, StoreError::Rejected { status: 404 });
}

#[tokio::test]
async fn offline_store_fails_every_call() {
    let store = MemoryStore::new();
    let me = Uuid::new_v4();
    store.set_offline(true);

    assert!(matches!(store.list(me).await, Err(StoreError::Unreachable(_))));
    assert!(matches!(store.insert(new_snapshot(me, "x")).await, Err(StoreError::Unreachable(_))));
    assert!(store.is_empty());

    store.set_offline(false);
    store.insert(new_snapshot(me, "x")).await.unwrap();
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn static_identity_reports_fixed_user() {
    let user = CurrentUser { id: Uuid::new_v4(), name: "Coach".to_owned() };
    let signed_in = StaticIdentity::signed_in(user.clone());
    assert_eq!(signed_in.current_user().await.unwrap(), Some(user));
    assert_eq!(StaticIdentity::anonymous().current_user().await.unwrap(), None);
}

#[tokio::test]
async fn remove_deletes_only_the_named_snapshot() {
    let store = MemoryStore::new();
    let me = Uuid::new_v4();
    let keep = store.insert(new_snapshot(me, "keep")).await.unwrap();
    let drop_id = store.insert(new_snapshot(me, "drop")).await.unwrap();

    assert!(store.remove(drop_id));
    assert!(!store.remove(drop_id));
    assert_eq!(store.len(), 1);
    assert!(store.get(keep).is_some());
}
