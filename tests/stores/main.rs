//! The same behavioural suite, run against every kind of store.

mod records;

use records::Profile;
use serde_json::{json, Value};
use tiered_store::{
    AsyncStore, InMemoryAsyncMedium, InMemoryMedium, LocalStore, Store, StoreError, TieredStore,
    WritePolicy,
};

/// Save, overwrite, enumerate and clear, checking results along the way.
async fn exercise(store: &dyn Store<Value>) {
    let mut record = json!({ "id": "a", "a": "A" });
    let saved = store.save(&record).await.unwrap();
    assert_eq!(saved, record, "object saved");

    let loaded = store.get("a").await.unwrap();
    assert_eq!(loaded["id"], "a");
    assert_eq!(loaded["a"], "A", "object retrieved");

    record["a"] = json!("AAA");
    record["b"] = json!("BBB");
    assert_eq!(store.save(&record).await.unwrap(), record, "changed object saved");

    let loaded = store.get("a").await.unwrap();
    assert_eq!(loaded["a"], "AAA");
    assert_eq!(loaded["b"], "BBB", "changed object retrieved");

    for id in ["c", "d", "e"] {
        let saved = store.save(&json!({ "id": id })).await.unwrap();
        assert_eq!(saved["id"], id, "{} stored", id);
    }

    assert_eq!(store.delete("a").await.unwrap(), "a", "a deleted");
    assert_eq!(store.get_all().await.unwrap().len(), 3, "3 records found");

    store.delete_all().await.unwrap();
    assert!(store.get_all().await.unwrap().is_empty(), "0 records found");
}

/// Identifiers every validating entry point must refuse.
async fn rejects_invalid_ids(store: &dyn Store<Value>) {
    for bad in ["a:b", "a/b", "a b", ""] {
        assert!(
            matches!(store.get(bad).await, Err(StoreError::InvalidIdentifier(_))),
            "get({:?})",
            bad
        );
        assert!(
            matches!(store.delete(bad).await, Err(StoreError::InvalidIdentifier(_))),
            "delete({:?})",
            bad
        );
    }
    for bad in ["a:b", "a/b", "a b"] {
        assert!(
            matches!(
                store.save(&json!({ "id": bad })).await,
                Err(StoreError::InvalidIdentifier(_))
            ),
            "save({:?})",
            bad
        );
    }
    assert_eq!(
        store.save(&json!({ "id": "" })).await.unwrap_err(),
        StoreError::MissingId
    );
    assert_eq!(
        store.save(&json!({ "id": 42 })).await.unwrap_err(),
        StoreError::MissingId
    );
}

#[tokio::test]
async fn local_store() {
    let store: LocalStore<Value, _> = LocalStore::new(InMemoryMedium::new(), "users").unwrap();
    exercise(&store).await;
    assert_eq!(store.count().unwrap(), 0);
    rejects_invalid_ids(&store).await;
}

#[tokio::test]
async fn async_store() {
    let store: AsyncStore<Value, _> =
        AsyncStore::new(InMemoryAsyncMedium::new(), "users").unwrap();
    exercise(&store).await;
    assert!(store.keys().await.unwrap().is_empty());
    rejects_invalid_ids(&store).await;
}

#[tokio::test]
async fn tiered_store_in_memory() {
    let store = TieredStore::<Value>::new();
    exercise(&store).await;
    assert_eq!(store.count().await.unwrap(), 0);
    rejects_invalid_ids(&store).await;
}

#[tokio::test]
async fn tiered_store_over_local_store() {
    let medium = InMemoryMedium::new();
    let local: LocalStore<Value, _> = LocalStore::new(medium.clone(), "users").unwrap();
    let store = TieredStore::<Value>::builder()
        .backed_by(local)
        .write_policy(WritePolicy::Awaited)
        .build();
    exercise(&store).await;
    assert!(medium.is_empty().unwrap());
}

#[tokio::test]
async fn tiered_store_over_async_store() {
    let medium = InMemoryAsyncMedium::new();
    let remote: AsyncStore<Value, _> = AsyncStore::new(medium.clone(), "users").unwrap();
    let store = TieredStore::<Value>::builder()
        .backed_by(remote)
        .write_policy(WritePolicy::Awaited)
        .build();
    exercise(&store).await;
    assert!(medium.inner().is_empty().unwrap());
}

#[tokio::test]
async fn delete_of_absent_id_succeeds_everywhere() {
    let local: LocalStore<Value, _> = LocalStore::new(InMemoryMedium::new(), "s").unwrap();
    let remote: AsyncStore<Value, _> = AsyncStore::new(InMemoryAsyncMedium::new(), "s").unwrap();
    let tiered = TieredStore::<Value>::new();

    let stores: [&dyn Store<Value>; 3] = [&local, &remote, &tiered];
    for store in stores {
        assert_eq!(store.delete("nobody").await.unwrap(), "nobody");
        store.delete_all().await.unwrap();
        assert!(store.find("nobody").await.unwrap().is_none());
    }
}

#[tokio::test]
async fn stores_sharing_a_medium_stay_apart() {
    let medium = InMemoryMedium::new();
    let users: LocalStore<Value, _> = LocalStore::new(medium.clone(), "users").unwrap();
    let admins: LocalStore<Value, _> = LocalStore::new(medium.clone(), "admins").unwrap();

    users.save(&json!({ "id": "root", "role": "user" })).await.unwrap();
    admins.save(&json!({ "id": "root", "role": "admin" })).await.unwrap();

    assert_eq!(users.get("root").await.unwrap()["role"], "user");
    assert_eq!(admins.get("root").await.unwrap()["role"], "admin");

    users.delete_all().await.unwrap();
    assert_eq!(admins.get_all().await.unwrap().len(), 1);
    assert_eq!(medium.len().unwrap(), 1);
}

#[tokio::test]
async fn local_store_reopens_existing_records() {
    let medium = InMemoryMedium::new();
    {
        let first: LocalStore<Profile, _> = LocalStore::new(medium.clone(), "profiles").unwrap();
        first
            .save(&Profile::new("ada", "Ada").tag("math"))
            .await
            .unwrap();
        first.save(&Profile::new("alan", "Alan")).await.unwrap();
    }

    let reopened: LocalStore<Profile, _> = LocalStore::new(medium, "profiles").unwrap();
    assert_eq!(reopened.count().unwrap(), 2);
    assert_eq!(
        reopened.get("ada").await.unwrap(),
        Profile::new("ada", "Ada").tag("math")
    );
}

#[tokio::test]
async fn typed_records_round_trip_through_every_store() {
    let profile = Profile::new("grace", "Grace Hopper").tag("cobol").tag("navy");

    let local: LocalStore<Profile, _> = LocalStore::new(InMemoryMedium::new(), "p").unwrap();
    let remote: AsyncStore<Profile, _> = AsyncStore::new(InMemoryAsyncMedium::new(), "p").unwrap();
    let tiered = TieredStore::<Profile>::new();

    let stores: [&dyn Store<Profile>; 3] = [&local, &remote, &tiered];
    for store in stores {
        store.save(&profile).await.unwrap();
        assert_eq!(store.get("grace").await.unwrap(), profile);
    }

    let nameless = Profile::new("", "Nobody");
    assert_eq!(tiered.save(&nameless).await.unwrap_err(), StoreError::MissingId);
}

#[test]
fn store_ids_are_validated_at_construction() {
    for bad in ["", "a:b", "a/b", "a b"] {
        assert!(matches!(
            LocalStore::<Value, _>::new(InMemoryMedium::new(), bad),
            Err(StoreError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            AsyncStore::<Value, _>::new(InMemoryAsyncMedium::new(), bad),
            Err(StoreError::InvalidIdentifier(_))
        ));
    }
}
