use versioned_models::{KvError, KvStore, ServingError, ServingStore, VersionSelector};

use crate::support::{state, v, FlakyKvStore, Op};

#[test]
fn allocator_outage_is_store_unavailable() {
    let store = FlakyKvStore::new();
    store.fail(Op::Incr);
    let serving = ServingStore::new(store);

    let err = serving.save_new_version("temp", &state(1.0, 1.0)).unwrap_err();
    assert!(matches!(
        err,
        ServingError::StoreUnavailable(KvError::Unavailable(_))
    ));
    assert!(err.is_retryable());
}

#[test]
fn failed_artifact_write_publishes_nothing_and_leaves_a_hole() {
    let store = FlakyKvStore::new();
    let serving = ServingStore::new(store.clone());

    store.fail(Op::PutIfAbsent);
    let err = serving.save_new_version("temp", &state(1.0, 1.0)).unwrap_err();
    assert!(matches!(err, ServingError::StoreUnavailable(_)));
    assert_eq!(store.inner().get("model:temp:latest").unwrap(), None);
    assert!(store.inner().list("model:temp:versions").unwrap().is_empty());

    store.heal();
    assert_eq!(serving.save_new_version("temp", &state(2.0, 1.0)).unwrap(), v(2));
    assert_eq!(serving.list_versions("temp").unwrap(), vec![v(2)]);
    assert!(serving.resolve_model("temp", v(1).into()).unwrap_err().is_not_found());
}

#[test]
fn pointer_failure_keeps_artifact_retrievable() {
    let store = FlakyKvStore::new();
    let serving = ServingStore::new(store.clone());

    store.fail(Op::CompareAndSwap);
    let err = serving.save_new_version("temp", &state(4.0, 0.5)).unwrap_err();
    match &err {
        ServingError::PublishIncomplete { series, version, source } => {
            assert_eq!(series, "temp");
            assert_eq!(*version, v(1));
            assert!(matches!(**source, ServingError::StoreUnavailable(_)));
        }
        other => panic!("expected PublishIncomplete, got {other:?}"),
    }

    assert_eq!(serving.latest_version("temp").unwrap(), None);
    assert!(serving.list_versions("temp").unwrap().is_empty());
    let record = serving.resolve_model("temp", v(1).into()).unwrap();
    assert_eq!(record.state, state(4.0, 0.5));
}

#[test]
fn publish_retry_completes_a_partial_save() {
    let store = FlakyKvStore::new();
    let serving = ServingStore::new(store.clone());

    store.fail(Op::Append);
    let err = serving.save_new_version("temp", &state(4.0, 0.5)).unwrap_err();
    assert!(matches!(err, ServingError::PublishIncomplete { .. }));
    // The pointer moved before the index append failed.
    assert_eq!(serving.latest_version("temp").unwrap(), Some(v(1)));
    assert!(serving.list_versions("temp").unwrap().is_empty());

    store.heal();
    serving.publish("temp", v(1)).unwrap();
    serving.publish("temp", v(1)).unwrap();
    assert_eq!(serving.list_versions("temp").unwrap(), vec![v(1)]);
    assert_eq!(
        serving
            .resolve_model("temp", VersionSelector::Latest)
            .unwrap()
            .state,
        state(4.0, 0.5)
    );
}

#[test]
fn read_outage_is_store_unavailable_not_not_found() {
    let store = FlakyKvStore::new();
    let serving = ServingStore::new(store.clone());
    serving.save_new_version("temp", &state(1.0, 1.0)).unwrap();

    store.fail(Op::Get);
    let err = serving
        .resolve_model("temp", VersionSelector::Latest)
        .unwrap_err();
    assert!(matches!(err, ServingError::StoreUnavailable(_)));
    assert!(!err.is_not_found());
}
