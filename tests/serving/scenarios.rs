use versioned_models::{
    InMemoryKvStore, KvStore, ServingStore, VersionSelector,
};

use crate::support::{state, v};

#[test]
fn two_trainings_then_resolve() {
    let serving = ServingStore::new(InMemoryKvStore::new());

    assert_eq!(serving.save_new_version("temp", &state(10.0, 2.0)).unwrap(), v(1));
    assert_eq!(serving.save_new_version("temp", &state(11.0, 2.5)).unwrap(), v(2));

    assert_eq!(serving.list_versions("temp").unwrap(), vec![v(1), v(2)]);
    assert_eq!(serving.latest_version("temp").unwrap(), Some(v(2)));

    let latest = serving.resolve_model("temp", VersionSelector::Latest).unwrap();
    assert_eq!(latest.state, state(11.0, 2.5));
    assert_eq!(latest.version, v(2));

    let first = serving.resolve_model("temp", "v1".parse().unwrap()).unwrap();
    assert_eq!(first.state, state(10.0, 2.0));
    assert_eq!(first.series_id, "temp");
}

#[test]
fn never_trained_series_is_not_found() {
    let serving = ServingStore::new(InMemoryKvStore::new());

    let err = serving
        .resolve_model("never_trained", VersionSelector::Latest)
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(serving.list_versions("never_trained").unwrap().is_empty());
    assert_eq!(serving.latest_version("never_trained").unwrap(), None);
}

#[test]
fn unknown_explicit_version_is_not_found() {
    let serving = ServingStore::new(InMemoryKvStore::new());
    serving.save_new_version("temp", &state(1.0, 1.0)).unwrap();

    let err = serving.resolve_model("temp", v(9).into()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn series_are_versioned_independently() {
    let serving = ServingStore::new(InMemoryKvStore::new());
    serving.save_new_version("cpu", &state(1.0, 1.0)).unwrap();
    serving.save_new_version("cpu", &state(2.0, 1.0)).unwrap();

    assert_eq!(serving.save_new_version("mem", &state(3.0, 1.0)).unwrap(), v(1));
    assert_eq!(serving.latest_version("cpu").unwrap(), Some(v(2)));
    assert_eq!(serving.latest_version("mem").unwrap(), Some(v(1)));
}

#[test]
fn artifacts_are_immutable_after_later_saves() {
    let store = InMemoryKvStore::new();
    let serving = ServingStore::new(store.clone());
    serving.save_new_version("temp", &state(10.0, 2.0)).unwrap();
    let original = store.get("model:temp:v1").unwrap();

    serving.save_new_version("temp", &state(99.0, 9.0)).unwrap();
    assert_eq!(store.get("model:temp:v1").unwrap(), original);
}

#[test]
fn writes_the_documented_key_schema() {
    let store = InMemoryKvStore::new();
    let serving = ServingStore::new(store.clone());
    serving.save_new_version("temp", &state(10.0, 2.0)).unwrap();

    assert_eq!(store.incr("model:temp:version_counter").unwrap(), 2);
    assert_eq!(store.get("model:temp:latest").unwrap(), Some(b"v1".to_vec()));
    assert_eq!(store.list("model:temp:versions").unwrap(), vec!["v1"]);
    assert!(store.get("model:temp:v1").unwrap().is_some());
}
