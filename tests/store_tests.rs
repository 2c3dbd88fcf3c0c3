//! # Observed-State Fetch Tests
//!
//! Verify the list-then-filter lookup used to find the live Secret.

mod common;

use common::{live_secret, Call, MemoryStore, OWNER};
use secrets_distributor::store::{fetch_observed, ObservedSecret};

#[tokio::test]
async fn test_fetch_returns_none_when_nothing_matches() {
    let store = MemoryStore::new();
    store.insert(live_secret("apps", "unrelated", Some(OWNER), &[]));

    let found = fetch_observed(&store, "apps", "wanted").await.unwrap();

    assert!(found.is_none());
    assert_eq!(
        store.calls(),
        vec![Call::List {
            namespace: "apps".to_string()
        }]
    );
}

#[tokio::test]
async fn test_fetch_matches_exact_name() {
    let store = MemoryStore::new();
    store.insert(live_secret("apps", "db", Some(OWNER), &[("k", "v")]));

    let found = fetch_observed(&store, "apps", "db").await.unwrap().unwrap();

    assert_eq!(found.name(), "db");
    assert_eq!(found.owner(), Some(OWNER));
}

#[tokio::test]
async fn test_fetch_ignores_case() {
    let store = MemoryStore::new();
    store.insert(live_secret("apps", "DB-Credentials", None, &[]));

    let found = fetch_observed(&store, "apps", "db-credentials").await.unwrap();
    assert_eq!(found.map(|s| s.name().to_string()), Some("DB-Credentials".to_string()));

    let found = fetch_observed(&store, "apps", "DB-CREDENTIALS").await.unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn test_fetch_is_scoped_to_namespace() {
    let store = MemoryStore::new();
    store.insert(live_secret("elsewhere", "db", Some(OWNER), &[]));

    assert!(fetch_observed(&store, "apps", "db").await.unwrap().is_none());
}

#[tokio::test]
async fn test_fetch_propagates_list_failure() {
    let store = MemoryStore::failing_list();
    assert!(fetch_observed(&store, "apps", "db").await.is_err());
}

#[test]
fn test_observed_data_is_reencoded_as_base64() {
    let observed = ObservedSecret(live_secret("apps", "s", Some(OWNER), &[("a", "test"), ("b", "x")]));

    let data = observed.encoded_data();

    assert_eq!(data.get("a").map(String::as_str), Some("dGVzdA=="));
    assert_eq!(data.get("b").map(String::as_str), Some("eA=="));
}

#[test]
fn test_observed_without_data_or_annotations() {
    let mut secret = live_secret("apps", "s", None, &[]);
    secret.data = None;
    let observed = ObservedSecret(secret);

    assert!(observed.encoded_data().is_empty());
    assert_eq!(observed.owner(), None);
}
