use std::sync::Arc;
use std::thread;

use notekeep_core::db::default_schema;
use notekeep_core::store::{Key, Record, Store, StoreError};

fn record(value: serde_json::Value) -> Record {
    value.as_object().cloned().unwrap()
}

fn user(id: i32, name: &str, email: &str) -> Record {
    record(serde_json::json!({
        "id": id,
        "name": name,
        "email": email,
        "password": "pw",
    }))
}

#[test]
fn committed_insert_is_visible() {
    let store = Store::new(default_schema()).unwrap();

    let mut txn = store.write();
    txn.insert("user", user(1, "Ada", "ada@example.com")).unwrap();
    txn.commit();

    let txn = store.read();
    let row = txn
        .get_first("user", "email", &Key::from("ada@example.com"))
        .unwrap()
        .unwrap();
    assert_eq!(row.get("name").and_then(|v| v.as_str()), Some("Ada"));
}

#[test]
fn aborted_writes_are_discarded() {
    let store = Store::new(default_schema()).unwrap();

    let mut txn = store.write();
    txn.insert("user", user(1, "Ada", "ada@example.com")).unwrap();
    txn.abort();

    let txn = store.read();
    assert!(txn
        .get_first("user", "email", &Key::from("ada@example.com"))
        .unwrap()
        .is_none());
}

#[test]
fn dropped_write_txn_publishes_nothing() {
    let store = Store::new(default_schema()).unwrap();

    {
        let mut txn = store.write();
        txn.insert("user", user(1, "Ada", "ada@example.com")).unwrap();
    }

    let txn = store.read();
    assert!(txn
        .get_first("user", "email", &Key::from("ada@example.com"))
        .unwrap()
        .is_none());
}

#[test]
fn get_first_without_match_is_none_not_error() {
    let store = Store::new(default_schema()).unwrap();
    let txn = store.read();
    let row = txn
        .get_first("user", "email", &Key::from("nobody@example.com"))
        .unwrap();
    assert!(row.is_none());
}

#[test]
fn unknown_table_and_index_are_errors() {
    let store = Store::new(default_schema()).unwrap();
    let txn = store.read();
    assert!(matches!(
        txn.get_first("ghosts", "id", &Key::from(1)),
        Err(StoreError::UnknownTable(_))
    ));
    assert!(matches!(
        txn.get_first("user", "shoe_size", &Key::from(1)),
        Err(StoreError::UnknownIndex { .. })
    ));
}

#[test]
fn unique_index_rejects_duplicate_against_committed_state() {
    let store = Store::new(default_schema()).unwrap();

    let mut txn = store.write();
    txn.insert("user", user(1, "Ada", "ada@example.com")).unwrap();
    txn.commit();

    let mut txn = store.write();
    let err = txn
        .insert("user", user(2, "Imposter", "ada@example.com"))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::ConstraintViolation { ref index, .. } if index == "email"
    ));
}

#[test]
fn unique_index_rejects_duplicate_within_same_txn() {
    let store = Store::new(default_schema()).unwrap();

    let mut txn = store.write();
    txn.insert("user", user(1, "Ada", "ada@example.com")).unwrap();
    let err = txn
        .insert("user", user(2, "Imposter", "ada@example.com"))
        .unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation { .. }));
}

#[test]
fn failed_insert_leaves_txn_usable_and_record_invisible() {
    let store = Store::new(default_schema()).unwrap();

    let mut txn = store.write();
    txn.insert("user", user(1, "Ada", "ada@example.com")).unwrap();
    txn.commit();

    let mut txn = store.write();
    txn.insert("user", user(2, "Imposter", "ada@example.com"))
        .unwrap_err();
    // The txn is still usable for further work and commit.
    txn.insert("user", user(3, "Grace", "grace@example.com"))
        .unwrap();
    txn.commit();

    let txn = store.read();
    let ada = txn
        .get_first("user", "email", &Key::from("ada@example.com"))
        .unwrap()
        .unwrap();
    // The rejected record never overwrote the original.
    assert_eq!(ada.get("id").and_then(|v| v.as_i64()), Some(1));
    assert!(txn
        .get_first("user", "email", &Key::from("grace@example.com"))
        .unwrap()
        .is_some());
}

#[test]
fn insert_missing_indexed_field_is_rejected() {
    let store = Store::new(default_schema()).unwrap();
    let mut txn = store.write();
    let err = txn
        .insert("user", record(serde_json::json!({"id": 1, "name": "Ada"})))
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingIndexField { .. }));
}

#[test]
fn delete_missing_record_is_not_found() {
    let store = Store::new(default_schema()).unwrap();
    let mut txn = store.write();
    let err = txn.delete("notes", &Key::from(42)).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn readers_keep_their_snapshot_across_commits() {
    let store = Store::new(default_schema()).unwrap();

    let mut txn = store.write();
    txn.insert("user", user(1, "Ada", "ada@example.com")).unwrap();
    txn.commit();

    let before = store.read();

    let mut txn = store.write();
    txn.insert("user", user(2, "Grace", "grace@example.com"))
        .unwrap();
    txn.commit();

    // The earlier reader still sees only the first commit.
    assert!(before
        .get_first("user", "email", &Key::from("grace@example.com"))
        .unwrap()
        .is_none());
    // A fresh reader sees both.
    let after = store.read();
    assert!(after
        .get_first("user", "email", &Key::from("grace@example.com"))
        .unwrap()
        .is_some());
}

#[test]
fn write_txn_reads_its_own_uncommitted_writes() {
    let store = Store::new(default_schema()).unwrap();

    let mut txn = store.write();
    txn.insert("user", user(1, "Ada", "ada@example.com")).unwrap();
    assert!(txn
        .get_first("user", "email", &Key::from("ada@example.com"))
        .unwrap()
        .is_some());
    // A concurrent reader does not.
    let reader = store.read();
    assert!(reader
        .get_first("user", "email", &Key::from("ada@example.com"))
        .unwrap()
        .is_none());
}

#[test]
fn concurrent_writers_serialize_and_both_commit() {
    let store = Arc::new(Store::new(default_schema()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let email = format!("user{i}@example.com");
                let mut txn = store.write();
                txn.insert("user", user(i, "User", &email)).unwrap();
                txn.commit();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let txn = store.read();
    for i in 0..8 {
        let email = format!("user{i}@example.com");
        assert!(
            txn.get_first("user", "email", &Key::from(email.as_str()))
                .unwrap()
                .is_some(),
            "missing {email}"
        );
    }
}
