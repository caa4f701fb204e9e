mod util;

use corkboard::storage::{MessageRecord, MessageStore};
use std::fs;
use std::sync::Arc;
use util::Cleanup;

fn record(username: &str, message: &str) -> MessageRecord {
    MessageRecord {
        username: username.to_string(),
        message: message.to_string(),
    }
}

#[tokio::test]
async fn test_fresh_store_is_empty() {
    let test_paths = vec!["./test_storage_fresh"];
    let cleanup = Cleanup {
        test_paths: &test_paths,
    };
    cleanup.remove_test_paths();

    let store = MessageStore::open("./test_storage_fresh/data.json").expect("open failed");

    let on_disk = fs::read_to_string(store.path()).expect("store file missing");
    assert_eq!(on_disk, "{}");

    let messages = store.read_all().await.expect("read_all failed");
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_open_is_idempotent() {
    let test_paths = vec!["./test_storage_idempotent"];
    let cleanup = Cleanup {
        test_paths: &test_paths,
    };
    cleanup.remove_test_paths();

    let store = MessageStore::open("./test_storage_idempotent/data.json").expect("first open");
    store
        .append(record("alice", "hello"))
        .await
        .expect("append failed");

    // Reopening must not reseed the file
    let store = MessageStore::open("./test_storage_idempotent/data.json").expect("second open");
    let messages = store.read_all().await.expect("read_all failed");
    assert_eq!(messages.len(), 1);
    assert_eq!(
        messages.values().next().expect("record missing"),
        &record("alice", "hello")
    );
}

#[tokio::test]
async fn test_malformed_content_reads_empty() {
    let test_paths = vec!["./test_storage_malformed"];
    let cleanup = Cleanup {
        test_paths: &test_paths,
    };
    cleanup.remove_test_paths();

    let store = MessageStore::open("./test_storage_malformed/data.json").expect("open failed");
    fs::write(store.path(), "not json {{{").expect("write garbage");

    let messages = store.read_all().await.expect("read_all must not fail");
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_empty_file_reads_empty() {
    let test_paths = vec!["./test_storage_empty_file"];
    let cleanup = Cleanup {
        test_paths: &test_paths,
    };
    cleanup.remove_test_paths();

    let store = MessageStore::open("./test_storage_empty_file/data.json").expect("open failed");
    fs::write(store.path(), "").expect("truncate");

    let messages = store.read_all().await.expect("read_all must not fail");
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_append_then_read_roundtrip() {
    let test_paths = vec!["./test_storage_roundtrip"];
    let cleanup = Cleanup {
        test_paths: &test_paths,
    };
    cleanup.remove_test_paths();

    let store = MessageStore::open("./test_storage_roundtrip/data.json").expect("open failed");
    let key = store
        .append(record("bob", "hi there"))
        .await
        .expect("append failed");

    // "YYYY-MM-DD HH:MM:SS.ffffff"
    assert_eq!(key.len(), 26);
    assert_eq!(&key[10..11], " ");
    assert_eq!(&key[19..20], ".");

    let messages = store.read_all().await.expect("read_all failed");
    assert_eq!(messages.get(&key), Some(&record("bob", "hi there")));

    // The document is rewritten pretty-printed
    let on_disk = fs::read_to_string(store.path()).expect("store file missing");
    assert!(on_disk.contains("\n  \""));
    assert!(on_disk.contains("\"username\": \"bob\""));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_no_lost_update() {
    let test_paths = vec!["./test_storage_concurrent"];
    let cleanup = Cleanup {
        test_paths: &test_paths,
    };
    cleanup.remove_test_paths();

    let store = Arc::new(
        MessageStore::open("./test_storage_concurrent/data.json").expect("open failed"),
    );

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .append(record(&format!("user{i}"), &format!("message {i}")))
                .await
                .expect("append failed")
        }));
    }

    let mut keys = Vec::new();
    for handle in handles {
        keys.push(handle.await.expect("task panicked"));
    }

    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), 8, "append returned duplicate keys");

    let messages = store.read_all().await.expect("read_all failed");
    assert_eq!(messages.len(), 8, "an append was lost");
}
