//! Message persistence module
//!
//! Owns the on-disk JSON message file. The document is a mapping from
//! timestamp keys to message records, rewritten in full on every append.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::logger;

/// A single stored submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub username: String,
    pub message: String,
}

/// Full store contents, keyed by timestamp. `BTreeMap` keeps the document
/// sorted, which for the zero-padded key format is chronological order.
pub type MessageMap = BTreeMap<String, MessageRecord>;

/// Human-readable local time with microsecond precision
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Flat-file message store
///
/// All writes go through `append`, which holds the write lock for the whole
/// read-modify-write cycle so concurrent appends cannot lose updates.
pub struct MessageStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl MessageStore {
    /// Open the store, creating the parent directory and seeding the file
    /// with an empty JSON object if it does not exist yet. Idempotent.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        if !path.exists() {
            std::fs::write(&path, "{}")?;
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full store.
    ///
    /// Empty or malformed file content degrades to an empty map (fail-open);
    /// filesystem errors propagate to the caller.
    pub async fn read_all(&self) -> io::Result<MessageMap> {
        let content = fs::read_to_string(&self.path).await?;
        match serde_json::from_str(&content) {
            Ok(messages) => Ok(messages),
            Err(e) => {
                logger::log_warning(&format!(
                    "Malformed message store '{}', treating as empty: {e}",
                    self.path.display()
                ));
                Ok(MessageMap::new())
            }
        }
    }

    /// Append one record and rewrite the file pretty-printed.
    ///
    /// Returns the key the record was stored under.
    pub async fn append(&self, record: MessageRecord) -> io::Result<String> {
        let _guard = self.write_lock.lock().await;

        let mut messages = self.read_all().await?;
        let key = unique_key(&messages, &Local::now().format(TIMESTAMP_FORMAT).to_string());
        messages.insert(key.clone(), record);

        let content = serde_json::to_string_pretty(&messages)?;
        fs::write(&self.path, content).await?;

        Ok(key)
    }
}

/// Disambiguate a timestamp key against the current map contents.
///
/// Two appends within the same clock tick format to the same string; the
/// second probes `#1`, `#2`, ... until the key is free. Callers hold the
/// write lock, so check-and-insert cannot race.
fn unique_key(messages: &MessageMap, base: &str) -> String {
    if !messages.contains_key(base) {
        return base.to_string();
    }
    let mut n = 1u32;
    loop {
        let candidate = format!("{base}#{n}");
        if !messages.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
