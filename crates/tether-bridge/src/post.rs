//! Result envelopes and the store that holds their binary attachments until
//! the render side downloads them.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use crate::callback::Completion;

/// A finished result ready to cross the boundary: a string value and an
/// optional binary attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Post {
    pub value: String,
    pub bytes: Option<Vec<u8>>,
}

impl Post {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            bytes: None,
        }
    }

    pub fn with_bytes(value: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            value: value.into(),
            bytes: Some(bytes),
        }
    }
}

impl From<Completion> for Post {
    fn from(completion: Completion) -> Self {
        Self {
            value: completion.value,
            bytes: completion.bytes,
        }
    }
}

struct StoredPost {
    bytes: Vec<u8>,
    stored_at: Instant,
}

/// Binary attachments waiting to be fetched, keyed by post id.
///
/// Entries are one-shot: [`PostStore::take`] removes what it returns.
#[derive(Default)]
pub struct PostStore {
    posts: Mutex<HashMap<String, StoredPost>>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` and return the id the render side uses to fetch them.
    pub fn put(&self, bytes: Vec<u8>) -> String {
        let id = tether_common::new_post_id();
        debug!(post_id = %id, len = bytes.len(), "post stored");
        self.posts.lock().insert(
            id.clone(),
            StoredPost {
                bytes,
                stored_at: Instant::now(),
            },
        );
        id
    }

    pub fn take(&self, id: &str) -> Option<Vec<u8>> {
        self.posts.lock().remove(id).map(|p| p.bytes)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.posts.lock().contains_key(id)
    }

    /// Drop every post older than `ttl`. Returns how many were removed.
    pub fn expire(&self, ttl: Duration) -> usize {
        let mut posts = self.posts.lock();
        let before = posts.len();
        posts.retain(|_, p| p.stored_at.elapsed() < ttl);
        let removed = before - posts.len();
        if removed > 0 {
            debug!(removed, "expired stale posts");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.posts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.posts.lock().clear();
    }
}
