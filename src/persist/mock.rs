//! In-memory saved-query store for testing.

use super::{NewSavedQuery, SavedQueryStore};
use crate::error::{DashError, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// Collects inserts in memory and hands out sequential ids.
#[derive(Default)]
pub struct MemorySavedQueryStore {
    saved: Mutex<Vec<NewSavedQuery>>,
    fail: bool,
}

impl MemorySavedQueryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose inserts always fail.
    pub fn failing() -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn saved(&self) -> Vec<NewSavedQuery> {
        self.saved.lock().expect("store lock poisoned").clone()
    }
}

#[async_trait]
impl SavedQueryStore for MemorySavedQueryStore {
    async fn insert(&self, query: NewSavedQuery) -> Result<u64> {
        if self.fail {
            return Err(DashError::store("insert failed"));
        }
        let mut saved = self.saved.lock().expect("store lock poisoned");
        saved.push(query);
        Ok(saved.len() as u64)
    }
}
