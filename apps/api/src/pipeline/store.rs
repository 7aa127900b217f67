#![allow(dead_code)]

//! Shared result store: job_id -> ResultRecord.
//!
//! The only writer is the worker loop; readers are any number of polling
//! batch coordinators. A missing entry means the job is still Pending.
//! Every `put` signals waiters, so coordinators wake on completion instead
//! of spinning; they still re-check on a bounded interval in case a put
//! lands between their check and their wait.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Notify, RwLock};
use uuid::Uuid;

use crate::pipeline::job::ResultRecord;

#[derive(Clone, Default)]
pub struct ResultStore {
    inner: Arc<RwLock<HashMap<Uuid, ResultRecord>>>,
    changed: Arc<Notify>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the record for a job and wakes all waiters.
    pub async fn put(&self, record: ResultRecord) {
        {
            let mut map = self.inner.write().await;
            map.insert(record.job_id, record);
        }
        self.changed.notify_waiters();
    }

    pub async fn get(&self, job_id: Uuid) -> Option<ResultRecord> {
        self.inner.read().await.get(&job_id).cloned()
    }

    /// Returns the records present for the given ids; ids absent from the
    /// returned map are still Pending.
    pub async fn get_many(&self, job_ids: &[Uuid]) -> HashMap<Uuid, ResultRecord> {
        let map = self.inner.read().await;
        job_ids
            .iter()
            .filter_map(|id| map.get(id).map(|r| (*id, r.clone())))
            .collect()
    }

    /// Best-effort eviction after a batch has been reported.
    pub async fn remove_many(&self, job_ids: &[Uuid]) {
        let mut map = self.inner.write().await;
        for id in job_ids {
            map.remove(id);
        }
    }

    /// Waits until the next `put`, or for `fallback` — whichever comes
    /// first. Callers re-check the store after returning.
    pub async fn wait_for_put(&self, fallback: std::time::Duration) {
        let _ = tokio::time::timeout(fallback, self.changed.notified()).await;
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
