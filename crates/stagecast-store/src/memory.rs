//! In-memory content store with per-record locking.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use stagecast_core::models::{ContentAction, ContentRecord, ContentStatus};
use stagecast_core::{ContentError, ContentResult};

use crate::traits::ContentStore;
use crate::transition::apply_transition;

/// Content store backed by a map of individually locked records.
///
/// The outer `RwLock` only guards membership; each record has its own
/// `Mutex`, so transitions on different ids never contend with each other
/// while transitions on the same id serialize.
#[derive(Clone, Default)]
pub struct InMemoryContentStore {
    records: Arc<RwLock<HashMap<Uuid, Arc<Mutex<ContentRecord>>>>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn slot(&self, id: Uuid) -> ContentResult<Arc<Mutex<ContentRecord>>> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ContentError::NotFound(id))
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn create(&self, record: ContentRecord) -> ContentResult<Uuid> {
        let id = record.id;
        let mut records = self.records.write().await;

        if records.contains_key(&id) {
            tracing::error!(record_id = %id, "Refusing to insert duplicate content record");
            return Err(ContentError::DuplicateId(id));
        }

        records.insert(id, Arc::new(Mutex::new(record)));
        tracing::debug!(record_id = %id, "Content record created");
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> ContentResult<ContentRecord> {
        let slot = self.slot(id).await?;
        let record = slot.lock().await.clone();
        Ok(record)
    }

    async fn list(&self, status: Option<ContentStatus>) -> ContentResult<Vec<ContentRecord>> {
        let slots: Vec<Arc<Mutex<ContentRecord>>> =
            self.records.read().await.values().cloned().collect();

        let mut records = Vec::with_capacity(slots.len());
        for slot in slots {
            let record = slot.lock().await;
            if status.map_or(true, |s| record.status == s) {
                records.push(record.clone());
            }
        }

        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(records)
    }

    async fn transition(&self, id: Uuid, action: ContentAction) -> ContentResult<ContentRecord> {
        let slot = self.slot(id).await?;
        let mut current = slot.lock().await;
        let action_name = action.name();

        let next = match apply_transition(&current, action, Utc::now()) {
            Ok(next) => next,
            Err(e) => {
                tracing::debug!(
                    record_id = %id,
                    status = %current.status,
                    action = action_name,
                    "Rejected content transition"
                );
                return Err(e);
            }
        };

        tracing::info!(
            record_id = %id,
            from = %current.status,
            to = %next.status,
            action = action_name,
            "Content record transitioned"
        );

        *current = next.clone();
        Ok(next)
    }
}
