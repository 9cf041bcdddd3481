//! Lifecycle store: create, update, trigger, cancel and clear notification records.

use std::collections::BTreeMap;

use tokio::sync::RwLock;
use tracing::debug;

use tidings_core::error::AppError;
use tidings_core::result::AppResult;
use tidings_core::types::NotificationId;
use tidings_entity::notification::{
    NotificationOptions, NotificationRecord, NotificationState, Scope,
};

/// Records keyed by identifier.
#[derive(Debug, Default)]
struct StoreInner {
    records: BTreeMap<NotificationId, NotificationRecord>,
}

impl StoreInner {
    fn has_active(&self, id: NotificationId) -> bool {
        self.records
            .get(&id)
            .is_some_and(|record| record.state.is_active())
    }

    /// Next identifier above every retained record.
    fn next_free_id(&self) -> AppResult<NotificationId> {
        let next = match self.records.keys().next_back() {
            Some(last) => last.get().checked_add(1).ok_or_else(|| {
                AppError::validation(format!(
                    "Notification id space exhausted above {last}; pass an explicit id"
                ))
            })?,
            None => 1,
        };
        Ok(NotificationId(next.max(1)))
    }

    fn insert_scheduled(
        &mut self,
        id: NotificationId,
        options: NotificationOptions,
    ) -> AppResult<NotificationRecord> {
        if self.has_active(id) {
            return Err(AppError::duplicate_id(format!(
                "Notification {id} is already active"
            )));
        }

        let record = NotificationRecord::scheduled(id, options);
        self.records.insert(id, record.clone());
        debug!(id = %id, "Notification scheduled");
        Ok(record)
    }
}

/// In-memory lifecycle store guarded by a single-writer lock.
#[derive(Debug, Default)]
pub struct LifecycleStore {
    inner: RwLock<StoreInner>,
}

impl LifecycleStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a notification under an explicit identifier.
    ///
    /// Fails with `DuplicateId` while a scheduled or triggered record with
    /// the same id exists. A cleared record is replaced by a fresh one.
    pub async fn schedule(
        &self,
        id: NotificationId,
        options: NotificationOptions,
    ) -> AppResult<NotificationRecord> {
        let mut inner = self.inner.write().await;
        inner.insert_scheduled(id, options)
    }

    /// Schedules a notification, taking its id from the options or
    /// assigning the next free one under the same write lock.
    pub async fn schedule_new(&self, options: NotificationOptions) -> AppResult<NotificationRecord> {
        let mut inner = self.inner.write().await;
        let id = match options.id() {
            Some(id) => id,
            None => inner.next_free_id()?,
        };
        inner.insert_scheduled(id, options)
    }

    /// Merges new option fields into an existing record, keeping its state.
    pub async fn update(
        &self,
        id: NotificationId,
        options: &NotificationOptions,
    ) -> AppResult<NotificationRecord> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;

        record.options.merge(options);
        let state = record.state;
        record.transition(state);
        debug!(id = %id, state = %state, "Notification updated");
        Ok(record.clone())
    }

    /// Moves a scheduled record to triggered.
    pub async fn trigger(&self, id: NotificationId) -> AppResult<NotificationRecord> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;

        if record.state != NotificationState::Scheduled {
            return Err(AppError::invalid_state(format!(
                "Notification {id} cannot trigger from state {}",
                record.state
            )));
        }

        record.transition(NotificationState::Triggered);
        debug!(id = %id, "Notification triggered");
        Ok(record.clone())
    }

    /// Removes a record and returns its last state marked as canceled.
    ///
    /// Returns `None` for an unknown id.
    pub async fn cancel(&self, id: NotificationId) -> Option<NotificationRecord> {
        let mut inner = self.inner.write().await;
        let mut record = inner.records.remove(&id)?;
        record.transition(NotificationState::Canceled);
        debug!(id = %id, "Notification canceled");
        Some(record)
    }

    /// Cancels every active record and returns them. Cleared history is kept.
    pub async fn cancel_all(&self) -> Vec<NotificationRecord> {
        let mut inner = self.inner.write().await;
        let active: Vec<NotificationId> = inner
            .records
            .values()
            .filter(|record| record.state.is_active())
            .map(|record| record.id)
            .collect();

        let canceled: Vec<NotificationRecord> = active
            .into_iter()
            .filter_map(|id| inner.records.remove(&id))
            .map(|mut record| {
                record.transition(NotificationState::Canceled);
                record
            })
            .collect();

        debug!(count = canceled.len(), "All notifications canceled");
        canceled
    }

    /// Moves a triggered record to cleared.
    ///
    /// Returns `None` if the record is absent or not triggered.
    pub async fn clear(&self, id: NotificationId) -> Option<NotificationRecord> {
        let mut inner = self.inner.write().await;
        let record = inner.records.get_mut(&id)?;
        if record.state != NotificationState::Triggered {
            return None;
        }

        record.transition(NotificationState::Cleared);
        debug!(id = %id, "Notification cleared");
        Some(record.clone())
    }

    /// Clears every triggered record and drops the cleared history.
    ///
    /// Returns the records that were triggered before the call.
    pub async fn clear_all(&self) -> Vec<NotificationRecord> {
        let mut inner = self.inner.write().await;
        let mut cleared = Vec::new();

        inner.records.retain(|_, record| match record.state {
            NotificationState::Triggered => {
                let mut snapshot = record.clone();
                snapshot.transition(NotificationState::Cleared);
                cleared.push(snapshot);
                false
            }
            NotificationState::Cleared => false,
            _ => true,
        });

        debug!(count = cleared.len(), "All notifications cleared");
        cleared
    }

    /// Returns the record with the given id in any retained state.
    pub async fn get(&self, id: NotificationId) -> Option<NotificationRecord> {
        self.inner.read().await.records.get(&id).cloned()
    }

    /// Whether a record with the given id exists within `scope`.
    pub async fn exists(&self, id: NotificationId, scope: Scope) -> bool {
        self.inner
            .read()
            .await
            .records
            .get(&id)
            .is_some_and(|record| scope.matches(record.state))
    }

    /// Identifiers of every record within `scope`.
    pub async fn ids_by_scope(&self, scope: Scope) -> Vec<NotificationId> {
        self.inner
            .read()
            .await
            .records
            .values()
            .filter(|record| scope.matches(record.state))
            .map(|record| record.id)
            .collect()
    }

    /// Every record within `scope`.
    pub async fn records_by_scope(&self, scope: Scope) -> Vec<NotificationRecord> {
        self.inner
            .read()
            .await
            .records
            .values()
            .filter(|record| scope.matches(record.state))
            .cloned()
            .collect()
    }

    /// Records for the requested ids, in request order, filtered by scope.
    ///
    /// Unknown ids and ids outside the scope are skipped.
    pub async fn records_by_ids_and_scope(
        &self,
        ids: &[NotificationId],
        scope: Scope,
    ) -> Vec<NotificationRecord> {
        let inner = self.inner.read().await;
        ids.iter()
            .filter_map(|id| inner.records.get(id))
            .filter(|record| scope.matches(record.state))
            .cloned()
            .collect()
    }

    /// Number of retained records.
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }
}
