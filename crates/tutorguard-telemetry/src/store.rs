//! Storage collaborator contract
//!
//! The gates never persist directly; they hand complete record batches to a
//! [`Store`]. A batch is the unit of atomicity: either every record in it is
//! applied or none is.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;
use tutorguard_core::{
    ApplicationId, ApplicationRecord, ApplicationStatus, ApplicationUpdate, Incident, Message,
    Notification, Record, StoreError,
};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Append/update contract used by the messaging and application gates
pub trait Store: Send + Sync {
    /// Apply every record or none of them
    fn append_batch(&self, records: Vec<Record>) -> StoreResult<()>;

    fn append(&self, record: Record) -> StoreResult<()> {
        self.append_batch(vec![record])
    }

    /// Apply a partial update and return the updated record
    fn update_application(
        &self,
        id: &ApplicationId,
        update: ApplicationUpdate,
    ) -> StoreResult<ApplicationRecord>;

    fn application(&self, id: &ApplicationId) -> StoreResult<ApplicationRecord>;

    /// Applications currently in `status`, oldest first
    fn applications_with_status(
        &self,
        status: ApplicationStatus,
    ) -> StoreResult<Vec<ApplicationRecord>>;
}

#[derive(Debug, Default)]
struct StoreState {
    incidents: Vec<Incident>,
    notifications: Vec<Notification>,
    messages: Vec<Message>,
    applications: Vec<ApplicationRecord>,
    application_index: HashMap<ApplicationId, usize>,
}

impl StoreState {
    fn insert(&mut self, record: Record) {
        match record {
            Record::Incident(incident) => self.incidents.push(incident),
            Record::Notification(notification) => self.notifications.push(notification),
            Record::Message(message) => self.messages.push(message),
            Record::Application(application) => {
                self.application_index
                    .insert(application.id.clone(), self.applications.len());
                self.applications.push(application);
            }
        }
    }
}

/// Process-local store; each batch is applied under one write lock
#[derive(Debug)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
    available: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an outage; while unavailable every call fails
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store is offline".to_string()))
        }
    }

    pub fn incidents(&self) -> Vec<Incident> {
        self.state.read().incidents.clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state.read().notifications.clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.read().messages.clone()
    }

    pub fn applications(&self) -> Vec<ApplicationRecord> {
        self.state.read().applications.clone()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for InMemoryStore {
    fn append_batch(&self, records: Vec<Record>) -> StoreResult<()> {
        self.ensure_available()?;
        let mut state = self.state.write();

        // Validate the whole batch before touching state
        let mut batch_ids = Vec::new();
        for record in &records {
            if let Record::Application(application) = record {
                if state.application_index.contains_key(&application.id)
                    || batch_ids.contains(&&application.id)
                {
                    return Err(StoreError::Conflict(application.id.to_string()));
                }
                batch_ids.push(&application.id);
            }
        }

        let count = records.len();
        for record in records {
            state.insert(record);
        }
        debug!(records = count, "Appended record batch");
        Ok(())
    }

    fn update_application(
        &self,
        id: &ApplicationId,
        update: ApplicationUpdate,
    ) -> StoreResult<ApplicationRecord> {
        self.ensure_available()?;
        let mut state = self.state.write();

        let index = *state
            .application_index
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let record = &mut state.applications[index];
        record.apply(update);
        Ok(record.clone())
    }

    fn application(&self, id: &ApplicationId) -> StoreResult<ApplicationRecord> {
        self.ensure_available()?;
        let state = self.state.read();

        state
            .application_index
            .get(id)
            .map(|&index| state.applications[index].clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn applications_with_status(
        &self,
        status: ApplicationStatus,
    ) -> StoreResult<Vec<ApplicationRecord>> {
        self.ensure_available()?;

        Ok(self
            .state
            .read()
            .applications
            .iter()
            .filter(|application| application.status == status)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorguard_core::{IncidentKind, Severity};

    fn incident() -> Record {
        Record::Incident(Incident::new(
            IncidentKind::PolicyViolation,
            Severity::Medium,
            "user-1",
            "some text",
        ))
    }

    #[test]
    fn test_append_routes_records() {
        let store = InMemoryStore::new();
        store
            .append_batch(vec![
                incident(),
                Record::Notification(Notification::admin("title", "body")),
            ])
            .unwrap();
        store
            .append(Record::Message(Message::new("c1", "u1", "u2", "hello")))
            .unwrap();

        assert_eq!(store.incidents().len(), 1);
        assert_eq!(store.notifications().len(), 1);
        assert_eq!(store.messages().len(), 1);
    }

    #[test]
    fn test_conflicting_batch_is_rejected_whole() {
        let store = InMemoryStore::new();
        let application = ApplicationRecord::pending("Ada", 80, Vec::new());
        store
            .append(Record::Application(application.clone()))
            .unwrap();

        let result = store.append_batch(vec![incident(), Record::Application(application)]);

        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert!(store.incidents().is_empty());
        assert_eq!(store.applications().len(), 1);
    }

    #[test]
    fn test_update_and_query_by_status() {
        let store = InMemoryStore::new();
        let application = ApplicationRecord::pending("Ada", 80, Vec::new());
        let id = application.id.clone();
        store.append(Record::Application(application)).unwrap();

        let updated = store
            .update_application(
                &id,
                ApplicationUpdate {
                    status: Some(ApplicationStatus::HeldByAi),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.status, ApplicationStatus::HeldByAi);
        assert_eq!(store.application(&id).unwrap().status, ApplicationStatus::HeldByAi);
        assert_eq!(
            store
                .applications_with_status(ApplicationStatus::HeldByAi)
                .unwrap()
                .len(),
            1
        );
        assert!(store
            .applications_with_status(ApplicationStatus::Pending)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_unknown_application() {
        let store = InMemoryStore::new();
        let id = ApplicationId("app_missing".to_string());

        assert_eq!(
            store.application(&id),
            Err(StoreError::NotFound("app_missing".to_string()))
        );
        assert!(store.update_application(&id, ApplicationUpdate::default()).is_err());
    }

    #[test]
    fn test_concurrent_batches_stay_paired() {
        let store = std::sync::Arc::new(InMemoryStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store
                            .append_batch(vec![
                                incident(),
                                Record::Notification(Notification::admin("title", "body")),
                            ])
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.incidents().len(), 200);
        assert_eq!(store.notifications().len(), 200);
    }

    #[test]
    fn test_unavailable_store_fails_every_call() {
        let store = InMemoryStore::new();
        store.set_available(false);

        assert!(matches!(store.append(incident()), Err(StoreError::Unavailable(_))));
        assert!(store.applications_with_status(ApplicationStatus::Submitted).is_err());

        store.set_available(true);
        assert!(store.append(incident()).is_ok());
    }
}
