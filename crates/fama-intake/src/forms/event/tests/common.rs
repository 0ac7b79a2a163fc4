use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::forms::event::{
    ConfirmationMessage, ConfirmationNotifier, EventRegistration, EventRegistrationService,
    NotifyError, RegistrationRecord,
};
use crate::forms::rules::SubmissionRaw;
use crate::forms::store::{
    Contact, RepositoryError, Stored, SubmissionId, SubmissionMeta, SubmissionRepository,
    SubmissionStatus,
};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).expect("valid date")
}

pub(super) fn registration() -> SubmissionRaw {
    SubmissionRaw::new()
        .with("nome", "Lucas Pereira")
        .with("whatsapp", "(31) 99123-4567")
        .with("nascimento", "2001-06-30")
        .with("instagram", "@lucas.pereira")
}

pub(super) fn build_service() -> (
    EventRegistrationService<MemoryRegistrations, RecordingNotifier>,
    Arc<MemoryRegistrations>,
    Arc<RecordingNotifier>,
) {
    let repository = Arc::new(MemoryRegistrations::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = EventRegistrationService::new(repository.clone(), notifier.clone());
    (service, repository, notifier)
}

#[derive(Default)]
pub(super) struct MemoryRegistrations {
    records: Mutex<BTreeMap<SubmissionId, RegistrationRecord>>,
}

impl MemoryRegistrations {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }

    pub(super) fn deactivate(&self, id: SubmissionId) {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if let Some(record) = guard.get_mut(&id) {
            record.status = SubmissionStatus::Inactive;
        }
    }
}

impl SubmissionRepository<EventRegistration> for MemoryRegistrations {
    fn insert(
        &self,
        payload: EventRegistration,
        meta: SubmissionMeta,
    ) -> Result<RegistrationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.values().any(|record| {
            record.status == SubmissionStatus::Active
                && record.payload.whatsapp() == payload.whatsapp()
        }) {
            return Err(RepositoryError::Conflict);
        }
        let id = SubmissionId(guard.keys().last().map(|id| id.0).unwrap_or(0) + 1);
        let record = Stored {
            id,
            created_at: Utc::now(),
            status: SubmissionStatus::Active,
            payload,
            meta,
        };
        guard.insert(id, record.clone());
        Ok(record)
    }

    fn find_active_by_phone(&self, phone: &str) -> Result<Option<SubmissionId>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|record| {
                record.status == SubmissionStatus::Active && record.payload.whatsapp() == phone
            })
            .map(|record| record.id))
    }

    fn list(&self) -> Result<Vec<RegistrationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete(&self, id: SubmissionId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(&id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default)]
pub(super) struct RecordingNotifier {
    sent: Mutex<Vec<ConfirmationMessage>>,
}

impl RecordingNotifier {
    pub(super) fn sent(&self) -> Vec<ConfirmationMessage> {
        self.sent.lock().expect("notifier mutex poisoned").clone()
    }
}

impl ConfirmationNotifier for RecordingNotifier {
    fn send(&self, message: &ConfirmationMessage) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl ConfirmationNotifier for FailingNotifier {
    fn send(&self, message: &ConfirmationMessage) -> Result<(), NotifyError> {
        Err(NotifyError::UnknownNumber(message.number.clone()))
    }
}

/// Sees no active phone on lookup but loses the write to a concurrent registration.
pub(super) struct RacedRegistrations;

impl SubmissionRepository<EventRegistration> for RacedRegistrations {
    fn insert(
        &self,
        _payload: EventRegistration,
        _meta: SubmissionMeta,
    ) -> Result<RegistrationRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn find_active_by_phone(&self, _phone: &str) -> Result<Option<SubmissionId>, RepositoryError> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<RegistrationRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    fn delete(&self, _id: SubmissionId) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
