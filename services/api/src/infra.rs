use chrono::{NaiveDate, Utc};
use fama_intake::config::AppEnvironment;
use fama_intake::forms::event::{ConfirmationMessage, ConfirmationNotifier, NotifyError};
use fama_intake::forms::store::{
    Contact, RepositoryError, Stored, SubmissionId, SubmissionMeta, SubmissionRepository,
    SubmissionStatus,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) service: &'static str,
    pub(crate) environment: AppEnvironment,
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store standing in for the relational database.
pub(crate) struct InMemorySubmissionRepository<T> {
    state: Mutex<StoreState<T>>,
}

struct StoreState<T> {
    next_id: u64,
    records: Vec<Stored<T>>,
}

impl<T> Default for InMemorySubmissionRepository<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(StoreState {
                next_id: 1,
                records: Vec::new(),
            }),
        }
    }
}

impl<T> InMemorySubmissionRepository<T> {
    fn lock(&self) -> Result<MutexGuard<'_, StoreState<T>>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl<T> SubmissionRepository<T> for InMemorySubmissionRepository<T>
where
    T: Contact + Clone + Send + 'static,
{
    fn insert(&self, payload: T, meta: SubmissionMeta) -> Result<Stored<T>, RepositoryError> {
        let mut state = self.lock()?;
        let phone = payload.whatsapp();
        let phone_taken = state.records.iter().any(|record| {
            record.status == SubmissionStatus::Active && record.payload.whatsapp() == phone
        });
        if phone_taken {
            return Err(RepositoryError::Conflict);
        }

        let record = Stored {
            id: SubmissionId(state.next_id),
            created_at: Utc::now(),
            status: SubmissionStatus::Active,
            payload,
            meta,
        };
        state.next_id += 1;
        state.records.push(record.clone());
        Ok(record)
    }

    fn find_active_by_phone(&self, phone: &str) -> Result<Option<SubmissionId>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .records
            .iter()
            .find(|record| {
                record.status == SubmissionStatus::Active && record.payload.whatsapp() == phone
            })
            .map(|record| record.id))
    }

    fn list(&self) -> Result<Vec<Stored<T>>, RepositoryError> {
        Ok(self.lock()?.records.clone())
    }

    fn delete(&self, id: SubmissionId) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        let position = state
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or(RepositoryError::NotFound)?;
        state.records.remove(position);
        Ok(())
    }
}

/// Notifier that only records the confirmation in the log.
#[derive(Default, Clone)]
pub(crate) struct LoggingNotifier;

impl ConfirmationNotifier for LoggingNotifier {
    /// Brazilian mobile and landline numbers carry 12 or 13 digits with the country code.
    fn send(&self, message: &ConfirmationMessage) -> Result<(), NotifyError> {
        if !matches!(message.number.len(), 12 | 13) {
            return Err(NotifyError::UnknownNumber(message.number.clone()));
        }
        tracing::info!(
            number = %message.number,
            chars = message.text.chars().count(),
            "confirmation queued"
        );
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
