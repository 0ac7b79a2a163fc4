use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::forms::rules::{FieldError, SubmissionRaw};
use crate::forms::store::{
    in_submission_order, Contact, RepositoryError, SubmissionId, SubmissionMeta,
    SubmissionRepository,
};

use super::notify::{ConfirmationMessage, ConfirmationNotifier};
use super::registration::{EventRegistration, RegistrationRecord};
use super::schema::registration_schema;

/// Outcome of an accepted registration.
#[derive(Debug, Clone)]
pub struct Registered {
    pub record: RegistrationRecord,
    pub whatsapp_sent: bool,
}

/// Service composing the registration schema, the registration store, and the notifier.
pub struct EventRegistrationService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
}

impl<R, N> EventRegistrationService<R, N>
where
    R: SubmissionRepository<EventRegistration> + 'static,
    N: ConfirmationNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    pub fn register(
        &self,
        raw: SubmissionRaw,
        meta: SubmissionMeta,
    ) -> Result<Registered, EventServiceError> {
        self.register_on(raw, meta, Local::now().date_naive())
    }

    /// Validate, guard against an active duplicate, persist, then send the confirmation.
    pub fn register_on(
        &self,
        raw: SubmissionRaw,
        meta: SubmissionMeta,
        today: NaiveDate,
    ) -> Result<Registered, EventServiceError> {
        let registration = registration_schema()
            .validate(&raw, today)
            .and_then(|record| EventRegistration::try_from(record).map_err(|error| vec![error]))
            .map_err(|errors| {
                tracing::info!(error_count = errors.len(), "event registration rejected");
                EventServiceError::Validation(errors)
            })?;

        if let Some(existing) = self
            .repository
            .find_active_by_phone(registration.whatsapp())?
        {
            tracing::info!(existing = %existing, "duplicate event registration");
            return Err(EventServiceError::DuplicatePhone(
                registration.whatsapp().to_string(),
            ));
        }

        let phone = registration.whatsapp().to_string();
        let record = self
            .repository
            .insert(registration, meta)
            .map_err(|error| match error {
                RepositoryError::Conflict => EventServiceError::DuplicatePhone(phone),
                other => other.into(),
            })?;
        tracing::info!(
            id = %record.id,
            registrant = record.payload.name(),
            "event registration accepted"
        );

        let message = ConfirmationMessage::for_registrant(&record.payload);
        let whatsapp_sent = match self.notifier.send(&message) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(id = %record.id, error = %error, "confirmation not sent");
                false
            }
        };

        Ok(Registered {
            record,
            whatsapp_sent,
        })
    }

    /// Every registration, newest first.
    pub fn list(&self) -> Result<Vec<RegistrationRecord>, EventServiceError> {
        let mut records = self.repository.list()?;
        in_submission_order(&mut records);
        records.reverse();
        Ok(records)
    }

    pub fn delete(&self, id: SubmissionId) -> Result<(), EventServiceError> {
        self.repository.delete(id)?;
        tracing::info!(id = %id, "event registration deleted");
        Ok(())
    }
}

/// Error raised by the registration service.
#[derive(Debug, thiserror::Error)]
pub enum EventServiceError {
    #[error("registration failed validation on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("an active registration already uses whatsapp {0}")]
    DuplicatePhone(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
