use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::forms::rules::{FieldError, SubmissionRaw, ValidatedRecord};
use crate::forms::store::{
    in_submission_order, Contact, RepositoryError, SubmissionId, SubmissionMeta,
    SubmissionRepository,
};

use super::ranking::{CandidateRanker, Ranking};
use super::schema::questionnaire_schema;
use super::CandidateRecord;

/// Service composing the questionnaire schema, the candidate store, and the ranker.
pub struct BrokerApplicationService<R> {
    repository: Arc<R>,
    ranker: CandidateRanker,
}

impl<R> BrokerApplicationService<R>
where
    R: SubmissionRepository<ValidatedRecord> + 'static,
{
    pub fn new(repository: Arc<R>, ranker: CandidateRanker) -> Self {
        Self { repository, ranker }
    }

    /// Validate and persist a questionnaire using today's local date for the age check.
    pub fn submit(
        &self,
        raw: SubmissionRaw,
        meta: SubmissionMeta,
    ) -> Result<CandidateRecord, BrokerServiceError> {
        self.submit_on(raw, meta, Local::now().date_naive())
    }

    pub fn submit_on(
        &self,
        raw: SubmissionRaw,
        meta: SubmissionMeta,
        today: NaiveDate,
    ) -> Result<CandidateRecord, BrokerServiceError> {
        let record = questionnaire_schema()
            .validate(&raw, today)
            .map_err(|errors| {
                tracing::info!(error_count = errors.len(), "questionnaire rejected");
                for error in &errors {
                    tracing::debug!(
                        field = %error.field,
                        message = %error.message,
                        "field rejected"
                    );
                }
                BrokerServiceError::Validation(errors)
            })?;

        let phone = record.whatsapp().to_string();
        if let Some(existing) = self.repository.find_active_by_phone(&phone)? {
            tracing::info!(existing = %existing, "duplicate questionnaire phone");
            return Err(BrokerServiceError::DuplicatePhone(phone));
        }

        let stored = self
            .repository
            .insert(record, meta)
            .map_err(|error| match error {
                RepositoryError::Conflict => BrokerServiceError::DuplicatePhone(phone),
                other => other.into(),
            })?;
        tracing::info!(
            id = %stored.id,
            candidate = stored.payload.name(),
            ip = stored.meta.ip_address.as_deref().unwrap_or("-"),
            "questionnaire accepted"
        );
        Ok(stored)
    }

    /// Every stored questionnaire, newest first.
    pub fn list(&self) -> Result<Vec<CandidateRecord>, BrokerServiceError> {
        let mut records = self.repository.list()?;
        in_submission_order(&mut records);
        records.reverse();
        Ok(records)
    }

    /// Candidates ranked by score; equal scores keep submission order.
    pub fn ranking(&self) -> Result<Ranking, BrokerServiceError> {
        let mut records = self.repository.list()?;
        in_submission_order(&mut records);
        Ok(self.ranker.rank(records))
    }

    pub fn delete(&self, id: SubmissionId) -> Result<(), BrokerServiceError> {
        self.repository.delete(id)?;
        tracing::info!(id = %id, "questionnaire deleted");
        Ok(())
    }
}

/// Error raised by the questionnaire service.
#[derive(Debug, thiserror::Error)]
pub enum BrokerServiceError {
    #[error("questionnaire failed validation on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("an active questionnaire already uses whatsapp {0}")]
    DuplicatePhone(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
