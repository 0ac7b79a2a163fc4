use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::forms::broker::{
    broker_router, questionnaire_schema, AnswerPointsTable, BrokerApplicationService,
    CandidateRanker, CandidateRecord,
};
use crate::forms::rules::{FieldValue, SubmissionRaw, ValidatedRecord};
use crate::forms::store::{
    Contact, RepositoryError, Stored, SubmissionId, SubmissionMeta, SubmissionRepository,
    SubmissionStatus,
};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).expect("valid date")
}

/// A complete questionnaire where every scored question gets its best answer.
pub(super) fn submission() -> SubmissionRaw {
    let mut raw = SubmissionRaw::new()
        .with("nome", "Maria Souza")
        .with("whatsapp", "(11) 98765-4321")
        .with("nascimento", "1995-05-10")
        .with("instagram", "@maria.souza")
        .with("relacionamento", "Solteiro(a)")
        .with("temFilho", "NÃO")
        .with("religiao", "NÃO")
        .with("cidadeNascimento", "Campinas")
        .with("cidadeMora", "São Paulo")
        .with("comQuemMora", "Com os pais")
        .with("formacaoAcademica", "Ensino Superior")
        .with("statusFormacao", "Cursando")
        .with("instituicao", "Universidade de São Paulo")
        .with("curso", "Administração")
        .with("periodoAtual", "5º semestre")
        .with("modalidade", "Presencial")
        .with("turno", "Noturno")
        .with("motivoCorretor", "Quero construir carreira no mercado imobiliário")
        .with("conheceMercado", "Acompanho lançamentos na minha região")
        .with("decisaoRapida", "Avalio os dados e decido junto com o cliente");

    for (question, answer) in best_answers() {
        raw.insert(question, answer);
    }
    raw
}

pub(super) fn best_answers() -> Vec<(&'static str, &'static str)> {
    AnswerPointsTable::standard()
        .questions()
        .iter()
        .map(|question| {
            let best = question
                .answers()
                .find(|answer| question.points_for(answer) == question.max_points())
                .expect("every question has a best answer");
            (question.key(), best)
        })
        .collect()
}

/// Validated answers built from `submission()` with the given overrides.
pub(super) fn answers_with(overrides: &[(&str, &str)]) -> ValidatedRecord {
    let mut raw = submission();
    for (field, value) in overrides {
        raw.insert(*field, *value);
    }
    questionnaire_schema()
        .validate(&raw, today())
        .expect("fixture validates")
}

pub(super) fn candidate(
    id: u64,
    minute: i64,
    name: &str,
    mut answers: ValidatedRecord,
) -> CandidateRecord {
    answers.insert("nome", FieldValue::Text(name.to_string()));
    Stored {
        id: SubmissionId(id),
        created_at: base_time() + Duration::minutes(minute),
        status: SubmissionStatus::Active,
        payload: answers,
        meta: SubmissionMeta::default(),
    }
}

pub(super) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn build_service() -> (BrokerApplicationService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = BrokerApplicationService::new(repository.clone(), CandidateRanker::default());
    (service, repository)
}

pub(super) fn router_with_service(
    service: BrokerApplicationService<MemoryRepository>,
) -> axum::Router {
    broker_router(Arc::new(service))
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<Vec<CandidateRecord>>,
}

impl MemoryRepository {
    pub(super) fn seed(&self, record: CandidateRecord) {
        self.records.lock().expect("repository mutex poisoned").push(record);
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl SubmissionRepository<ValidatedRecord> for MemoryRepository {
    fn insert(
        &self,
        payload: ValidatedRecord,
        meta: SubmissionMeta,
    ) -> Result<CandidateRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|record| {
            record.status == SubmissionStatus::Active
                && record.payload.whatsapp() == payload.whatsapp()
        }) {
            return Err(RepositoryError::Conflict);
        }
        let next = guard.iter().map(|record| record.id.0).max().unwrap_or(0) + 1;
        let record = Stored {
            id: SubmissionId(next),
            created_at: base_time() + Duration::minutes(next as i64),
            status: SubmissionStatus::Active,
            payload,
            meta,
        };
        guard.push(record.clone());
        Ok(record)
    }

    fn find_active_by_phone(&self, phone: &str) -> Result<Option<SubmissionId>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .find(|record| {
                record.status == SubmissionStatus::Active && record.payload.whatsapp() == phone
            })
            .map(|record| record.id))
    }

    fn list(&self) -> Result<Vec<CandidateRecord>, RepositoryError> {
        Ok(self.records.lock().expect("repository mutex poisoned").clone())
    }

    fn delete(&self, id: SubmissionId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let before = guard.len();
        guard.retain(|record| record.id != id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl SubmissionRepository<ValidatedRecord> for UnavailableRepository {
    fn insert(
        &self,
        _payload: ValidatedRecord,
        _meta: SubmissionMeta,
    ) -> Result<CandidateRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_active_by_phone(&self, _phone: &str) -> Result<Option<SubmissionId>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<CandidateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: SubmissionId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Sees no active phone on lookup but loses the write to a concurrent submission.
pub(super) struct RacedRepository;

impl SubmissionRepository<ValidatedRecord> for RacedRepository {
    fn insert(
        &self,
        _payload: ValidatedRecord,
        _meta: SubmissionMeta,
    ) -> Result<CandidateRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn find_active_by_phone(&self, _phone: &str) -> Result<Option<SubmissionId>, RepositoryError> {
        Ok(None)
    }

    fn list(&self) -> Result<Vec<CandidateRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    fn delete(&self, _id: SubmissionId) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
