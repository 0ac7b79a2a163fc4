use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde_json::json;

use crate::forms::http;
use crate::forms::rules::{SubmissionRaw, ValidatedRecord};
use crate::forms::store::{SubmissionId, SubmissionRepository};

use super::service::{BrokerApplicationService, BrokerServiceError};

const SUBMITTED_MESSAGE: &str = "Inscrição enviada com sucesso!";
const DELETED_MESSAGE: &str = "Candidato excluído com sucesso";
const NOT_FOUND_MESSAGE: &str = "Candidato não encontrado";

/// Router exposing questionnaire intake plus the admin listing, ranking, and delete endpoints.
pub fn broker_router<R>(service: Arc<BrokerApplicationService<R>>) -> Router
where
    R: SubmissionRepository<ValidatedRecord> + 'static,
{
    Router::new()
        .route("/api/inscricoes", post(submit_handler::<R>))
        .route("/submit-form", post(submit_handler::<R>))
        .route("/api/admin/inscricoes", get(list_handler::<R>))
        .route("/api/admin/inscricoes-ranking", get(ranking_handler::<R>))
        .route("/api/admin/inscricoes/:id", delete(delete_handler::<R>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<BrokerApplicationService<R>>>,
    headers: HeaderMap,
    payload: Result<axum::Json<SubmissionRaw>, JsonRejection>,
) -> Response
where
    R: SubmissionRepository<ValidatedRecord> + 'static,
{
    let axum::Json(raw) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return http::malformed_body(&rejection),
    };

    match service.submit(raw, http::submission_meta(&headers)) {
        Ok(stored) => http::created(
            SUBMITTED_MESSAGE,
            json!({
                "id": stored.id,
                "created_at": stored.created_at,
            }),
        ),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<BrokerApplicationService<R>>>,
) -> Response
where
    R: SubmissionRepository<ValidatedRecord> + 'static,
{
    match service.list() {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn ranking_handler<R>(
    State(service): State<Arc<BrokerApplicationService<R>>>,
) -> Response
where
    R: SubmissionRepository<ValidatedRecord> + 'static,
{
    match service.ranking() {
        Ok(ranking) => (StatusCode::OK, axum::Json(ranking)).into_response(),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<BrokerApplicationService<R>>>,
    Path(raw_id): Path<String>,
) -> Response
where
    R: SubmissionRepository<ValidatedRecord> + 'static,
{
    let Some(id) = SubmissionId::parse(&raw_id) else {
        return http::invalid_id();
    };

    match service.delete(id) {
        Ok(()) => http::deleted(DELETED_MESSAGE, id),
        Err(error) => service_failure(error),
    }
}

fn service_failure(error: BrokerServiceError) -> Response {
    match error {
        BrokerServiceError::Validation(errors) => http::validation_failed(&errors),
        BrokerServiceError::DuplicatePhone(_) => http::duplicate_phone(),
        BrokerServiceError::Repository(error) => {
            http::repository_failure(&error, NOT_FOUND_MESSAGE)
        }
    }
}
