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
use crate::forms::rules::SubmissionRaw;
use crate::forms::store::{SubmissionId, SubmissionRepository};

use super::notify::ConfirmationNotifier;
use super::registration::EventRegistration;
use super::service::{EventRegistrationService, EventServiceError};

const REGISTERED_MESSAGE: &str = "Inscrição para o evento enviada com sucesso!";
const DELETED_MESSAGE: &str = "Inscrição excluída com sucesso";
const NOT_FOUND_MESSAGE: &str = "Inscrição não encontrada";

/// Router exposing event registration plus the admin listing and delete endpoints.
pub fn event_router<R, N>(service: Arc<EventRegistrationService<R, N>>) -> Router
where
    R: SubmissionRepository<EventRegistration> + 'static,
    N: ConfirmationNotifier + 'static,
{
    Router::new()
        .route("/api/evento-inscricoes", post(register_handler::<R, N>))
        .route("/api/event-inscricoes", get(list_handler::<R, N>))
        .route("/api/event-inscricoes/:id", delete(delete_handler::<R, N>))
        .with_state(service)
}

pub(crate) async fn register_handler<R, N>(
    State(service): State<Arc<EventRegistrationService<R, N>>>,
    headers: HeaderMap,
    payload: Result<axum::Json<SubmissionRaw>, JsonRejection>,
) -> Response
where
    R: SubmissionRepository<EventRegistration> + 'static,
    N: ConfirmationNotifier + 'static,
{
    let axum::Json(raw) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return http::malformed_body(&rejection),
    };

    match service.register(raw, http::submission_meta(&headers)) {
        Ok(registered) => http::created(
            REGISTERED_MESSAGE,
            json!({
                "id": registered.record.id,
                "created_at": registered.record.created_at,
                "whatsapp_sent": registered.whatsapp_sent,
            }),
        ),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn list_handler<R, N>(
    State(service): State<Arc<EventRegistrationService<R, N>>>,
) -> Response
where
    R: SubmissionRepository<EventRegistration> + 'static,
    N: ConfirmationNotifier + 'static,
{
    match service.list() {
        Ok(records) => {
            let payload = json!({
                "success": true,
                "total": records.len(),
                "data": records,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn delete_handler<R, N>(
    State(service): State<Arc<EventRegistrationService<R, N>>>,
    Path(raw_id): Path<String>,
) -> Response
where
    R: SubmissionRepository<EventRegistration> + 'static,
    N: ConfirmationNotifier + 'static,
{
    let Some(id) = SubmissionId::parse(&raw_id) else {
        return http::invalid_id();
    };

    match service.delete(id) {
        Ok(()) => http::deleted(DELETED_MESSAGE, id),
        Err(error) => service_failure(error),
    }
}

fn service_failure(error: EventServiceError) -> Response {
    match error {
        EventServiceError::Validation(errors) => http::validation_failed(&errors),
        EventServiceError::DuplicatePhone(_) => http::duplicate_phone(),
        EventServiceError::Repository(error) => http::repository_failure(&error, NOT_FOUND_MESSAGE),
    }
}
