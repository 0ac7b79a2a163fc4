//! Response envelopes and request metadata shared by the form routers.

use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use super::rules::{FieldError, PHONE_FIELD};
use super::store::{RepositoryError, SubmissionId, SubmissionMeta};

const INVALID_FORM_MESSAGE: &str = "Dados inválidos no formulário";
const DUPLICATE_PHONE_MESSAGE: &str = "Já existe uma inscrição ativa com este WhatsApp.";
const DUPLICATE_PHONE_FIELD_MESSAGE: &str = "WhatsApp já cadastrado";
const BODY_FIELD: &str = "body";
const MALFORMED_BODY_MESSAGE: &str = "Envie os dados do formulário como um objeto JSON";
const INVALID_ID_MESSAGE: &str = "ID inválido";
const INTERNAL_ERROR_MESSAGE: &str = "Erro interno do servidor. Tente novamente.";

/// Client address and agent, preferring proxy headers.
pub(crate) fn submission_meta(headers: &HeaderMap) -> SubmissionMeta {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    let ip_address = header("x-forwarded-for")
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .or_else(|| header("x-real-ip"))
        .map(str::to_string);

    SubmissionMeta {
        ip_address,
        user_agent: header("user-agent").map(str::to_string),
    }
}

pub(crate) fn created(message: &str, data: Value) -> Response {
    let payload = json!({
        "success": true,
        "message": message,
        "data": data,
    });
    (StatusCode::CREATED, axum::Json(payload)).into_response()
}

pub(crate) fn deleted(message: &str, id: SubmissionId) -> Response {
    let payload = json!({
        "success": true,
        "message": message,
        "id": id,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) fn validation_failed(errors: &[FieldError]) -> Response {
    let payload = json!({
        "success": false,
        "message": INVALID_FORM_MESSAGE,
        "errors": errors,
    });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

/// A body axum could not read as a JSON object gets the validation envelope too.
pub(crate) fn malformed_body(rejection: &JsonRejection) -> Response {
    tracing::debug!(status = %rejection.status(), reason = %rejection.body_text(), "body rejected");
    let payload = json!({
        "success": false,
        "message": INVALID_FORM_MESSAGE,
        "errors": [{
            "field": BODY_FIELD,
            "message": MALFORMED_BODY_MESSAGE,
        }],
    });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

pub(crate) fn duplicate_phone() -> Response {
    let payload = json!({
        "success": false,
        "message": DUPLICATE_PHONE_MESSAGE,
        "errors": [{
            "field": PHONE_FIELD,
            "message": DUPLICATE_PHONE_FIELD_MESSAGE,
        }],
    });
    (StatusCode::CONFLICT, axum::Json(payload)).into_response()
}

pub(crate) fn invalid_id() -> Response {
    failure(StatusCode::BAD_REQUEST, INVALID_ID_MESSAGE)
}

pub(crate) fn not_found(message: &str) -> Response {
    failure(StatusCode::NOT_FOUND, message)
}

/// Maps a storage failure; `not_found_message` is used for missing ids.
pub(crate) fn repository_failure(error: &RepositoryError, not_found_message: &str) -> Response {
    match error {
        RepositoryError::NotFound => not_found(not_found_message),
        RepositoryError::Conflict => duplicate_phone(),
        RepositoryError::Unavailable(_) => {
            tracing::error!(error = %error, "repository request failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
        }
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    let payload = json!({
        "success": false,
        "message": message,
    });
    (status, axum::Json(payload)).into_response()
}
