use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::forms::broker::router::{delete_handler, submit_handler};
use crate::forms::broker::{BrokerApplicationService, CandidateRanker};
use crate::forms::rules::SubmissionRaw;

fn json_request(uri: &str, raw: &SubmissionRaw) -> Request<Body> {
    let body = serde_json::to_vec(&raw_as_json(raw)).expect("encode body");
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::USER_AGENT, "integration-test")
        .body(Body::from(body))
        .expect("request")
}

fn raw_as_json(raw: &SubmissionRaw) -> Value {
    raw.field_names()
        .map(|name| (name.to_string(), Value::from(raw.get(name).unwrap_or_default())))
        .collect::<serde_json::Map<String, Value>>()
        .into()
}

#[tokio::test]
async fn submit_route_returns_created_with_id() {
    let (service, repository) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request("/api/inscricoes", &submission()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Inscrição enviada com sucesso!");
    assert_eq!(body["data"]["id"], 1);
    assert!(body["data"]["created_at"].is_string());
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn legacy_submit_alias_is_routed() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request("/submit-form", &submission()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn submit_handler_returns_bad_request_with_field_errors() {
    let (service, _) = build_service();
    let mut raw = submission();
    raw.insert("whatsapp", "12345");

    let response = submit_handler::<MemoryRepository>(
        State(Arc::new(service)),
        HeaderMap::new(),
        Ok(axum::Json(raw)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"][0]["field"], "whatsapp");
    assert_eq!(body["errors"][0]["value"], "12345");
}

#[tokio::test]
async fn submit_handler_returns_conflict_on_duplicate_phone() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    service
        .submit(submission(), Default::default())
        .expect("first submission");

    let response = submit_handler::<MemoryRepository>(
        State(service),
        HeaderMap::new(),
        Ok(axum::Json(submission())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json_body(response).await;
    assert_eq!(body["errors"][0]["field"], "whatsapp");
    assert_eq!(body["errors"][0]["message"], "WhatsApp já cadastrado");
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(BrokerApplicationService::new(
        Arc::new(UnavailableRepository),
        CandidateRanker::default(),
    ));

    let response = submit_handler::<UnavailableRepository>(
        State(service),
        HeaderMap::new(),
        Ok(axum::Json(submission())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn ranking_route_returns_candidates_and_stats() {
    let (service, repository) = build_service();
    repository.seed(candidate(1, 0, "Ana", answers_with(&[])));
    repository.seed(candidate(
        2,
        1,
        "Bruno",
        answers_with(&[("pressao", "Não gosto e não me saio bem")]),
    ));
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/admin/inscricoes-ranking")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["candidates"][0]["nome"], "Ana");
    assert_eq!(body["candidates"][1]["score"]["total_score"], 43);
    assert_eq!(body["stats"]["total_candidates"], 2);
    assert_eq!(body["stats"]["average_score"], 45.0);
}

#[tokio::test]
async fn admin_listing_route_returns_plain_array() {
    let (service, repository) = build_service();
    repository.seed(candidate(1, 0, "Ana", answers_with(&[])));
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/admin/inscricoes")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], 1);
}

#[tokio::test]
async fn delete_handler_validates_ids() {
    let (service, repository) = build_service();
    repository.seed(candidate(9, 0, "Ana", answers_with(&[])));
    let service = Arc::new(service);

    let invalid =
        delete_handler::<MemoryRepository>(State(service.clone()), Path("-1".to_string())).await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let missing =
        delete_handler::<MemoryRepository>(State(service.clone()), Path("10".to_string())).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(missing).await;
    assert_eq!(body["message"], "Candidato não encontrado");

    let deleted =
        delete_handler::<MemoryRepository>(State(service), Path("9".to_string())).await;
    assert_eq!(deleted.status(), StatusCode::OK);
    let body = read_json_body(deleted).await;
    assert_eq!(body["id"], 9);
    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn non_object_body_gets_the_validation_envelope() {
    let (service, repository) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/inscricoes")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("[1,2]"))
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Dados inválidos no formulário");
    assert_eq!(body["errors"][0]["field"], "body");
    assert_eq!(repository.len(), 0);
}
