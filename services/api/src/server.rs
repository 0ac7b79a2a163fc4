use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySubmissionRepository, LoggingNotifier};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fama_intake::config::{AppConfig, ServerConfig};
use fama_intake::error::AppError;
use fama_intake::forms::broker::{
    broker_router, BrokerApplicationService, CandidateRanker, ScoringEngine,
};
use fama_intake::forms::event::{event_router, EventRegistration, EventRegistrationService};
use fama_intake::forms::rules::ValidatedRecord;
use fama_intake::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Which of the two form APIs a process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Surface {
    Questionnaire,
    Events,
}

impl Surface {
    pub(crate) const fn service_name(self) -> &'static str {
        match self {
            Surface::Questionnaire => "broker-questionnaire-api",
            Surface::Events => "event-inscriptions-api",
        }
    }
}

pub(crate) async fn run(surface: Surface, mut args: ServeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let mut server = match surface {
        Surface::Questionnaire => config.server.clone(),
        Surface::Events => config.event_server.clone(),
    };

    if let Some(host) = args.host.take() {
        server.host = host;
    }
    if let Some(port) = args.port.take() {
        server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        service: surface.service_name(),
        environment: config.environment,
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let router = match surface {
        Surface::Questionnaire => {
            let ranker = CandidateRanker::new(ScoringEngine::default(), config.ranking.top_n);
            let service = Arc::new(BrokerApplicationService::new(
                Arc::new(InMemorySubmissionRepository::<ValidatedRecord>::default()),
                ranker,
            ));
            broker_router(service)
        }
        Surface::Events => {
            let service = Arc::new(EventRegistrationService::new(
                Arc::new(InMemorySubmissionRepository::<EventRegistration>::default()),
                Arc::new(LoggingNotifier),
            ));
            event_router(service)
        }
    };

    let app = with_operational_routes(router)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    serve(app, &server, surface, readiness_flag, &config).await
}

async fn serve(
    app: axum::Router,
    server: &ServerConfig,
    surface: Surface,
    readiness: Arc<AtomicBool>,
    config: &AppConfig,
) -> Result<(), AppError> {
    let addr = server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness.store(true, Ordering::Release);

    info!(
        environment = config.environment.label(),
        service = surface.service_name(),
        %addr,
        "form intake api ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
