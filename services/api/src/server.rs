use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySubmissionRepository};
use crate::routes::with_questionnaire_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use nis2_scope::config::AppConfig;
use nis2_scope::error::AppError;
use nis2_scope::questionnaire::AssessmentService;
use nis2_scope::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemorySubmissionRepository::default());
    let assessment_service = Arc::new(AssessmentService::with_fallback_capacity(
        repository,
        config.submissions.fallback_capacity,
    ));

    let app = with_questionnaire_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        fallback_capacity = config.submissions.fallback_capacity,
        "applicability questionnaire ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
