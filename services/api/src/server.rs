use crate::cli::ServeArgs;
use crate::infra::{AdminState, AppState, FsContentStore, InMemoryCandidateRepository};
use crate::routes::with_intake_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use enrollment::config::{AppConfig, AppEnvironment};
use enrollment::error::AppError;
use enrollment::intake::{IntakePolicy, IntakeService};
use enrollment::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if args.relaxed {
        config.intake.policy = IntakePolicy::Relaxed;
    }

    telemetry::init(&config.telemetry)?;

    if config.intake.policy == IntakePolicy::Relaxed {
        warn!("relaxed intake policy active: duplicate and requirement checks are bypassed");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };
    let admin_state = AdminState::new(
        &config.admin,
        config.environment == AppEnvironment::Production,
    );

    let repository = Arc::new(InMemoryCandidateRepository::default());
    let store = Arc::new(FsContentStore::new(config.storage.upload_dir.clone()));
    let intake_service = Arc::new(IntakeService::new(repository, store, config.intake.policy));

    let app = with_intake_routes(intake_service)
        .layer(Extension(app_state))
        .layer(Extension(admin_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        policy = config.intake.policy.label(),
        "enrollment intake service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
