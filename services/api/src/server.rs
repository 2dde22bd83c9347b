use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryPerformanceStore};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use perf_eval::config::AppConfig;
use perf_eval::error::AppError;
use perf_eval::evaluations::PerformanceService;
use perf_eval::telemetry;
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

    let store = Arc::new(InMemoryPerformanceStore::with_reference_data(
        config.store.seed_demo_roster,
    ));
    let performance_service = Arc::new(PerformanceService::new(store, config.scoring.clone()));

    let app = with_operational_routes(performance_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        seeded = config.store.seed_demo_roster,
        efficiency_cap = config.scoring.efficiency_cap,
        "performance evaluation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
