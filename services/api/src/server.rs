use crate::cli::ServeArgs;
use crate::demo::load_repository;
use crate::infra::AppState;
use crate::routes::with_staffing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use staff_intel::config::AppConfig;
use staff_intel::error::AppError;
use staff_intel::telemetry;
use staff_intel::workflows::staffing::StaffingService;
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

    let (repository, as_of) = load_repository(&args.roster)?;
    info!(
        %as_of,
        imported = args.roster.shifts_csv.is_some(),
        "roster seeded"
    );
    let staffing_service = Arc::new(StaffingService::new(
        Arc::new(repository),
        config.staffing.clone(),
    ));

    let app = with_staffing_routes(staffing_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "staffing intelligence service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
