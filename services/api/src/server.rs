use crate::cli::ServeArgs;
use crate::infra::{load_dispatcher, AppState};
use crate::routes::{cors_layer, with_operational_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use haryali_ml::config::AppConfig;
use haryali_ml::error::AppError;
use haryali_ml::telemetry;
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

    let dispatcher = Arc::new(load_dispatcher(&config)?);

    let app = with_operational_routes(dispatcher)
        .layer(Extension(app_state))
        .layer(prometheus_layer)
        .layer(cors_layer());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "haryali prediction service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
