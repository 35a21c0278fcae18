use haryali_ml::config::AppConfig;
use haryali_ml::error::AppError;
use haryali_ml::models::ModelRegistry;
use haryali_ml::serving::PredictionDispatcher;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads every artifact named by the configuration. A missing price model or
/// encoder aborts startup; optional collaborators only narrow the capabilities.
pub(crate) fn load_dispatcher(config: &AppConfig) -> Result<PredictionDispatcher, AppError> {
    let registry = ModelRegistry::load(&config.artifacts)?;
    let dispatcher = PredictionDispatcher::new(registry);

    let report = dispatcher.capabilities();
    info!(
        price_model = dispatcher.registry().price_model().name(),
        locations = dispatcher.registry().location_encoder().len(),
        yield_features = report.yield_features.available,
        yield_ee = report.yield_ee.available,
        "prediction artifacts loaded"
    );

    Ok(dispatcher)
}
