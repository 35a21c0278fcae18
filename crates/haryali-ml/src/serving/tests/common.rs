use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::features::{PRICE_FEATURES, YIELD_FEATURES};
use crate::models::{GeospatialAccess, LabelEncoder, ModelArtifact, ModelError, ModelRegistry, Regressor};
use crate::serving::{Capability, PredictionDispatcher};

pub(super) const KNOWN_LOCATIONS: [&str; 4] = ["Amritsar", "Bathinda", "Karnal", "Sirsa"];

pub(super) fn encoder() -> LabelEncoder {
    LabelEncoder::new(KNOWN_LOCATIONS).expect("encoder")
}

/// 1000 + 0.5 * price + 10 * month - 3.333 * location code.
pub(super) fn price_artifact() -> ModelArtifact {
    ModelArtifact::linear(
        &PRICE_FEATURES,
        1000.0,
        vec![0.5, 0.0, 10.0, 0.0, 0.0, -3.333],
    )
}

pub(super) fn yield_artifact() -> Box<dyn Regressor> {
    Box::new(ModelArtifact::linear(&YIELD_FEATURES, 0.0, vec![1.0; 9]))
}

pub(super) fn geospatial() -> Capability<GeospatialAccess> {
    Capability::Available(GeospatialAccess::new("/etc/haryali/ee-service-account.json"))
}

pub(super) fn price_only() -> PredictionDispatcher {
    PredictionDispatcher::new(ModelRegistry::new(Box::new(price_artifact()), encoder()))
}

pub(super) fn with_yield_model() -> PredictionDispatcher {
    let registry = ModelRegistry::new(Box::new(price_artifact()), encoder())
        .with_yield_model(Capability::Available(yield_artifact()));
    PredictionDispatcher::new(registry)
}

pub(super) fn with_geospatial_only() -> PredictionDispatcher {
    let registry = ModelRegistry::new(Box::new(price_artifact()), encoder())
        .with_yield_model(Capability::unavailable("yield model not found"))
        .with_geospatial(geospatial());
    PredictionDispatcher::new(registry)
}

pub(super) fn fully_enabled() -> PredictionDispatcher {
    let registry = ModelRegistry::new(Box::new(price_artifact()), encoder())
        .with_yield_model(Capability::Available(yield_artifact()))
        .with_geospatial(geospatial());
    PredictionDispatcher::new(registry)
}

/// Captures every row it scores and answers with a fixed value.
#[derive(Clone)]
pub(super) struct RecordingRegressor {
    pub(super) rows: Arc<Mutex<Vec<Vec<f64>>>>,
    pub(super) output: f64,
}

impl RecordingRegressor {
    pub(super) fn new(output: f64) -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            output,
        }
    }

    pub(super) fn rows(&self) -> Vec<Vec<f64>> {
        self.rows.lock().expect("lock").clone()
    }
}

impl Regressor for RecordingRegressor {
    fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        self.rows.lock().expect("lock").push(row.to_vec());
        Ok(self.output)
    }

    fn name(&self) -> &str {
        "recording"
    }
}

pub(super) struct FailingRegressor;

impl Regressor for FailingRegressor {
    fn predict(&self, _row: &[f64]) -> Result<f64, ModelError> {
        Err(ModelError::Estimator("tree ensemble corrupted".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
