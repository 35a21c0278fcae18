use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::dispatcher::{DispatchError, PredictionDispatcher};
use super::domain::{PriceRequest, YieldEeRequest, YieldFeaturesRequest, ROOT_MESSAGE};
use super::extract::ValidatedJson;

/// Router builder exposing the prediction endpoints.
pub fn prediction_router(dispatcher: Arc<PredictionDispatcher>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/predict_price", post(price_handler))
        .route("/predict_yield_features", post(yield_features_handler))
        .route("/predict_yield_ee", post(yield_ee_handler))
        .route("/capabilities", get(capabilities_handler))
        .with_state(dispatcher)
}

pub(crate) async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({ "message": ROOT_MESSAGE }))
}

pub(crate) async fn price_handler(
    State(dispatcher): State<Arc<PredictionDispatcher>>,
    ValidatedJson(request): ValidatedJson<PriceRequest>,
) -> Response {
    match dispatcher.predict_price(&request) {
        Ok(prediction) => (StatusCode::OK, Json(prediction)).into_response(),
        Err(err) => dispatch_error_response(err),
    }
}

pub(crate) async fn yield_features_handler(
    State(dispatcher): State<Arc<PredictionDispatcher>>,
    ValidatedJson(request): ValidatedJson<YieldFeaturesRequest>,
) -> Response {
    match dispatcher.predict_yield_features(&request) {
        Ok(ack) => (StatusCode::OK, Json(ack)).into_response(),
        Err(err) => dispatch_error_response(err),
    }
}

pub(crate) async fn yield_ee_handler(
    State(dispatcher): State<Arc<PredictionDispatcher>>,
    ValidatedJson(request): ValidatedJson<YieldEeRequest>,
) -> Response {
    match dispatcher.predict_yield_ee(&request) {
        Ok(ack) => (StatusCode::OK, Json(ack)).into_response(),
        Err(err) => dispatch_error_response(err),
    }
}

pub(crate) async fn capabilities_handler(
    State(dispatcher): State<Arc<PredictionDispatcher>>,
) -> Response {
    (StatusCode::OK, Json(dispatcher.capabilities())).into_response()
}

fn dispatch_error_response(err: DispatchError) -> Response {
    match err {
        DispatchError::Unavailable { capability, reason } => {
            let payload = json!({
                "detail": reason,
                "code": "capability_unavailable",
                "capability": capability.as_str(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
        DispatchError::Model(err) => {
            error!(error = %err, "prediction failed");
            let payload = json!({
                "detail": err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
