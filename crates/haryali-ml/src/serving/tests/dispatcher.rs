use super::common::*;

use crate::models::ModelRegistry;
use crate::serving::{
    round_to_cents, CapabilityKind, DispatchError, PredictionDispatcher, PriceRequest,
    YieldEeRequest, YieldFeaturesRequest,
};

fn price_request(price_value: f64, date: &str, location: &str) -> PriceRequest {
    PriceRequest {
        price_value,
        date: date.to_string(),
        location: location.to_string(),
    }
}

fn yield_features() -> YieldFeaturesRequest {
    YieldFeaturesRequest {
        ndvi: 0.61,
        evi: 0.42,
        savi: 0.5,
        ndwi: 0.1,
        gndvi: 0.55,
        b4: 0.05,
        b8: 0.31,
        b11: 0.2,
        b12: 0.12,
    }
}

fn yield_ee() -> YieldEeRequest {
    YieldEeRequest {
        aoi_bbox: [74.5, 30.0, 76.0, 31.5],
        start_date: "2024-01-01".to_string(),
        end_date: "2024-04-30".to_string(),
        reducer: Some("mean".to_string()),
        scale: Some(10),
    }
}

fn recording_dispatcher(output: f64) -> (PredictionDispatcher, RecordingRegressor) {
    let regressor = RecordingRegressor::new(output);
    let registry = ModelRegistry::new(Box::new(regressor.clone()), encoder());
    (PredictionDispatcher::new(registry), regressor)
}

fn assert_unavailable(err: DispatchError, expected: CapabilityKind) {
    match err {
        DispatchError::Unavailable { capability, reason } => {
            assert_eq!(capability, expected);
            assert!(!reason.is_empty());
        }
        other => panic!("expected capability rejection, got {other:?}"),
    }
}

#[test]
fn unseen_location_reaches_model_as_sentinel() {
    let (dispatcher, regressor) = recording_dispatcher(1234.5678);

    let prediction = dispatcher
        .predict_price(&price_request(5000.0, "2025-11-02", "Ludhiana"))
        .expect("price path always serves");

    assert_eq!(prediction.predicted_price_per_tonne, 1234.57);
    assert_eq!(
        regressor.rows(),
        vec![vec![5000.0, 2025.0, 11.0, 2.0, 6.0, -1.0]]
    );
}

#[test]
fn malformed_date_reaches_model_as_zeros() {
    let (dispatcher, regressor) = recording_dispatcher(900.0);

    dispatcher
        .predict_price(&price_request(4200.0, "not-a-date", "Karnal"))
        .expect("price path always serves");

    assert_eq!(regressor.rows(), vec![vec![4200.0, 0.0, 0.0, 0.0, 0.0, 2.0]]);
}

#[test]
fn linear_price_model_is_rounded_to_cents() {
    let dispatcher = price_only();
    let prediction = dispatcher
        .predict_price(&price_request(5000.0, "2025-11-02", "Karnal"))
        .expect("prediction");
    assert_eq!(prediction.predicted_price_per_tonne, 3603.33);
}

#[test]
fn price_prediction_is_deterministic() {
    let dispatcher = price_only();
    let request = price_request(3875.25, "2025-03-14", "Sirsa");
    let first = dispatcher.predict_price(&request).expect("prediction");
    for _ in 0..10 {
        assert_eq!(dispatcher.predict_price(&request).expect("prediction"), first);
    }
}

#[test]
fn predictions_never_carry_more_than_two_decimals() {
    let dispatcher = price_only();
    let locations = KNOWN_LOCATIONS.iter().copied().chain(["Ludhiana", ""]);
    for location in locations {
        for step in 0..200 {
            let price_value = -500.0 + f64::from(step) * 37.123;
            let prediction = dispatcher
                .predict_price(&price_request(price_value, "2025-06-30", location))
                .expect("prediction");
            let rendered = prediction.predicted_price_per_tonne.to_string();
            let decimals = rendered.split_once('.').map_or(0, |(_, frac)| frac.len());
            assert!(decimals <= 2, "{rendered} for {price_value} at {location}");
        }
    }
}

#[test]
fn model_failures_surface_as_errors() {
    let registry = ModelRegistry::new(Box::new(FailingRegressor), encoder());
    let dispatcher = PredictionDispatcher::new(registry);
    let err = dispatcher
        .predict_price(&price_request(1.0, "2025-01-01", "Karnal"))
        .expect_err("model failure propagates");
    assert!(matches!(err, DispatchError::Model(_)));
}

#[test]
fn yield_paths_are_rejected_without_yield_model() {
    let dispatcher = price_only();
    assert_unavailable(
        dispatcher
            .predict_yield_features(&yield_features())
            .expect_err("yield model absent"),
        CapabilityKind::YieldFeatures,
    );
    assert_unavailable(
        dispatcher.predict_yield_ee(&yield_ee()).expect_err("yield model absent"),
        CapabilityKind::YieldEe,
    );
    assert!(dispatcher
        .predict_price(&price_request(5000.0, "2025-11-02", "Karnal"))
        .is_ok());
}

#[test]
fn yield_features_acknowledges_when_model_loaded() {
    let dispatcher = with_yield_model();
    let ack = dispatcher
        .predict_yield_features(&yield_features())
        .expect("stub acknowledgement");
    assert!(ack.message.contains("will be added after GEE integration"));

    assert_unavailable(
        dispatcher
            .predict_yield_ee(&yield_ee())
            .expect_err("geospatial client absent"),
        CapabilityKind::YieldEe,
    );
}

#[test]
fn geospatial_alone_does_not_open_yield_ee() {
    let dispatcher = with_geospatial_only();
    assert_unavailable(
        dispatcher
            .predict_yield_ee(&yield_ee())
            .expect_err("conjunction of gates"),
        CapabilityKind::YieldEe,
    );
}

#[test]
fn yield_ee_acknowledges_when_both_gates_hold() {
    let dispatcher = fully_enabled();
    let ack = dispatcher.predict_yield_ee(&yield_ee()).expect("stub acknowledgement");
    assert!(ack.message.contains("once GEE and model are configured"));
}

#[test]
fn capability_report_reflects_gates() {
    let report = with_geospatial_only().capabilities();
    assert!(report.price.available);
    assert!(!report.yield_features.available);
    assert!(!report.yield_ee.available);
    assert_eq!(report.yield_ee.reason.as_deref(), Some("yield model not found"));

    let report = fully_enabled().capabilities();
    assert!(report.yield_features.available && report.yield_ee.available);
    assert!(report.yield_ee.reason.is_none());
}

#[test]
fn rounding_handles_edges() {
    assert_eq!(round_to_cents(1234.5678), 1234.57);
    assert_eq!(round_to_cents(-7.126), -7.13);
    assert_eq!(round_to_cents(0.0), 0.0);
    assert_eq!(round_to_cents(1e16), 1e16);
    assert!(round_to_cents(f64::NAN).is_nan());
}

#[test]
fn exact_ties_round_to_the_even_cent() {
    assert_eq!(round_to_cents(0.125), 0.12);
    assert_eq!(round_to_cents(0.375), 0.38);
    assert_eq!(round_to_cents(0.625), 0.62);
    assert_eq!(round_to_cents(10.125), 10.12);
    assert_eq!(round_to_cents(-7.125), -7.12);
    assert_eq!(round_to_cents(4517.875), 4517.88);
}

#[test]
fn near_ties_follow_the_stored_value() {
    // 2.675 and 1.005 are stored just below their decimal tie, 0.135 just above it.
    assert_eq!(round_to_cents(2.675), 2.67);
    assert_eq!(round_to_cents(1.005), 1.0);
    assert_eq!(round_to_cents(0.135), 0.14);
}
