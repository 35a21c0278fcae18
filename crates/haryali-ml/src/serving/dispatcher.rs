use tracing::debug;

use super::capability::{CapabilityKind, CapabilityReport, CapabilityStatus};
use super::domain::{
    Acknowledgement, PricePrediction, PriceRequest, YieldEeRequest, YieldFeaturesRequest,
    YIELD_EE_STUB, YIELD_FEATURES_STUB,
};
use crate::features::{FeatureAssembler, FeatureVector};
use crate::models::{ModelError, ModelRegistry};

pub const YIELD_FEATURES_UNAVAILABLE: &str = "Yield model not available yet.";
pub const YIELD_EE_UNAVAILABLE: &str =
    "Yield estimation temporarily unavailable (requires GEE & yield model).";

// Past this magnitude an f64 carries no fractional digits.
const ROUNDING_LIMIT: f64 = 1e15;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("{reason}")]
    Unavailable {
        capability: CapabilityKind,
        reason: &'static str,
    },
    #[error("price model failed: {0}")]
    Model(#[from] ModelError),
}

/// Routes validated requests to their predictor, consulting the startup capability gates.
pub struct PredictionDispatcher {
    registry: ModelRegistry,
}

impl PredictionDispatcher {
    pub fn new(registry: ModelRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn price_features(&self, request: &PriceRequest) -> FeatureVector {
        FeatureAssembler::new(self.registry.location_encoder()).assemble(
            request.price_value,
            &request.date,
            &request.location,
        )
    }

    pub fn predict_price(&self, request: &PriceRequest) -> Result<PricePrediction, DispatchError> {
        let features = self.price_features(request);
        let raw = self.registry.price_model().predict(&features.to_row())?;
        let predicted_price_per_tonne = round_to_cents(raw);

        debug!(
            location = %request.location,
            date_missing = features.date_parts().is_missing(),
            raw,
            predicted_price_per_tonne,
            "price predicted"
        );

        Ok(PricePrediction {
            predicted_price_per_tonne,
        })
    }

    /// Acknowledges the request when the yield model is loaded. No inference runs yet.
    pub fn predict_yield_features(
        &self,
        _request: &YieldFeaturesRequest,
    ) -> Result<Acknowledgement, DispatchError> {
        if !self.registry.yield_model().is_available() {
            return Err(reject(CapabilityKind::YieldFeatures, YIELD_FEATURES_UNAVAILABLE));
        }
        Ok(Acknowledgement::new(YIELD_FEATURES_STUB))
    }

    /// Requires both the geospatial client and the yield model. No inference runs yet.
    pub fn predict_yield_ee(
        &self,
        _request: &YieldEeRequest,
    ) -> Result<Acknowledgement, DispatchError> {
        let geospatial = self.registry.geospatial().is_available();
        let yield_model = self.registry.yield_model().is_available();
        if !(geospatial && yield_model) {
            return Err(reject(CapabilityKind::YieldEe, YIELD_EE_UNAVAILABLE));
        }
        Ok(Acknowledgement::new(YIELD_EE_STUB))
    }

    pub fn capabilities(&self) -> CapabilityReport {
        let yield_model = self.registry.yield_model().status();
        let geospatial = self.registry.geospatial().status();

        CapabilityReport {
            price: CapabilityStatus::available(),
            yield_ee: CapabilityStatus::all_of(&[geospatial, yield_model.clone()]),
            yield_features: yield_model,
        }
    }
}

fn reject(capability: CapabilityKind, reason: &'static str) -> DispatchError {
    debug!(capability = capability.as_str(), "capability unavailable, request rejected");
    DispatchError::Unavailable { capability, reason }
}

/// Rounds to two decimal places. Ties are judged on the exact binary value and go to
/// the even cent, so `0.125` becomes `0.12` while `2.675` (really 2.67499...) becomes `2.67`.
pub fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= ROUNDING_LIMIT {
        return value;
    }
    let scaled = value * 100.0;
    // Exact remainder of the multiplication, so a product that only rounded onto .5 is
    // not mistaken for a tie.
    let residual = value.mul_add(100.0, -scaled);
    let cents = if (scaled - scaled.trunc()).abs() != 0.5 {
        scaled.round()
    } else if residual > 0.0 {
        scaled.ceil()
    } else if residual < 0.0 {
        scaled.floor()
    } else {
        scaled.round_ties_even()
    };
    cents / 100.0
}
