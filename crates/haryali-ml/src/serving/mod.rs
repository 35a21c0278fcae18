//! Request contracts, capability gating, and the HTTP surface of the prediction service.

mod capability;
pub mod dispatcher;
pub mod domain;
pub mod extract;
pub mod router;

#[cfg(test)]
mod tests;

pub use capability::{Capability, CapabilityKind, CapabilityReport, CapabilityStatus};
pub use dispatcher::{round_to_cents, DispatchError, PredictionDispatcher};
pub use domain::{
    Acknowledgement, PricePrediction, PriceRequest, YieldEeRequest, YieldFeaturesRequest,
};
pub use extract::{FieldIssue, ValidatedJson, ValidationError};
pub use router::prediction_router;
