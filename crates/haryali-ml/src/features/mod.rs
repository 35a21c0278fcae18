//! Inference-time feature construction for the price model.

pub mod date;
pub mod location;
mod vector;

pub use date::{decompose, DateParts};
pub use location::{encode_location, EncodedCategory, UNSEEN_LOCATION};
pub use vector::{FeatureAssembler, FeatureVector, PRICE_FEATURES, PRICE_FEATURE_COUNT};

/// Column order of the yield model, matching the spectral-index request body.
pub const YIELD_FEATURES: [&str; 9] = [
    "NDVI", "EVI", "SAVI", "NDWI", "GNDVI", "B4", "B8", "B11", "B12",
];
