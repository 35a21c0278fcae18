use serde::{Deserialize, Serialize};

pub const ROOT_MESSAGE: &str = "✅ Haryali FastAPI ML server is running!";
pub const YIELD_FEATURES_STUB: &str =
    "Feature-based yield prediction will be added after GEE integration.";
pub const YIELD_EE_STUB: &str = "Yield estimator will be available once GEE and model are configured.";

/// Observed parali price at a location on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRequest {
    pub price_value: f64,
    pub date: String,
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePrediction {
    pub predicted_price_per_tonne: f64,
}

/// Spectral indices and Sentinel-2 bands for a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldFeaturesRequest {
    #[serde(rename = "NDVI")]
    pub ndvi: f64,
    #[serde(rename = "EVI")]
    pub evi: f64,
    #[serde(rename = "SAVI")]
    pub savi: f64,
    #[serde(rename = "NDWI")]
    pub ndwi: f64,
    #[serde(rename = "GNDVI")]
    pub gndvi: f64,
    #[serde(rename = "B4")]
    pub b4: f64,
    #[serde(rename = "B8")]
    pub b8: f64,
    #[serde(rename = "B11")]
    pub b11: f64,
    #[serde(rename = "B12")]
    pub b12: f64,
}

/// Area of interest and reduction settings for a geospatial yield estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldEeRequest {
    /// `[min_lon, min_lat, max_lon, max_lat]`
    pub aoi_bbox: [f64; 4],
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "default_reducer")]
    pub reducer: Option<String>,
    #[serde(default = "default_scale")]
    pub scale: Option<i64>,
}

fn default_reducer() -> Option<String> {
    Some("mean".to_string())
}

fn default_scale() -> Option<i64> {
    Some(10)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
}

impl Acknowledgement {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
