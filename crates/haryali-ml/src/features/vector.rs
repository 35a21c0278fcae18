use crate::models::LabelEncoder;

use super::date::{decompose, DateParts};
use super::location::{encode_location, EncodedCategory};

pub const PRICE_FEATURE_COUNT: usize = 6;

/// Column order the price model was fit on. Changing it silently corrupts predictions,
/// so model artifacts are checked against this list at startup.
pub const PRICE_FEATURES: [&str; PRICE_FEATURE_COUNT] = [
    "price_value",
    "year",
    "month",
    "day",
    "weekday",
    "location_enc",
];

/// Model input for a single price observation. Only [`FeatureAssembler::assemble`]
/// builds one, which keeps the column order in a single place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    price_value: f64,
    date: DateParts,
    location: EncodedCategory,
}

impl FeatureVector {
    pub fn price_value(&self) -> f64 {
        self.price_value
    }

    pub fn date_parts(&self) -> DateParts {
        self.date
    }

    pub fn location(&self) -> EncodedCategory {
        self.location
    }

    pub fn to_row(&self) -> [f64; PRICE_FEATURE_COUNT] {
        [
            self.price_value,
            f64::from(self.date.year),
            f64::from(self.date.month),
            f64::from(self.date.day),
            f64::from(self.date.weekday),
            self.location.code() as f64,
        ]
    }

    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> {
        PRICE_FEATURES.into_iter().zip(self.to_row())
    }
}

/// Turns raw request fields into the price model's feature vector.
#[derive(Debug, Clone, Copy)]
pub struct FeatureAssembler<'a> {
    encoder: &'a LabelEncoder,
}

impl<'a> FeatureAssembler<'a> {
    pub fn new(encoder: &'a LabelEncoder) -> Self {
        Self { encoder }
    }

    pub fn assemble(&self, price_value: f64, date: &str, location: &str) -> FeatureVector {
        FeatureVector {
            price_value,
            date: decompose(date),
            location: encode_location(self.encoder, location),
        }
    }
}
