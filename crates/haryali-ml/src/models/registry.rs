use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{ArtifactError, ArtifactKind, LabelEncoder, ModelArtifact, Regressor};
use crate::config::ArtifactConfig;
use crate::features::{PRICE_FEATURES, YIELD_FEATURES};
use crate::serving::Capability;

/// Handle to the geospatial client credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeospatialAccess {
    credentials: PathBuf,
}

impl GeospatialAccess {
    pub fn new(credentials: impl Into<PathBuf>) -> Self {
        Self {
            credentials: credentials.into(),
        }
    }

    pub fn credentials(&self) -> &Path {
        &self.credentials
    }
}

/// Artifacts loaded once before serving starts. Read-only afterwards.
pub struct ModelRegistry {
    price_model: Box<dyn Regressor>,
    location_encoder: LabelEncoder,
    yield_model: Capability<Box<dyn Regressor>>,
    geospatial: Capability<GeospatialAccess>,
}

impl ModelRegistry {
    /// Registry with only the mandatory artifacts; yield paths start out unavailable.
    pub fn new(price_model: Box<dyn Regressor>, location_encoder: LabelEncoder) -> Self {
        Self {
            price_model,
            location_encoder,
            yield_model: Capability::unavailable("yield model not configured"),
            geospatial: Capability::unavailable("geospatial client not configured"),
        }
    }

    pub fn with_yield_model(mut self, yield_model: Capability<Box<dyn Regressor>>) -> Self {
        self.yield_model = yield_model;
        self
    }

    pub fn with_geospatial(mut self, geospatial: Capability<GeospatialAccess>) -> Self {
        self.geospatial = geospatial;
        self
    }

    /// Loads every artifact. Missing or malformed mandatory artifacts are fatal; the
    /// optional ones only degrade their capability.
    pub fn load(config: &ArtifactConfig) -> Result<Self, ArtifactError> {
        require(ArtifactKind::PriceModel, &config.price_model)?;
        require(ArtifactKind::LocationEncoder, &config.location_encoder)?;

        let price_model = ModelArtifact::from_path(&config.price_model, &PRICE_FEATURES)?;
        info!(
            estimator = price_model.name(),
            path = %config.price_model.display(),
            "price model loaded"
        );

        let location_encoder = LabelEncoder::from_path(&config.location_encoder)?;
        info!(
            classes = location_encoder.len(),
            path = %config.location_encoder.display(),
            "location encoder loaded"
        );

        let registry = Self::new(Box::new(price_model), location_encoder)
            .with_yield_model(load_yield_model(&config.yield_model))
            .with_geospatial(probe_geospatial(config.geospatial_credentials.as_deref()));

        Ok(registry)
    }

    pub fn price_model(&self) -> &dyn Regressor {
        self.price_model.as_ref()
    }

    pub fn location_encoder(&self) -> &LabelEncoder {
        &self.location_encoder
    }

    pub fn yield_model(&self) -> &Capability<Box<dyn Regressor>> {
        &self.yield_model
    }

    pub fn geospatial(&self) -> &Capability<GeospatialAccess> {
        &self.geospatial
    }
}

fn require(kind: ArtifactKind, path: &Path) -> Result<(), ArtifactError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ArtifactError::Missing {
            kind,
            path: path.to_path_buf(),
        })
    }
}

fn load_yield_model(path: &Path) -> Capability<Box<dyn Regressor>> {
    if !path.is_file() {
        info!(
            path = %path.display(),
            "yield predictor not found, yield endpoints disabled until added"
        );
        return Capability::unavailable(format!("yield model not found at {}", path.display()));
    }

    match ModelArtifact::from_path(path, &YIELD_FEATURES) {
        Ok(model) => {
            info!(estimator = model.name(), path = %path.display(), "yield model loaded");
            Capability::Available(Box::new(model))
        }
        Err(err) => {
            warn!(error = %err, "could not load yield model");
            Capability::unavailable(err.to_string())
        }
    }
}

fn probe_geospatial(credentials: Option<&Path>) -> Capability<GeospatialAccess> {
    match credentials {
        None => Capability::unavailable("geospatial client not configured"),
        Some(path) if path.is_file() => {
            info!(credentials = %path.display(), "geospatial client configured");
            Capability::Available(GeospatialAccess::new(path))
        }
        Some(path) => {
            warn!(credentials = %path.display(), "geospatial credentials not found");
            Capability::unavailable(format!(
                "geospatial credentials not found at {}",
                path.display()
            ))
        }
    }
}
