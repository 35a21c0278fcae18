use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;

use super::ArtifactError;

/// Scalar regressor over a single feature row.
pub trait Regressor: Send + Sync {
    fn predict(&self, row: &[f64]) -> Result<f64, ModelError>;

    /// Human readable estimator family, used in startup logs.
    fn name(&self) -> &str;
}

/// Failure raised while scoring a row.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model expects {expected} features, received {actual}")]
    FeatureCount { expected: usize, actual: usize },
    #[error("model produced a non-finite prediction ({0})")]
    NonFinite(f64),
    #[error("model returned no prediction")]
    Empty,
    #[error("estimator failure: {0}")]
    Estimator(String),
}

/// Ordinary least squares weights exported from the training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearEstimator {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    Linear(LinearEstimator),
    RandomForest { forest: Box<Forest> },
}

impl fmt::Debug for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estimator::Linear(linear) => f.debug_tuple("Linear").field(linear).finish(),
            Estimator::RandomForest { .. } => f.write_str("RandomForest"),
        }
    }
}

/// Model artifact: an estimator plus the column order it was fit on.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    pub estimator: Estimator,
}

impl ModelArtifact {
    pub fn linear(feature_names: &[&str], intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            feature_names: feature_names.iter().map(|name| name.to_string()).collect(),
            estimator: Estimator::Linear(LinearEstimator {
                intercept,
                coefficients,
            }),
        }
    }

    pub fn random_forest(feature_names: &[&str], forest: Forest) -> Self {
        Self {
            feature_names: feature_names.iter().map(|name| name.to_string()).collect(),
            estimator: Estimator::RandomForest {
                forest: Box::new(forest),
            },
        }
    }

    /// Reads an artifact and checks it against the schema the server assembles.
    pub fn from_path(path: &Path, expected: &[&str]) -> Result<Self, ArtifactError> {
        let file = File::open(path).map_err(|source| ArtifactError::io(path, source))?;
        Self::from_reader(BufReader::new(file), expected)
            .map_err(|err| err.with_path(path))
    }

    pub fn from_reader<R: Read>(reader: R, expected: &[&str]) -> Result<Self, ArtifactError> {
        let artifact: Self = serde_json::from_reader(reader).map_err(ArtifactError::malformed)?;
        artifact.validate(expected)?;
        Ok(artifact)
    }

    fn validate(&self, expected: &[&str]) -> Result<(), ArtifactError> {
        let matches = self.feature_names.len() == expected.len()
            && self
                .feature_names
                .iter()
                .zip(expected)
                .all(|(actual, wanted)| actual == wanted);
        if !matches {
            return Err(ArtifactError::Schema {
                path: None,
                expected: expected.join(", "),
                actual: self.feature_names.join(", "),
            });
        }

        if let Estimator::Linear(linear) = &self.estimator {
            if linear.coefficients.len() != expected.len() {
                return Err(ArtifactError::Malformed {
                    path: None,
                    detail: format!(
                        "linear estimator has {} coefficients for {} features",
                        linear.coefficients.len(),
                        expected.len()
                    ),
                });
            }
        }

        Ok(())
    }
}

impl Regressor for ModelArtifact {
    fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        if row.len() != self.feature_names.len() {
            return Err(ModelError::FeatureCount {
                expected: self.feature_names.len(),
                actual: row.len(),
            });
        }

        let value = match &self.estimator {
            Estimator::Linear(linear) => {
                linear.intercept
                    + linear
                        .coefficients
                        .iter()
                        .zip(row)
                        .map(|(weight, feature)| weight * feature)
                        .sum::<f64>()
            }
            Estimator::RandomForest { forest } => {
                let matrix = DenseMatrix::from_2d_vec(&vec![row.to_vec()])
                    .map_err(|err| ModelError::Estimator(err.to_string()))?;
                let predictions = forest
                    .predict(&matrix)
                    .map_err(|err| ModelError::Estimator(err.to_string()))?;
                predictions.first().copied().ok_or(ModelError::Empty)?
            }
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(ModelError::NonFinite(value))
        }
    }

    fn name(&self) -> &str {
        match self.estimator {
            Estimator::Linear(_) => "linear",
            Estimator::RandomForest { .. } => "random_forest",
        }
    }
}
