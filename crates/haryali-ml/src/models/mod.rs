//! Trained artifacts consumed by the serving path and the registry that owns them.

mod artifact;
mod encoder;
pub mod registry;

pub use artifact::{Estimator, LinearEstimator, ModelArtifact, ModelError, Regressor};
pub use encoder::{LabelEncoder, UnseenLabel};
pub use registry::{GeospatialAccess, ModelRegistry};

use std::fmt;
use std::path::{Path, PathBuf};

/// Artifacts the registry knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    PriceModel,
    LocationEncoder,
    YieldModel,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ArtifactKind::PriceModel => "price model",
            ArtifactKind::LocationEncoder => "location encoder",
            ArtifactKind::YieldModel => "yield model",
        };
        f.write_str(label)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("missing {kind} at: {}", .path.display())]
    Missing { kind: ArtifactKind, path: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed artifact{}: {detail}", located(.path))]
    Malformed {
        path: Option<PathBuf>,
        detail: String,
    },
    #[error("artifact{} was fit on [{actual}] but the server assembles [{expected}]", located(.path))]
    Schema {
        path: Option<PathBuf>,
        expected: String,
        actual: String,
    },
    #[error("location encoder lists '{0}' more than once")]
    DuplicateClass(String),
}

impl ArtifactError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn malformed(err: serde_json::Error) -> Self {
        Self::Malformed {
            path: None,
            detail: err.to_string(),
        }
    }

    pub(crate) fn with_path(self, location: &Path) -> Self {
        match self {
            Self::Malformed { path: None, detail } => Self::Malformed {
                path: Some(location.to_path_buf()),
                detail,
            },
            Self::Schema {
                path: None,
                expected,
                actual,
            } => Self::Schema {
                path: Some(location.to_path_buf()),
                expected,
                actual,
            },
            other => other,
        }
    }
}

fn located(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|path| format!(" {}", path.display()))
        .unwrap_or_default()
}
