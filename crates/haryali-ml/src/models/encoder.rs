use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use super::ArtifactError;

/// Label encoder fit during training: each known class maps to its position in the
/// class list, so trained codes are always non-negative.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: HashMap<String, i64>,
}

#[derive(Deserialize)]
struct EncoderFile {
    classes: Vec<String>,
}

/// Raised by [`LabelEncoder::transform`] for labels outside the trained set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("label '{0}' was not seen during training")]
pub struct UnseenLabel(pub String);

impl LabelEncoder {
    pub fn new<I, S>(classes: I) -> Result<Self, ArtifactError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        let mut codes = HashMap::with_capacity(classes.len());
        for (position, class) in classes.iter().enumerate() {
            if codes.insert(class.clone(), position as i64).is_some() {
                return Err(ArtifactError::DuplicateClass(class.clone()));
            }
        }
        Ok(Self { classes, codes })
    }

    pub fn from_path(path: &Path) -> Result<Self, ArtifactError> {
        let file = File::open(path).map_err(|source| ArtifactError::io(path, source))?;
        Self::from_reader(BufReader::new(file)).map_err(|err| err.with_path(path))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactError> {
        let file: EncoderFile = serde_json::from_reader(reader).map_err(ArtifactError::malformed)?;
        Self::new(file.classes)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.codes.contains_key(label)
    }

    pub fn transform(&self, label: &str) -> Result<i64, UnseenLabel> {
        self.codes
            .get(label)
            .copied()
            .ok_or_else(|| UnseenLabel(label.to_string()))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
