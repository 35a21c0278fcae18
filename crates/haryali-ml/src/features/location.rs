use tracing::debug;

use crate::models::LabelEncoder;

/// Code emitted for locations the encoder never saw. Trained codes are class positions,
/// so this cannot collide with one.
pub const UNSEEN_LOCATION: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedCategory {
    Known(i64),
    Unseen,
}

impl EncodedCategory {
    pub fn code(self) -> i64 {
        match self {
            EncodedCategory::Known(code) => code,
            EncodedCategory::Unseen => UNSEEN_LOCATION,
        }
    }
}

/// Encodes a location label, degrading to [`EncodedCategory::Unseen`] instead of failing.
///
/// Membership is checked before `transform` so the encoder's unseen-label error is
/// never produced on the serving path.
pub fn encode_location(encoder: &LabelEncoder, location: &str) -> EncodedCategory {
    if encoder.contains(location) {
        if let Ok(code) = encoder.transform(location) {
            return EncodedCategory::Known(code);
        }
    }

    debug!(location, "location not seen during training, using sentinel code");
    EncodedCategory::Unseen
}
