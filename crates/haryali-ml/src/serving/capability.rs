use std::fmt;

use serde::Serialize;

/// Availability of an optional collaborator, decided once at startup.
pub enum Capability<T> {
    Available(T),
    Unavailable(String),
}

impl<T> Capability<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn as_available(&self) -> Option<&T> {
        match self {
            Self::Available(handle) => Some(handle),
            Self::Unavailable(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Available(_) => None,
            Self::Unavailable(reason) => Some(reason),
        }
    }

    pub fn status(&self) -> CapabilityStatus {
        CapabilityStatus {
            available: self.is_available(),
            reason: self.reason().map(str::to_string),
        }
    }
}

impl<T> fmt::Debug for Capability<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(_) => f.write_str("Available"),
            Self::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

/// Request paths served by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    Price,
    YieldFeatures,
    YieldEe,
}

impl CapabilityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CapabilityKind::Price => "price",
            CapabilityKind::YieldFeatures => "yield_features",
            CapabilityKind::YieldEe => "yield_ee",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityStatus {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CapabilityStatus {
    pub fn available() -> Self {
        Self {
            available: true,
            reason: None,
        }
    }

    /// Both gates must hold; reasons of the failing ones are joined.
    pub fn all_of(statuses: &[CapabilityStatus]) -> Self {
        let reasons: Vec<&str> = statuses
            .iter()
            .filter_map(|status| status.reason.as_deref())
            .collect();
        let available = statuses.iter().all(|status| status.available);
        Self {
            available,
            reason: (!available).then(|| reasons.join("; ")),
        }
    }
}

/// Snapshot of every request path, exposed for operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityReport {
    pub price: CapabilityStatus,
    pub yield_features: CapabilityStatus,
    pub yield_ee: CapabilityStatus,
}
