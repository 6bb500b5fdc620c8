//! Transport Mode

use std::fmt;

/// Indicates whether the quantity carried along a path is radiance (paths
/// started at the camera) or importance (paths started at a light).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransportMode {
    #[default]
    Radiance,
    Importance,
}

impl fmt::Display for TransportMode {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radiance => write!(f, "Radiance"),
            Self::Importance => write!(f, "Importance"),
        }
    }
}
