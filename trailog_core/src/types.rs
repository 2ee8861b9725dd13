//! Shared value types for the workout log.
//!
//! - Workout identifiers
//! - Geographic coordinates
//! - Workout kinds and their icon tags

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque, unique workout identifier
///
/// Fresh ids are random UUIDs, so rapid successive creations never collide.
/// Ids restored from storage are kept verbatim whatever their shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    /// Generate a new random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for WorkoutId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for WorkoutId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Coordinates
// ============================================================================

/// A (latitude, longitude) pair in decimal degrees
///
/// Serialized as a two-element array `[lat, lng]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.lat, c.lng]
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

// ============================================================================
// Workout kinds
// ============================================================================

/// Discriminant selecting a workout's derivation rules
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    /// Stored tag (`"running"` / `"cycling"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    /// Exact inverse of [`WorkoutKind::as_str`], no trimming or case folding
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "running" => Some(WorkoutKind::Running),
            "cycling" => Some(WorkoutKind::Cycling),
            _ => None,
        }
    }

    /// Capitalized name used in descriptions
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }

    pub fn icon(&self) -> Icon {
        match self {
            WorkoutKind::Running => Icon::Runner,
            WorkoutKind::Cycling => Icon::Cyclist,
        }
    }
}

impl FromStr for WorkoutKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "running" => Ok(WorkoutKind::Running),
            "cycling" => Ok(WorkoutKind::Cycling),
            other => Err(format!("unknown workout kind '{}'", other)),
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbol tag for a workout; renderers pick the actual glyph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Icon {
    Runner,
    Cyclist,
}

impl Icon {
    /// Style tag handed to map renderers
    pub fn tag(&self) -> &'static str {
        match self {
            Icon::Runner => "running-popup",
            Icon::Cyclist => "cycling-popup",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: std::collections::HashSet<_> = (0..1000).map(|_| WorkoutId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("running".parse::<WorkoutKind>(), Ok(WorkoutKind::Running));
        assert_eq!(" Cycling ".parse::<WorkoutKind>(), Ok(WorkoutKind::Cycling));
        assert!("swimming".parse::<WorkoutKind>().is_err());
    }

    #[test]
    fn test_kind_tags_match_exactly() {
        assert_eq!(WorkoutKind::from_tag("running"), Some(WorkoutKind::Running));
        assert_eq!(WorkoutKind::from_tag("cycling"), Some(WorkoutKind::Cycling));
        assert_eq!(WorkoutKind::from_tag("Running"), None);
        assert_eq!(WorkoutKind::from_tag(" cycling "), None);
    }

    #[test]
    fn test_coordinates_serialize_as_pair() {
        let coords = Coordinates::new(51.52, -0.13);
        let json = serde_json::to_string(&coords).unwrap();
        assert_eq!(json, "[51.52,-0.13]");

        let parsed: Coordinates = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, coords);
    }

    #[test]
    fn test_icon_follows_kind() {
        assert_eq!(WorkoutKind::Running.icon(), Icon::Runner);
        assert_eq!(WorkoutKind::Cycling.icon().tag(), "cycling-popup");
    }
}
