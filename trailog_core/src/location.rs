//! Geolocation provider interface.

use crate::{Coordinates, Error, Result};

/// One-shot source of the user's current position
pub trait GeolocationProvider {
    fn request_position(&mut self) -> Result<Coordinates>;
}

/// Provider returning a fixed, preconfigured position
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedLocation {
    position: Option<Coordinates>,
}

impl FixedLocation {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

impl GeolocationProvider for FixedLocation {
    fn request_position(&mut self) -> Result<Coordinates> {
        match self.position {
            Some(coords) if coords.is_finite() => Ok(coords),
            Some(coords) => Err(Error::Location(format!("invalid position {}", coords))),
            None => Err(Error::Location("no position configured".into())),
        }
    }
}
