//! Map renderer interface.
//!
//! The core hands each workout's position, description and icon tag to a
//! renderer; how markers look is up to the renderer.

use crate::{Coordinates, Icon, Result, Workout};

/// Something that can place workout markers on a map
pub trait MapRenderer {
    fn place_marker(&mut self, coords: Coordinates, popup_text: &str, icon: Icon) -> Result<()>;
}

/// A marker as seen by a renderer
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub coords: Coordinates,
    pub popup_text: String,
    pub icon: Icon,
}

impl From<&Workout> for Marker {
    fn from(workout: &Workout) -> Self {
        Self {
            coords: workout.coords(),
            popup_text: workout.description().to_string(),
            icon: workout.icon(),
        }
    }
}

/// Renderer that only collects markers
#[derive(Clone, Debug, Default)]
pub struct MarkerCollector {
    pub markers: Vec<Marker>,
}

impl MapRenderer for MarkerCollector {
    fn place_marker(&mut self, coords: Coordinates, popup_text: &str, icon: Icon) -> Result<()> {
        self.markers.push(Marker {
            coords,
            popup_text: popup_text.to_string(),
            icon,
        });
        Ok(())
    }
}
