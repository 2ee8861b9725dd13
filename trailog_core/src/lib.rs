#![forbid(unsafe_code)]

//! Core domain model and persistence for the trailog workout log.
//!
//! This crate provides:
//! - Workout records (running, cycling) with derived pace and speed
//! - The in-memory workout store
//! - Persistence (JSON codec, file and memory storage)
//! - Session control and collaborator interfaces (map, geolocation)

pub mod types;
pub mod error;
pub mod workout;
pub mod store;
pub mod storage;
pub mod codec;
pub mod map;
pub mod location;
pub mod session;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use workout::{Activity, NewWorkout, Workout, WorkoutDetail};
pub use store::WorkoutStore;
pub use storage::{BlobStorage, FileStorage, MemoryStorage};
pub use codec::PersistenceCodec;
pub use map::{MapRenderer, Marker};
pub use location::{FixedLocation, GeolocationProvider};
pub use session::{Session, WorkoutForm};
pub use config::Config;
