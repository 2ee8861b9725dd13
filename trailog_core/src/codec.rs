//! Serialization of the workout log and reconstruction of typed records.
//!
//! The blob is a JSON array with one flat object per workout. `kind` is a
//! first-class field and selects which variant gets rebuilt. Derived metrics
//! are written for human readers but never read back: [`decode`] recomputes
//! them from the base measurements.
//!
//! Field names of the older browser export (`date`, `coords`, `distance`,
//! `duration`, `type`, `cadence`, `elevationGain`) are accepted as aliases.
//! When an entry carries both spellings of a field the canonical one wins and
//! the legacy one is dropped.

use crate::storage::BlobStorage;
use crate::{
    Activity, Coordinates, Error, NewWorkout, Result, Workout, WorkoutDetail, WorkoutId,
    WorkoutKind, WorkoutStore,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Creation time as stored: RFC 3339 text, or epoch milliseconds
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredTimestamp {
    Rfc3339(DateTime<Utc>),
    EpochMillis(i64),
}

impl StoredTimestamp {
    fn resolve(&self) -> Option<DateTime<Utc>> {
        match self {
            StoredTimestamp::Rfc3339(at) => Some(*at),
            StoredTimestamp::EpochMillis(ms) => Utc.timestamp_millis_opt(*ms).single(),
        }
    }
}

/// One persisted workout entry
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredWorkout {
    id: String,
    created_at: StoredTimestamp,
    coordinates: Coordinates,
    distance_km: f64,
    duration_min: f64,
    kind: String,
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cadence_spm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    elevation_gain_m: Option<f64>,
    // Informational only, ignored on load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pace_min_per_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speed_kmh: Option<f64>,
}

/// Legacy field names and their canonical replacements
const LEGACY_NAMES: [(&str, &str); 7] = [
    ("date", "createdAt"),
    ("coords", "coordinates"),
    ("distance", "distanceKm"),
    ("duration", "durationMin"),
    ("type", "kind"),
    ("cadence", "cadenceSpm"),
    ("elevationGain", "elevationGainM"),
];

/// Rename legacy fields in place, keeping the canonical value on conflict
fn canonicalize_fields(entry: &mut serde_json::Value) {
    let Some(fields) = entry.as_object_mut() else {
        return;
    };
    for (legacy, canonical) in LEGACY_NAMES {
        if let Some(value) = fields.remove(legacy) {
            if !fields.contains_key(canonical) {
                fields.insert(canonical.to_string(), value);
            }
        }
    }
}

impl From<&Workout> for StoredWorkout {
    fn from(workout: &Workout) -> Self {
        let (cadence_spm, elevation_gain_m, pace_min_per_km, speed_kmh) = match *workout.detail() {
            WorkoutDetail::Running {
                cadence_spm,
                pace_min_per_km,
            } => (Some(cadence_spm), None, Some(pace_min_per_km), None),
            WorkoutDetail::Cycling {
                elevation_gain_m,
                speed_kmh,
            } => (None, Some(elevation_gain_m), None, Some(speed_kmh)),
        };

        StoredWorkout {
            id: workout.id().to_string(),
            created_at: StoredTimestamp::Rfc3339(workout.created_at()),
            coordinates: workout.coords(),
            distance_km: workout.distance_km(),
            duration_min: workout.duration_min(),
            kind: workout.kind().as_str().to_string(),
            description: workout.description().to_string(),
            cadence_spm,
            elevation_gain_m,
            pace_min_per_km,
            speed_kmh,
        }
    }
}

impl StoredWorkout {
    /// Rebuild a fully typed workout, dispatching on the stored kind
    fn into_workout(self) -> std::result::Result<Workout, String> {
        let kind = WorkoutKind::from_tag(&self.kind)
            .ok_or_else(|| format!("unknown workout kind '{}'", self.kind))?;
        let created_at = self
            .created_at
            .resolve()
            .ok_or_else(|| "createdAt is out of range".to_string())?;

        let activity = match kind {
            WorkoutKind::Running => Activity::Running {
                cadence_spm: self
                    .cadence_spm
                    .ok_or_else(|| "running entry is missing cadenceSpm".to_string())?,
            },
            WorkoutKind::Cycling => Activity::Cycling {
                elevation_gain_m: self
                    .elevation_gain_m
                    .ok_or_else(|| "cycling entry is missing elevationGainM".to_string())?,
            },
        };

        let new = NewWorkout {
            coords: self.coordinates,
            distance_km: self.distance_km,
            duration_min: self.duration_min,
            activity,
        };

        Workout::restore(WorkoutId::from(self.id), created_at, self.description, new)
            .map_err(|e| e.to_string())
    }
}

/// Serialize every workout, in log order
pub fn encode(store: &WorkoutStore) -> Result<String> {
    let entries: Vec<StoredWorkout> = store.all().map(StoredWorkout::from).collect();
    Ok(serde_json::to_string(&entries)?)
}

/// Rebuild a store from a serialized blob
///
/// An empty blob or JSON `null` yields an empty store. Any bad entry fails the
/// whole decode.
pub fn decode(blob: &str) -> Result<WorkoutStore> {
    if blob.trim().is_empty() {
        return Ok(WorkoutStore::new());
    }

    let entries: Option<Vec<serde_json::Value>> = serde_json::from_str(blob)
        .map_err(|e| Error::CorruptData(format!("expected a JSON array of workouts: {}", e)))?;

    let mut store = WorkoutStore::new();
    for (index, mut value) in entries.unwrap_or_default().into_iter().enumerate() {
        canonicalize_fields(&mut value);
        let entry: StoredWorkout = serde_json::from_value(value)
            .map_err(|e| Error::CorruptData(format!("entry {}: {}", index, e)))?;

        let workout = entry
            .into_workout()
            .map_err(|reason| Error::InvalidWorkout(format!("entry {}: {}", index, reason)))?;

        store.append(workout)?;
    }

    tracing::debug!("Decoded {} workouts", store.len());
    Ok(store)
}

/// Codec bound to a storage backend
#[derive(Debug)]
pub struct PersistenceCodec<S> {
    storage: S,
}

impl<S: BlobStorage> PersistenceCodec<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Persist the whole store, replacing what was stored before
    pub fn save(&mut self, store: &WorkoutStore) -> Result<()> {
        let blob = encode(store)?;
        self.storage.write_blob(&blob)?;
        tracing::debug!("Saved {} workouts", store.len());
        Ok(())
    }

    /// Load the persisted store; nothing persisted yet means an empty store
    pub fn load(&self) -> Result<WorkoutStore> {
        match self.storage.read_blob()? {
            Some(blob) => decode(&blob),
            None => {
                tracing::info!("No saved workouts found, starting empty");
                Ok(WorkoutStore::new())
            }
        }
    }

    /// Discard all persisted workouts
    pub fn clear(&mut self) -> Result<()> {
        self.storage.delete_blob()
    }
}
