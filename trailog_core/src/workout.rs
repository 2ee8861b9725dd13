//! Workout records and their derived metrics.
//!
//! A [`Workout`] is built once, either from validated user input or from
//! storage, and never changes afterwards. Pace and speed come from
//! [`derive_detail`], the single place the formulas live, so freshly created
//! and reloaded records always agree.

use crate::{Coordinates, Error, Icon, Result, WorkoutId, WorkoutKind};
use chrono::{DateTime, Utc};

/// Variant-specific user input
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Activity {
    Running { cadence_spm: f64 },
    Cycling { elevation_gain_m: f64 },
}

impl Activity {
    pub fn kind(&self) -> WorkoutKind {
        match self {
            Activity::Running { .. } => WorkoutKind::Running,
            Activity::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// Variant-specific inputs together with the metrics derived from them
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WorkoutDetail {
    Running {
        cadence_spm: f64,
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        speed_kmh: f64,
    },
}

/// Everything needed to build a workout, before id and timestamp are assigned
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewWorkout {
    pub coords: Coordinates,
    pub distance_km: f64,
    pub duration_min: f64,
    pub activity: Activity,
}

impl NewWorkout {
    /// Check every invariant a workout must satisfy
    pub fn validate(&self) -> Result<()> {
        if !self.coords.is_finite() {
            return Err(Error::Validation(format!(
                "coordinates must be finite, got [{}, {}]",
                self.coords.lat, self.coords.lng
            )));
        }
        require_positive("distance", self.distance_km)?;
        require_positive("duration", self.duration_min)?;

        match self.activity {
            Activity::Running { cadence_spm } => require_positive("cadence", cadence_spm),
            Activity::Cycling { elevation_gain_m } => {
                if !elevation_gain_m.is_finite() || elevation_gain_m < 0.0 {
                    return Err(Error::Validation(format!(
                        "elevation gain must be a non-negative number, got {}",
                        elevation_gain_m
                    )));
                }
                Ok(())
            }
        }
    }
}

fn require_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{} must be a positive number, got {}",
            field, value
        )))
    }
}

/// Compute pace (running) or speed (cycling) from the base measurements
pub fn derive_detail(distance_km: f64, duration_min: f64, activity: Activity) -> WorkoutDetail {
    match activity {
        Activity::Running { cadence_spm } => WorkoutDetail::Running {
            cadence_spm,
            pace_min_per_km: duration_min / distance_km,
        },
        Activity::Cycling { elevation_gain_m } => WorkoutDetail::Cycling {
            elevation_gain_m,
            speed_kmh: distance_km / (duration_min / 60.0),
        },
    }
}

impl WorkoutDetail {
    /// Fail if the derived metric overflowed or underflowed to a non-finite value
    fn ensure_finite(&self) -> Result<()> {
        let (metric, value) = match *self {
            WorkoutDetail::Running {
                pace_min_per_km, ..
            } => ("pace", pace_min_per_km),
            WorkoutDetail::Cycling { speed_kmh, .. } => ("speed", speed_kmh),
        };
        if value.is_finite() {
            Ok(())
        } else {
            Err(Error::Validation(format!(
                "{} is not a finite number for these measurements, got {}",
                metric, value
            )))
        }
    }
}

/// Human-readable title, e.g. "Running on April 14"
///
/// Uses the UTC calendar date of `created_at`.
pub fn describe(kind: WorkoutKind, created_at: DateTime<Utc>) -> String {
    format!("{} on {}", kind.label(), created_at.format("%B %-d"))
}

/// One logged activity
#[derive(Clone, Debug, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    created_at: DateTime<Utc>,
    coords: Coordinates,
    distance_km: f64,
    duration_min: f64,
    description: String,
    detail: WorkoutDetail,
}

impl Workout {
    /// Log a run
    pub fn running(
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    ) -> Result<Self> {
        Self::create(NewWorkout {
            coords,
            distance_km,
            duration_min,
            activity: Activity::Running { cadence_spm },
        })
    }

    /// Log a ride
    pub fn cycling(
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Result<Self> {
        Self::create(NewWorkout {
            coords,
            distance_km,
            duration_min,
            activity: Activity::Cycling { elevation_gain_m },
        })
    }

    /// Build a workout stamped with the current time
    pub fn create(new: NewWorkout) -> Result<Self> {
        Self::create_at(new, Utc::now())
    }

    /// Build a workout with an explicit creation time
    pub fn create_at(new: NewWorkout, created_at: DateTime<Utc>) -> Result<Self> {
        new.validate()?;
        let description = describe(new.activity.kind(), created_at);
        Self::assemble(WorkoutId::generate(), created_at, description, new)
    }

    /// Rebuild a persisted workout
    ///
    /// Id, timestamp and description are historical facts and are kept as
    /// given; pace and speed are recomputed from the base measurements.
    pub(crate) fn restore(
        id: WorkoutId,
        created_at: DateTime<Utc>,
        description: String,
        new: NewWorkout,
    ) -> Result<Self> {
        new.validate()?;
        Self::assemble(id, created_at, description, new)
    }

    fn assemble(
        id: WorkoutId,
        created_at: DateTime<Utc>,
        description: String,
        new: NewWorkout,
    ) -> Result<Self> {
        let detail = derive_detail(new.distance_km, new.duration_min, new.activity);
        detail.ensure_finite()?;
        Ok(Self {
            id,
            created_at,
            coords: new.coords,
            distance_km: new.distance_km,
            duration_min: new.duration_min,
            description,
            detail,
        })
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn coords(&self) -> Coordinates {
        self.coords
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn detail(&self) -> &WorkoutDetail {
        &self.detail
    }

    pub fn kind(&self) -> WorkoutKind {
        match self.detail {
            WorkoutDetail::Running { .. } => WorkoutKind::Running,
            WorkoutDetail::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    /// Icon tag for renderers
    pub fn icon(&self) -> Icon {
        self.kind().icon()
    }

    /// Minutes per km (running only)
    pub fn pace_min_per_km(&self) -> Option<f64> {
        match self.detail {
            WorkoutDetail::Running { pace_min_per_km, .. } => Some(pace_min_per_km),
            WorkoutDetail::Cycling { .. } => None,
        }
    }

    /// Km per hour (cycling only)
    pub fn speed_kmh(&self) -> Option<f64> {
        match self.detail {
            WorkoutDetail::Cycling { speed_kmh, .. } => Some(speed_kmh),
            WorkoutDetail::Running { .. } => None,
        }
    }

    /// The variant input this record was built from
    pub fn activity(&self) -> Activity {
        match self.detail {
            WorkoutDetail::Running { cadence_spm, .. } => Activity::Running { cadence_spm },
            WorkoutDetail::Cycling {
                elevation_gain_m, ..
            } => Activity::Cycling { elevation_gain_m },
        }
    }
}
