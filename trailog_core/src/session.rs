//! Session controller tying user input, the workout store and persistence together.
//!
//! Every mutation is applied to a copy of the store, saved, and only then
//! committed, so the in-memory log never gets ahead of what is on disk.

use crate::codec::{decode, PersistenceCodec};
use crate::map::{MapRenderer, Marker};
use crate::storage::BlobStorage;
use crate::{Activity, Coordinates, Error, NewWorkout, Result, Workout, WorkoutKind, WorkoutStore};

/// Raw workout form input, exactly as entered
#[derive(Clone, Debug, Default)]
pub struct WorkoutForm {
    pub kind: String,
    pub distance: String,
    pub duration: String,
    /// Cadence for runs, elevation gain for rides
    pub cadence_or_elevation: String,
}

impl WorkoutForm {
    /// Parse the form into workout input at the given position
    pub fn parse(&self, coords: Coordinates) -> Result<NewWorkout> {
        let kind: WorkoutKind = self.kind.parse().map_err(Error::Validation)?;
        let distance_km = parse_number("distance", &self.distance)?;
        let duration_min = parse_number("duration", &self.duration)?;

        let activity = match kind {
            WorkoutKind::Running => Activity::Running {
                cadence_spm: parse_number("cadence", &self.cadence_or_elevation)?,
            },
            WorkoutKind::Cycling => Activity::Cycling {
                elevation_gain_m: parse_number("elevation gain", &self.cadence_or_elevation)?,
            },
        };

        Ok(NewWorkout {
            coords,
            distance_km,
            duration_min,
            activity,
        })
    }
}

fn parse_number(field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| Error::Validation(format!("{} must be a number, got '{}'", field, raw)))
}

/// Owner of the workout log for one run of the application
pub struct Session<S> {
    store: WorkoutStore,
    codec: PersistenceCodec<S>,
}

impl<S: BlobStorage> Session<S> {
    /// Open a session, failing if persisted data cannot be loaded
    pub fn open(codec: PersistenceCodec<S>) -> Result<Self> {
        let store = codec.load()?;
        tracing::info!("Opened workout log with {} entries", store.len());
        Ok(Self { store, codec })
    }

    /// Open a session, falling back to an empty log if persisted data is unusable
    pub fn open_or_empty(codec: PersistenceCodec<S>) -> Self {
        let store = match codec.load() {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("Failed to load workouts: {}. Starting with an empty log.", e);
                WorkoutStore::new()
            }
        };
        Self { store, codec }
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub fn codec(&self) -> &PersistenceCodec<S> {
        &self.codec
    }

    /// Validate form input, log the workout and persist the log
    pub fn record(&mut self, form: &WorkoutForm, coords: Coordinates) -> Result<&Workout> {
        let workout = Workout::create(form.parse(coords)?)?;
        tracing::info!("Logging {} workout {}", workout.kind(), workout.id());
        self.commit(vec![workout])?;

        self.store
            .last()
            .ok_or_else(|| Error::NotFound("newly logged workout".into()))
    }

    /// Append every workout from a serialized payload and persist the log
    ///
    /// Returns the number of workouts imported. Nothing is imported if any
    /// entry is bad or collides with an existing id.
    pub fn import(&mut self, blob: &str) -> Result<usize> {
        let incoming: Vec<Workout> = decode(blob)?.all().cloned().collect();
        let count = incoming.len();
        self.commit(incoming)?;
        tracing::info!("Imported {} workouts", count);
        Ok(count)
    }

    /// Place one marker per workout, in log order
    pub fn render_markers<R: MapRenderer>(&self, renderer: &mut R) -> Result<()> {
        for workout in &self.store {
            let marker = Marker::from(workout);
            renderer.place_marker(marker.coords, &marker.popup_text, marker.icon)?;
        }
        Ok(())
    }

    /// Discard every workout, in memory and in storage
    pub fn reset(&mut self) -> Result<()> {
        self.codec.clear()?;
        self.store = WorkoutStore::new();
        tracing::info!("Workout log reset");
        Ok(())
    }

    fn commit(&mut self, workouts: Vec<Workout>) -> Result<()> {
        let mut next = self.store.clone();
        for workout in workouts {
            next.append(workout)?;
        }
        self.codec.save(&next)?;
        self.store = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MarkerCollector;
    use crate::storage::MemoryStorage;
    use crate::Icon;

    fn london() -> Coordinates {
        Coordinates::new(51.52, -0.13)
    }

    fn run_form() -> WorkoutForm {
        WorkoutForm {
            kind: "running".into(),
            distance: "5.2".into(),
            duration: "24".into(),
            cadence_or_elevation: "178".into(),
        }
    }

    fn ride_form() -> WorkoutForm {
        WorkoutForm {
            kind: "cycling".into(),
            distance: "27".into(),
            duration: "95".into(),
            cadence_or_elevation: "456".into(),
        }
    }

    /// Storage whose writes always fail
    struct FailingStorage;

    impl BlobStorage for FailingStorage {
        fn read_blob(&self) -> Result<Option<String>> {
            Ok(None)
        }

        fn write_blob(&mut self, _blob: &str) -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        }

        fn delete_blob(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_record_persists_immediately() {
        let mut session = Session::open(PersistenceCodec::new(MemoryStorage::new())).unwrap();
        let id = session.record(&run_form(), london()).unwrap().id().clone();

        assert_eq!(session.store().len(), 1);
        let reloaded = session.codec().load().unwrap();
        assert_eq!(reloaded.find_by_id(id.as_str()).unwrap().kind(), WorkoutKind::Running);
    }

    #[test]
    fn test_record_rejects_bad_input() {
        let mut session = Session::open(PersistenceCodec::new(MemoryStorage::new())).unwrap();

        let bad_forms = [
            WorkoutForm {
                distance: "0".into(),
                ..run_form()
            },
            WorkoutForm {
                distance: "abc".into(),
                ..run_form()
            },
            WorkoutForm {
                cadence_or_elevation: "".into(),
                ..run_form()
            },
            WorkoutForm {
                kind: "swimming".into(),
                ..run_form()
            },
            WorkoutForm {
                cadence_or_elevation: "-10".into(),
                ..ride_form()
            },
        ];

        for form in &bad_forms {
            let result = session.record(form, london());
            assert!(
                matches!(result, Err(Error::Validation(_))),
                "expected validation error for {:?}",
                form
            );
        }
        assert!(session.store().is_empty());
        assert_eq!(session.codec().storage().blob(), None);
    }

    #[test]
    fn test_failed_save_leaves_store_unchanged() {
        let mut session = Session::open(PersistenceCodec::new(FailingStorage)).unwrap();

        assert!(matches!(
            session.record(&run_form(), london()),
            Err(Error::Io(_))
        ));
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_open_strict_vs_fallback() {
        let corrupt = || PersistenceCodec::new(MemoryStorage::with_blob("not json"));

        assert!(matches!(Session::open(corrupt()), Err(Error::CorruptData(_))));
        assert!(Session::open_or_empty(corrupt()).store().is_empty());
    }

    #[test]
    fn test_session_continuity() {
        crate::logging::init_test();
        let mut session = Session::open(PersistenceCodec::new(MemoryStorage::new())).unwrap();
        session.record(&run_form(), london()).unwrap();
        session.record(&ride_form(), london()).unwrap();

        let storage = session.codec().storage().clone();
        let reopened = Session::open(PersistenceCodec::new(storage)).unwrap();

        let kinds: Vec<_> = reopened.store().all().map(|w| w.kind()).collect();
        assert_eq!(kinds, vec![WorkoutKind::Running, WorkoutKind::Cycling]);
        let ride = reopened.store().last().unwrap();
        assert!((ride.speed_kmh().unwrap() - 17.05).abs() < 0.01);
    }

    #[test]
    fn test_import_is_all_or_nothing() {
        let mut source = Session::open(PersistenceCodec::new(MemoryStorage::new())).unwrap();
        source.record(&run_form(), london()).unwrap();
        let blob = source.codec().storage().blob().unwrap().to_string();

        let mut target = Session::open(PersistenceCodec::new(MemoryStorage::new())).unwrap();
        assert_eq!(target.import(&blob).unwrap(), 1);

        // Same ids again collide
        assert!(matches!(target.import(&blob), Err(Error::DuplicateId(_))));
        assert_eq!(target.store().len(), 1);
        assert_eq!(target.codec().load().unwrap().len(), 1);
    }

    #[test]
    fn test_render_markers() {
        let mut session = Session::open(PersistenceCodec::new(MemoryStorage::new())).unwrap();
        let run_description = session
            .record(&run_form(), london())
            .unwrap()
            .description()
            .to_string();
        session.record(&ride_form(), Coordinates::new(48.85, 2.35)).unwrap();

        let mut collector = MarkerCollector::default();
        session.render_markers(&mut collector).unwrap();

        assert_eq!(collector.markers.len(), 2);
        assert_eq!(collector.markers[0].popup_text, run_description);
        assert_eq!(collector.markers[0].icon, Icon::Runner);
        assert_eq!(collector.markers[1].coords, Coordinates::new(48.85, 2.35));
        assert_eq!(collector.markers[1].icon, Icon::Cyclist);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = Session::open(PersistenceCodec::new(MemoryStorage::new())).unwrap();
        session.record(&run_form(), london()).unwrap();

        session.reset().unwrap();
        session.reset().unwrap();

        assert!(session.store().is_empty());
        assert!(session.codec().load().unwrap().is_empty());
    }
}
