//! In-memory workout log.
//!
//! Insertion order is log order. Records are only ever appended.

use crate::{Error, Result, Workout};
use std::collections::HashMap;

/// Ordered collection of workouts with lookup by id
#[derive(Clone, Debug, Default)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
    index: HashMap<String, usize>,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a workout at the end of the log
    ///
    /// Fails with `DuplicateId` if a workout with the same id is present.
    pub fn append(&mut self, workout: Workout) -> Result<()> {
        let id = workout.id().as_str();
        if self.index.contains_key(id) {
            return Err(Error::DuplicateId(id.to_string()));
        }

        self.index.insert(id.to_string(), self.workouts.len());
        self.workouts.push(workout);
        Ok(())
    }

    /// Every workout in log order
    ///
    /// The iterator borrows the store, so no append can interleave with it.
    pub fn all(&self) -> std::slice::Iter<'_, Workout> {
        self.workouts.iter()
    }

    /// Look up a workout by id
    pub fn find_by_id(&self, id: &str) -> Result<&Workout> {
        self.index
            .get(id)
            .map(|&pos| &self.workouts[pos])
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    /// Most recently appended workout
    pub fn last(&self) -> Option<&Workout> {
        self.workouts.last()
    }
}

impl<'a> IntoIterator for &'a WorkoutStore {
    type Item = &'a Workout;
    type IntoIter = std::slice::Iter<'a, Workout>;

    fn into_iter(self) -> Self::IntoIter {
        self.all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coordinates;

    fn run(distance_km: f64) -> Workout {
        Workout::running(Coordinates::new(51.52, -0.13), distance_km, 30.0, 170.0).unwrap()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = WorkoutStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.last().is_none());
    }

    #[test]
    fn test_append_then_find() {
        let mut store = WorkoutStore::new();
        let workout = run(5.0);
        let id = workout.id().clone();

        store.append(workout.clone()).unwrap();

        assert_eq!(store.find_by_id(id.as_str()).unwrap(), &workout);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_find_unknown_id() {
        let mut store = WorkoutStore::new();
        store.append(run(5.0)).unwrap();

        match store.find_by_id("no-such-id") {
            Err(Error::NotFound(id)) => assert_eq!(id, "no-such-id"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut store = WorkoutStore::new();
        let workout = run(5.0);
        store.append(workout.clone()).unwrap();

        let result = store.append(workout);
        assert!(matches!(result, Err(Error::DuplicateId(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_preserves_insertion_order() {
        let mut store = WorkoutStore::new();
        for km in [3.0, 8.0, 5.0] {
            store.append(run(km)).unwrap();
        }

        let distances: Vec<f64> = store.all().map(|w| w.distance_km()).collect();
        assert_eq!(distances, vec![3.0, 8.0, 5.0]);
        assert_eq!(store.last().unwrap().distance_km(), 5.0);
    }

    #[test]
    fn test_snapshot_unaffected_by_later_append() {
        let mut store = WorkoutStore::new();
        store.append(run(3.0)).unwrap();

        let snapshot: Vec<Workout> = store.all().cloned().collect();
        store.append(run(4.0)).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }
}
