//! Live workout session: a snapshot of a routine plus per-set slots,
//! finished exactly once into an immutable log and a weight-progressed
//! routine. Abandoning the session simply drops this value.

use std::collections::HashMap;

use crate::types::{LogEntry, Routine, User, WorkoutLog};

/// Weight bump applied to an exercise after a fully successful session.
pub const WEIGHT_INCREMENT_KG: f64 = 2.5;

#[derive(Clone, Debug, PartialEq)]
pub struct SetEntry {
    pub reps: u8,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveSession {
    routine: Routine,
    /// Exercise id -> one slot per target set, `None` until recorded.
    progress: HashMap<String, Vec<Option<SetEntry>>>,
}

impl ActiveSession {
    /// Snapshot the routine as it is right now. Later edits to the stored
    /// routine do not affect a session already in progress.
    pub fn start(routine: Routine) -> Self {
        let progress = routine
            .exercises
            .iter()
            .map(|ex| (ex.id.clone(), vec![None; ex.sets as usize]))
            .collect();
        Self { routine, progress }
    }

    pub fn set(&self, exercise_id: &str, index: usize) -> Option<&SetEntry> {
        self.progress.get(exercise_id)?.get(index)?.as_ref()
    }

    pub fn completed_sets(&self, exercise_id: &str) -> usize {
        self.progress
            .get(exercise_id)
            .map(|slots| slots.iter().filter(|s| s.is_some()).count())
            .unwrap_or(0)
    }

    /// Record or overwrite one set. Unknown ids and out-of-range indices
    /// are ignored.
    pub fn record_set(&mut self, exercise_id: &str, index: usize, entry: SetEntry) {
        if let Some(slot) = self
            .progress
            .get_mut(exercise_id)
            .and_then(|slots| slots.get_mut(index))
        {
            *slot = Some(entry);
        }
    }

    /// Revert one slot to unset.
    pub fn clear_set(&mut self, exercise_id: &str, index: usize) {
        if let Some(slot) = self
            .progress
            .get_mut(exercise_id)
            .and_then(|slots| slots.get_mut(index))
        {
            *slot = None;
        }
    }

    /// Terminal transition: aggregate every exercise of the snapshot into
    /// log entries and apply progressive overload to the routine copy.
    ///
    /// An exercise counts as successful only when every slot was recorded
    /// and every recorded set reached the target reps. On success the
    /// routine keeps the old weight as `last_weight` and gains
    /// [`WEIGHT_INCREMENT_KG`] for next time. Zero recorded sets is not an
    /// error, it yields a zero-rep unsuccessful entry at the pre-session
    /// weight.
    pub fn finish(self, log_id: &str, user: &User, date: &str) -> (WorkoutLog, Routine) {
        let mut routine = self.routine;
        let mut entries = Vec::with_capacity(routine.exercises.len());

        for ex in &mut routine.exercises {
            let recorded: Vec<&SetEntry> = self
                .progress
                .get(&ex.id)
                .map(|slots| slots.iter().flatten().collect())
                .unwrap_or_default();

            let sets_completed = recorded.len();
            let total_reps: u32 = recorded.iter().map(|s| s.reps as u32).sum();
            let was_successful = sets_completed == ex.sets as usize
                && recorded.iter().all(|s| s.reps >= ex.reps);

            let weight = recorded
                .iter()
                .map(|s| s.weight)
                .fold(None, |best: Option<f64>, w| {
                    Some(best.map_or(w, |b| b.max(w)))
                })
                .unwrap_or(ex.weight);

            entries.push(LogEntry {
                name: ex.name.clone(),
                weight,
                sets_completed,
                total_reps,
                was_successful,
            });

            if was_successful {
                ex.last_weight = Some(ex.weight);
                ex.weight += WEIGHT_INCREMENT_KG;
            }
        }

        let log = WorkoutLog {
            id: log_id.to_string(),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            date: date.to_string(),
            routine_id: routine.id.clone(),
            routine_name: routine.name.clone(),
            exercises: entries,
        };

        (log, routine)
    }
}
