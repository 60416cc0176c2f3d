//! Validation and normalization for routine and exercise edits.

use std::fmt;

use crate::types::{Exercise, Routine};
use crate::units;

#[derive(Clone, Debug, PartialEq)]
pub enum EditorError {
    EmptyRoutineName,
    EmptyExerciseName,
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::EmptyRoutineName => write!(f, "La rutina necesita un nombre"),
            EditorError::EmptyExerciseName => write!(f, "El ejercicio necesita un nombre"),
        }
    }
}

/// Sets/reps field: integer, minimum 1, anything unparseable is 1.
/// Oversized values saturate at `u8::MAX` instead of collapsing.
pub fn parse_count(input: &str) -> u8 {
    match input.trim().parse::<u64>() {
        Ok(n) => n.clamp(1, u8::MAX as u64) as u8,
        Err(_) => 1,
    }
}

/// Weight field: real number, clamped to non-negative.
pub fn parse_weight(input: &str) -> f64 {
    units::parse_weight(input).max(0.0)
}

pub fn new_routine(id: String, user_id: &str, name: &str) -> Result<Routine, EditorError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EditorError::EmptyRoutineName);
    }
    Ok(Routine {
        id,
        user_id: user_id.to_string(),
        name: name.to_string(),
        days: Vec::new(),
        exercises: Vec::new(),
    })
}

pub fn build_exercise(
    id: String,
    name: &str,
    weight_text: &str,
    sets_text: &str,
    reps_text: &str,
) -> Result<Exercise, EditorError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EditorError::EmptyExerciseName);
    }
    Ok(Exercise {
        id,
        name: name.to_string(),
        sets: parse_count(sets_text),
        reps: parse_count(reps_text),
        weight: parse_weight(weight_text),
        last_weight: None,
    })
}

/// Replace an exercise in place when its id already exists (keeping its
/// recorded `last_weight`), otherwise append it at the end.
pub fn upsert_exercise(routine: &mut Routine, mut exercise: Exercise) {
    match routine.exercises.iter_mut().find(|e| e.id == exercise.id) {
        Some(existing) => {
            if exercise.last_weight.is_none() {
                exercise.last_weight = existing.last_weight;
            }
            *existing = exercise;
        }
        None => routine.exercises.push(exercise),
    }
}

/// Idempotent: a second delete of the same id changes nothing.
pub fn delete_exercise(routine: &mut Routine, exercise_id: &str) {
    routine.exercises.retain(|e| e.id != exercise_id);
}

/// Flip one weekday marker (0-6), keeping the list sorted. Out-of-range
/// days are ignored.
pub fn toggle_day(routine: &mut Routine, day: u8) {
    if day > 6 {
        return;
    }
    match routine.days.iter().position(|&d| d == day) {
        Some(i) => {
            routine.days.remove(i);
        }
        None => {
            routine.days.push(day);
            routine.days.sort_unstable();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routine() -> Routine {
        Routine {
            id: "rt-1".into(),
            user_id: "u-1".into(),
            name: "Empuje".into(),
            days: vec![],
            exercises: vec![],
        }
    }

    fn exercise(id: &str, name: &str) -> Exercise {
        Exercise {
            id: id.into(),
            name: name.into(),
            sets: 3,
            reps: 10,
            weight: 50.0,
            last_weight: None,
        }
    }

    #[test]
    fn counts_clamp_to_at_least_one() {
        assert_eq!(parse_count("0"), 1);
        assert_eq!(parse_count("abc"), 1);
        assert_eq!(parse_count(""), 1);
        assert_eq!(parse_count("-2"), 1);
        assert_eq!(parse_count("5"), 5);
    }

    #[test]
    fn oversized_counts_saturate_instead_of_collapsing() {
        assert_eq!(parse_count("255"), 255);
        assert_eq!(parse_count("300"), 255);
        assert_eq!(parse_count("70000"), 255);
    }

    #[test]
    fn weights_clamp_to_non_negative() {
        assert_eq!(parse_weight("-5"), 0.0);
        assert_eq!(parse_weight("x"), 0.0);
        assert_eq!(parse_weight("42.5"), 42.5);
    }

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(
            new_routine("rt-2".into(), "u-1", "   "),
            Err(EditorError::EmptyRoutineName)
        );
        assert_eq!(
            build_exercise("ex-1".into(), "", "50", "3", "10"),
            Err(EditorError::EmptyExerciseName)
        );
    }

    #[test]
    fn names_are_trimmed() {
        let r = new_routine("rt-2".into(), "u-1", "  Pierna  ").unwrap();
        assert_eq!(r.name, "Pierna");
        let ex = build_exercise("ex-1".into(), " Sentadilla ", "80", "3", "8").unwrap();
        assert_eq!(ex.name, "Sentadilla");
    }

    #[test]
    fn garbage_counts_build_a_one_by_one_exercise() {
        let ex = build_exercise("ex-1".into(), "Remo", "-5", "0", "abc").unwrap();
        assert_eq!(ex.sets, 1);
        assert_eq!(ex.reps, 1);
        assert_eq!(ex.weight, 0.0);
    }

    #[test]
    fn editing_replaces_in_place_and_keeps_order() {
        let mut r = routine();
        upsert_exercise(&mut r, exercise("ex-1", "Press banca"));
        upsert_exercise(&mut r, exercise("ex-2", "Fondos"));
        upsert_exercise(&mut r, exercise("ex-1", "Press inclinado"));

        let names: Vec<&str> = r.exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Press inclinado", "Fondos"]);
    }

    #[test]
    fn editing_carries_recorded_last_weight() {
        let mut r = routine();
        let mut ex = exercise("ex-1", "Press banca");
        ex.last_weight = Some(47.5);
        upsert_exercise(&mut r, ex);

        upsert_exercise(&mut r, exercise("ex-1", "Press banca"));
        assert_eq!(r.exercises[0].last_weight, Some(47.5));
    }

    #[test]
    fn new_exercises_append_at_the_end() {
        let mut r = routine();
        upsert_exercise(&mut r, exercise("ex-1", "Press banca"));
        upsert_exercise(&mut r, exercise("ex-2", "Fondos"));
        assert_eq!(r.exercises[1].id, "ex-2");
    }

    #[test]
    fn deleting_twice_is_a_no_op() {
        let mut r = routine();
        upsert_exercise(&mut r, exercise("ex-1", "Press banca"));
        delete_exercise(&mut r, "ex-1");
        assert!(r.exercises.is_empty());
        delete_exercise(&mut r, "ex-1");
        assert!(r.exercises.is_empty());
    }

    #[test]
    fn day_markers_toggle_and_stay_sorted() {
        let mut r = routine();
        toggle_day(&mut r, 5);
        toggle_day(&mut r, 1);
        toggle_day(&mut r, 3);
        assert_eq!(r.days, [1, 3, 5]);

        toggle_day(&mut r, 3);
        assert_eq!(r.days, [1, 5]);

        toggle_day(&mut r, 9);
        assert_eq!(r.days, [1, 5]);
    }
}
