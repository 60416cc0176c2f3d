use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "FORJA";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub password: String,
    pub avatar: String,
}

/// Derived per-user ranking data. Never stored; recomputed from the full
/// log history on every render.
#[derive(Clone, Debug, PartialEq)]
pub struct UserStats {
    pub user: User,
    pub total_attendance: usize,
    pub weekly_count: usize,
    pub has_reached_weekly_goal: bool,
    /// Reserved for a future scoring rule, always 0 today.
    pub bonus_points: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub sets: u8,
    pub reps: u8,
    /// Target weight in kilograms. Pounds are always display-derived.
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_weight: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// Weekday markers 0 (domingo) to 6, independent, kept sorted.
    #[serde(default)]
    pub days: Vec<u8>,
    pub exercises: Vec<Exercise>,
}

/// One per-exercise result inside a finished log. Names are denormalized
/// on purpose: renaming or deleting the source routine later must not
/// rewrite history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub name: String,
    pub weight: f64,
    pub sets_completed: usize,
    pub total_reps: u32,
    pub was_successful: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    /// Zero-padded YYYY-MM-DD, so string order equals date order.
    pub date: String,
    pub routine_id: String,
    pub routine_name: String,
    pub exercises: Vec<LogEntry>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AppView {
    Login,
    Dashboard,
    Routines,
    Active(Routine),
    History,
}
