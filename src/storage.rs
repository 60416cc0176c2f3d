use serde::{Deserialize, Serialize};

use crate::types::{Routine, User, WorkoutLog};

const DB_KEY: &str = "forja_db_v1";
const SESSION_USER_KEY: &str = "forja_session_user";
const SYNC_STATUS_KEY: &str = "forja_sync_status";
const DATA_VERSION_KEY: &str = "forja_data_version";
const PENDING_SAVES_KEY: &str = "forja_pending_saves";

/// Everything the client persists locally: the shared roster snapshot,
/// the current user's routines and the full log history.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Database {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub routines: Vec<Routine>,
    #[serde(default)]
    pub logs: Vec<WorkoutLog>,
}

impl Database {
    pub fn upsert_user(&mut self, user: User) {
        match self.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => self.users.push(user),
        }
    }

    pub fn upsert_routine(&mut self, routine: Routine) {
        match self.routines.iter_mut().find(|r| r.id == routine.id) {
            Some(existing) => *existing = routine,
            None => self.routines.push(routine),
        }
    }

    /// Removes the routine and its exercises. Historical logs that
    /// reference it stay untouched; they are the record of fact.
    pub fn delete_routine(&mut self, routine_id: &str) {
        self.routines.retain(|r| r.id != routine_id);
    }

    /// Logs are immutable once written, so an id seen twice is dropped.
    pub fn add_log(&mut self, log: WorkoutLog) {
        if !self.logs.iter().any(|l| l.id == log.id) {
            self.logs.push(log);
        }
    }

    pub fn merge_logs(&mut self, incoming: Vec<WorkoutLog>) {
        for log in incoming {
            self.add_log(log);
        }
    }

    /// Snapshot overwrite of one user's routines, used by cloud sync.
    pub fn replace_routines_for(&mut self, user_id: &str, routines: Vec<Routine>) {
        self.routines.retain(|r| r.user_id != user_id);
        self.routines.extend(routines);
    }

    pub fn routines_for(&self, user_id: &str) -> Vec<Routine> {
        self.routines
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    /// One user's logs, newest first. Ties on the day keep insertion order.
    pub fn logs_for(&self, user_id: &str) -> Vec<WorkoutLog> {
        let mut logs: Vec<WorkoutLog> = self
            .logs
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        logs
    }
}

pub fn get_local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

pub fn save_data(data: &Database) -> Result<(), String> {
    let storage = get_local_storage().ok_or("No localStorage")?;
    let json = serde_json::to_string(data).map_err(|e| e.to_string())?;
    storage.set_item(DB_KEY, &json).map_err(|_| "Failed to save")?;
    Ok(())
}

pub fn load_data() -> Database {
    let storage = match get_local_storage() {
        Some(s) => s,
        None => return Database::default(),
    };
    match storage.get_item(DB_KEY) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_default(),
        _ => Database::default(),
    }
}

// "Keep me logged in": the whole user record under one key.

pub fn save_session_user(user: &User) {
    if let Some(storage) = get_local_storage() {
        if let Ok(json) = serde_json::to_string(user) {
            let _ = storage.set_item(SESSION_USER_KEY, &json);
        }
    }
}

pub fn load_session_user() -> Option<User> {
    let storage = get_local_storage()?;
    let json = storage.get_item(SESSION_USER_KEY).ok()??;
    serde_json::from_str(&json).ok()
}

pub fn clear_session_user() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(SESSION_USER_KEY);
    }
}

// Sync status: "pending", "success", "failed"

pub fn get_sync_status() -> &'static str {
    get_local_storage()
        .and_then(|s| s.get_item(SYNC_STATUS_KEY).ok())
        .flatten()
        .map(|v| match v.as_str() {
            "success" => "success",
            "failed" => "failed",
            _ => "pending",
        })
        .unwrap_or("pending")
}

pub fn is_sync_complete() -> bool {
    get_sync_status() != "pending"
}

pub fn mark_sync_success() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(SYNC_STATUS_KEY, "success");
    }
    increment_data_version(); // Trigger UI refresh
}

pub fn mark_sync_failed() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(SYNC_STATUS_KEY, "failed");
    }
}

pub fn reset_sync_status() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(SYNC_STATUS_KEY, "pending");
    }
}

// Data version: memos subscribe to this to re-read localStorage.

pub fn get_data_version() -> u32 {
    get_local_storage()
        .and_then(|s| s.get_item(DATA_VERSION_KEY).ok())
        .flatten()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

pub fn increment_data_version() {
    let new_version = get_data_version() + 1;
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(DATA_VERSION_KEY, &new_version.to_string());
    }
}

// Pending-save counter: cloud snapshots skip overwriting the routine and
// roster caches while a fire-and-forget save is still in flight.

pub fn pending_saves() -> u32 {
    get_local_storage()
        .and_then(|s| s.get_item(PENDING_SAVES_KEY).ok())
        .flatten()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

pub fn begin_pending_save() {
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(PENDING_SAVES_KEY, &(pending_saves() + 1).to_string());
    }
}

pub fn end_pending_save() {
    if let Some(storage) = get_local_storage() {
        let next = pending_saves().saturating_sub(1);
        let _ = storage.set_item(PENDING_SAVES_KEY, &next.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogEntry;

    fn routine(id: &str, user_id: &str, name: &str) -> Routine {
        Routine {
            id: id.into(),
            user_id: user_id.into(),
            name: name.into(),
            days: vec![],
            exercises: vec![],
        }
    }

    fn log(id: &str, user_id: &str, routine_id: &str, date: &str) -> WorkoutLog {
        WorkoutLog {
            id: id.into(),
            user_id: user_id.into(),
            user_name: "Marta".into(),
            date: date.into(),
            routine_id: routine_id.into(),
            routine_name: "Empuje".into(),
            exercises: vec![LogEntry {
                name: "Press banca".into(),
                weight: 50.0,
                sets_completed: 3,
                total_reps: 30,
                was_successful: true,
            }],
        }
    }

    #[test]
    fn deleting_a_routine_orphans_but_keeps_its_logs() {
        let mut db = Database::default();
        db.upsert_routine(routine("rt-1", "u-1", "Empuje"));
        db.add_log(log("log-1", "u-1", "rt-1", "2026-08-20"));

        db.delete_routine("rt-1");
        assert!(db.routines.is_empty());
        assert_eq!(db.logs.len(), 1);
        assert_eq!(db.logs[0].routine_id, "rt-1");
    }

    #[test]
    fn logs_never_duplicate_by_id() {
        let mut db = Database::default();
        db.add_log(log("log-1", "u-1", "rt-1", "2026-08-20"));
        db.merge_logs(vec![
            log("log-1", "u-1", "rt-1", "2026-08-20"),
            log("log-2", "u-1", "rt-1", "2026-08-21"),
        ]);
        assert_eq!(db.logs.len(), 2);
    }

    #[test]
    fn logs_for_sorts_newest_first() {
        let mut db = Database::default();
        db.add_log(log("log-1", "u-1", "rt-1", "2026-08-01"));
        db.add_log(log("log-2", "u-1", "rt-1", "2026-08-21"));
        db.add_log(log("log-3", "u-2", "rt-9", "2026-08-25"));

        let mine = db.logs_for("u-1");
        let dates: Vec<&str> = mine.iter().map(|l| l.date.as_str()).collect();
        assert_eq!(dates, ["2026-08-21", "2026-08-01"]);
    }

    #[test]
    fn upsert_routine_replaces_in_place() {
        let mut db = Database::default();
        db.upsert_routine(routine("rt-1", "u-1", "Empuje"));
        db.upsert_routine(routine("rt-2", "u-1", "Pierna"));
        db.upsert_routine(routine("rt-1", "u-1", "Empuje v2"));

        let names: Vec<&str> = db.routines.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Empuje v2", "Pierna"]);
    }

    #[test]
    fn snapshot_replace_only_touches_one_users_routines() {
        let mut db = Database::default();
        db.upsert_routine(routine("rt-1", "u-1", "Empuje"));
        db.upsert_routine(routine("rt-2", "u-2", "Pierna"));

        db.replace_routines_for("u-1", vec![routine("rt-3", "u-1", "Full body")]);
        let ids: Vec<&str> = db.routines.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["rt-2", "rt-3"]);
    }
}
