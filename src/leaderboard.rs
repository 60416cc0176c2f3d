//! Attendance ranking: a pure function of the roster and the full
//! cross-user log history, recomputed on every render.

use chrono::{Datelike, Days, NaiveDate};

use crate::types::{User, UserStats, WorkoutLog};

/// Sessions per week needed for the weekly badge.
pub const WEEKLY_GOAL: usize = 4;

/// Most recent Monday, counting Sunday as six days past it.
pub fn week_start(today: NaiveDate) -> NaiveDate {
    let offset = today.weekday().num_days_from_monday() as u64;
    today.checked_sub_days(Days::new(offset)).unwrap_or(today)
}

/// Per-user tallies, ranked by lifetime attendance (descending, stable on
/// roster order for ties). Weekly counts compare the zero-padded date
/// strings directly against the week-start bound.
pub fn compute_stats(roster: &[User], logs: &[WorkoutLog], today: NaiveDate) -> Vec<UserStats> {
    let week_floor = week_start(today).format("%Y-%m-%d").to_string();

    let mut stats: Vec<UserStats> = roster
        .iter()
        .map(|user| {
            let mut total_attendance = 0;
            let mut weekly_count = 0;
            for log in logs.iter().filter(|l| l.user_id == user.id) {
                total_attendance += 1;
                if log.date.as_str() >= week_floor.as_str() {
                    weekly_count += 1;
                }
            }
            UserStats {
                user: user.clone(),
                total_attendance,
                weekly_count,
                has_reached_weekly_goal: weekly_count >= WEEKLY_GOAL,
                bonus_points: 0,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.total_attendance.cmp(&a.total_attendance));
    stats
}

/// Denominator for the attendance bars. Never zero.
pub fn max_attendance(stats: &[UserStats]) -> usize {
    stats
        .iter()
        .map(|s| s.total_attendance)
        .max()
        .unwrap_or(0)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogEntry;

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.into(),
            name: name.into(),
            password: "x".into(),
            avatar: String::new(),
        }
    }

    fn log(user_id: &str, date: &str) -> WorkoutLog {
        WorkoutLog {
            id: format!("{}-{}", user_id, date),
            user_id: user_id.into(),
            user_name: user_id.into(),
            date: date.into(),
            routine_id: "rt".into(),
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

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn week_start_rebases_every_weekday_to_monday() {
        let monday = date("2026-08-24");
        for offset in 0..7 {
            let day = monday.checked_add_days(Days::new(offset)).unwrap();
            assert_eq!(week_start(day), monday, "offset {}", offset);
        }
        // Sunday belongs to the week that started six days earlier.
        assert_eq!(week_start(date("2026-08-30")), monday);
        assert_eq!(week_start(date("2026-08-31")), date("2026-08-31"));
    }

    #[test]
    fn ranking_follows_lifetime_attendance_not_weekly_counts() {
        let roster = [user("a", "Ana"), user("b", "Bruno")];
        // Week of Monday 2026-08-24; "today" is Tuesday the 25th.
        // A has 5 total with 4 this week, B has 3 total all within the week.
        let logs = vec![
            log("a", "2026-07-01"),
            log("a", "2026-08-24"),
            log("a", "2026-08-24"),
            log("a", "2026-08-25"),
            log("a", "2026-08-25"),
            log("b", "2026-08-24"),
            log("b", "2026-08-25"),
            log("b", "2026-08-25"),
        ];

        let stats = compute_stats(&roster, &logs, date("2026-08-25"));
        assert_eq!(stats[0].user.id, "a");
        assert_eq!(stats[0].total_attendance, 5);
        assert_eq!(stats[0].weekly_count, 4);
        assert!(stats[0].has_reached_weekly_goal);
        assert_eq!(stats[1].user.id, "b");
        assert_eq!(stats[1].total_attendance, 3);
        assert_eq!(stats[1].weekly_count, 3);
        assert!(!stats[1].has_reached_weekly_goal);
    }

    #[test]
    fn logs_before_monday_do_not_count_toward_the_week() {
        let roster = [user("a", "Ana")];
        let logs = vec![log("a", "2026-08-23"), log("a", "2026-08-24")];

        let stats = compute_stats(&roster, &logs, date("2026-08-25"));
        assert_eq!(stats[0].total_attendance, 2);
        assert_eq!(stats[0].weekly_count, 1);
    }

    #[test]
    fn ties_keep_roster_order() {
        let roster = [user("a", "Ana"), user("b", "Bruno"), user("c", "Carla")];
        let logs = vec![log("a", "2026-08-20"), log("b", "2026-08-20")];

        let stats = compute_stats(&roster, &logs, date("2026-08-25"));
        let order: Vec<&str> = stats.iter().map(|s| s.user.id.as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn empty_roster_and_history_produce_empty_output() {
        let stats = compute_stats(&[], &[], date("2026-08-25"));
        assert!(stats.is_empty());
        assert_eq!(max_attendance(&stats), 1);
    }

    #[test]
    fn roster_without_logs_gets_all_zero_stats() {
        let roster = [user("a", "Ana")];
        let stats = compute_stats(&roster, &[], date("2026-08-25"));
        assert_eq!(stats[0].total_attendance, 0);
        assert_eq!(stats[0].weekly_count, 0);
        assert!(!stats[0].has_reached_weekly_goal);
        assert_eq!(stats[0].bonus_points, 0);
        assert_eq!(max_attendance(&stats), 1);
    }
}
