use std::collections::HashSet;

use chrono::Datelike;
use leptos::*;

use crate::app::{format_weight, today};
use crate::calendar::{self, WEEKDAY_LABELS};
use crate::storage;
use crate::types::User;

#[component]
pub fn History(user: User) -> impl IntoView {
    let user_id = user.id.clone();

    let (data_version, set_data_version) = create_signal(storage::get_data_version());

    // Background sync bumps the stored version; follow it while visible.
    {
        use gloo_timers::callback::Interval;
        let interval = Interval::new(1000, move || {
            let version = storage::get_data_version();
            if version != data_version.get_untracked() {
                set_data_version.set(version);
            }
        });
        leptos::on_cleanup(move || drop(interval));
    }

    let my_logs = {
        let uid = user_id.clone();
        create_memo(move |_| {
            let _ = data_version.get();
            storage::load_data().logs_for(&uid)
        })
    };

    let now = today();
    let grid = calendar::month_grid(now);
    let today_day = now.day();
    let month_title = format!("Mi Progreso: {}", grid.month_name());

    let attended: Memo<HashSet<String>> = create_memo(move |_| {
        my_logs.get().iter().map(|l| l.date.clone()).collect()
    });

    view! {
        <div class="history-page">
            <div class="calendar-card">
                <div class="calendar-head">
                    <h3 class="calendar-title">{month_title}</h3>
                    <span class="calendar-legend">"🏋 = Entrenado"</span>
                </div>

                <div class="calendar-weekdays">
                    {WEEKDAY_LABELS.iter().map(|d| view! {
                        <span class="calendar-weekday">{*d}</span>
                    }).collect_view()}
                </div>

                <div class="calendar-grid">
                    {(0..grid.lead_blanks).map(|_| view! { <div class="calendar-blank"></div> }).collect_view()}
                    {(1..=grid.days).map(|day| {
                        let key = grid.date_key(day);
                        let is_today = day == today_day;
                        view! {
                            <div class=move || {
                                if attended.get().contains(&key) {
                                    "calendar-day attended"
                                } else if is_today {
                                    "calendar-day today"
                                } else {
                                    "calendar-day"
                                }
                            }>
                                <span class="calendar-day-num">{day}</span>
                            </div>
                        }
                    }).collect_view()}
                </div>
            </div>

            <h2 class="history-title">"Tus Registros"</h2>

            {move || {
                let logs = my_logs.get();
                if logs.is_empty() {
                    view! { <div class="history-empty">"Sin actividad"</div> }.into_view()
                } else {
                    logs.into_iter().map(|log| {
                        view! {
                            <div class="log-card">
                                <span class="log-routine">{log.routine_name.clone()}</span>
                                <p class="log-date">{log.date.clone()}</p>
                                <div class="log-entries">
                                    {log.exercises.iter().map(|e| {
                                        let result = if e.was_successful { "✓" } else { "✗" };
                                        let result_class = if e.was_successful {
                                            "log-result ok"
                                        } else {
                                            "log-result missed"
                                        };
                                        view! {
                                            <div class="log-entry">
                                                <span class="log-exercise">{e.name.clone()}</span>
                                                <div class="log-numbers">
                                                    <span class="log-weight">{format!("{}KG", format_weight(e.weight))}</span>
                                                    <span class="log-reps">{format!("{}r", e.total_reps)}</span>
                                                    <span class=result_class>{result}</span>
                                                </div>
                                            </div>
                                        }
                                    }).collect_view()}
                                </div>
                            </div>
                        }
                    }).collect_view()
                }
            }}
        </div>
    }
}
