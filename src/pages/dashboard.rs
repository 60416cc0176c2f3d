use leptos::*;

use crate::app::today;
use crate::coach;
use crate::leaderboard::{self, WEEKLY_GOAL};
use crate::storage;
use crate::supabase;
use crate::types::{AppView, User};

const SYNC_POLL_MS: u32 = 30_000;

#[component]
pub fn Dashboard(user: User, set_view: WriteSignal<AppView>) -> impl IntoView {
    let user_id = user.id.clone();

    let (data_version, set_data_version) = create_signal(storage::get_data_version());
    let (is_loading, set_is_loading) = create_signal(!storage::is_sync_complete());
    let (advice, set_advice) = create_signal(String::from("Cargando datos..."));

    // Wait for the startup sync, then follow the data version it bumps.
    if !storage::is_sync_complete() {
        use gloo_timers::callback::Interval;
        let interval = Interval::new(200, move || {
            if storage::is_sync_complete() {
                set_is_loading.set(false);
                set_data_version.set(storage::get_data_version());
            }
        });
        leptos::on_cleanup(move || drop(interval));
    }

    // Periodic roster/log refresh; cross-user data is a read-only snapshot.
    {
        use gloo_timers::callback::Interval;
        let uid = user_id.clone();
        let interval = Interval::new(SYNC_POLL_MS, move || {
            supabase::sync_from_cloud(Some(uid.clone()));
            set_data_version.set(storage::get_data_version());
        });
        leptos::on_cleanup(move || drop(interval));
    }

    let ranking = create_memo(move |_| {
        let _ = data_version.get();
        let db = storage::load_data();
        let stats = leaderboard::compute_stats(&db.users, &db.logs, today());
        let max = leaderboard::max_attendance(&stats);
        (stats, max)
    });

    let my_routines = {
        let uid = user_id.clone();
        create_memo(move |_| {
            let _ = data_version.get();
            storage::load_data().routines_for(&uid)
        })
    };

    let my_log_count = {
        let uid = user_id.clone();
        create_memo(move |_| {
            let _ = data_version.get();
            storage::load_data().logs_for(&uid).len()
        })
    };

    // One advice fetch per change in the user's total log count.
    {
        let uid = user_id.clone();
        create_effect(move |_| {
            let _ = my_log_count.get();
            let logs = storage::load_data().logs_for(&uid);
            spawn_local(async move {
                let tip = coach::fetch_advice(&logs).await;
                set_advice.set(tip);
            });
        });
    }

    let sync_failed = create_memo(move |_| {
        let _ = data_version.get();
        storage::get_sync_status() == "failed"
    });

    view! {
        <div class="dashboard">
            {move || is_loading.get().then(|| view! {
                <div class="sync-loading">"Cargando datos..."</div>
            })}

            {move || sync_failed.get().then(|| view! {
                <div class="sync-banner">
                    "No se pudo sincronizar con la nube. Tus cambios locales siguen aquí y se reconciliarán en la próxima sincronización."
                </div>
            })}

            <div class="ranking-card">
                <h2 class="ranking-title">
                    <span>"🔥 RANKING GLOBAL"</span>
                    <span class="ranking-subtitle">"Asistencias + Bonos"</span>
                </h2>
                {move || {
                    let (stats, max) = ranking.get();
                    stats.into_iter().enumerate().map(|(index, s)| {
                        let badge_class = if index == 0 { "rank-badge first" } else { "rank-badge" };
                        let bar_width = format!("width: {}%", s.total_attendance * 100 / max);
                        view! {
                            <div class="rank-row">
                                <div class="rank-head">
                                    <div class=badge_class>{index + 1}</div>
                                    <img class="rank-avatar" src=s.user.avatar.clone() alt=s.user.name.clone() />
                                    <div class="rank-info">
                                        <div class="rank-name">
                                            {s.user.name.clone()}
                                            {s.has_reached_weekly_goal.then(|| view! {
                                                <span class="rank-goal" title="Meta semanal cumplida">" ✅"</span>
                                            })}
                                        </div>
                                        <div class="rank-pips">
                                            {(0..WEEKLY_GOAL).map(|i| {
                                                let pip = if i < s.weekly_count { "pip on" } else { "pip" };
                                                view! { <div class=pip></div> }
                                            }).collect_view()}
                                            <span class="pip-label">"Meta"</span>
                                        </div>
                                    </div>
                                    <div class="rank-score">
                                        <span class="rank-total">{s.total_attendance}</span>
                                        {(s.bonus_points > 0).then(|| view! {
                                            <span class="rank-bonus">"+" {s.bonus_points} " BONO"</span>
                                        })}
                                    </div>
                                </div>
                                <div class="rank-bar">
                                    <div class="rank-bar-fill" style=bar_width></div>
                                </div>
                            </div>
                        }
                    }).collect_view()
                }}
            </div>

            <div class="coach-card">
                <h3 class="coach-title">"● Coach IA"</h3>
                <p class="coach-text">"\"" {move || advice.get()} "\""</p>
            </div>

            <section class="train-now">
                <h2 class="train-now-title">"Entrenar Ahora"</h2>
                {move || {
                    let routines = my_routines.get();
                    if routines.is_empty() {
                        view! {
                            <p class="train-now-empty">"Crea tu primer plan en la pestaña Planes"</p>
                        }.into_view()
                    } else {
                        routines.into_iter().map(|r| {
                            let label = format!("{} Ejercicios", r.exercises.len());
                            let name = r.name.clone();
                            view! {
                                <button class="train-btn" on:click=move |_| {
                                    set_view.set(AppView::Active(r.clone()));
                                }>
                                    <div class="train-btn-info">
                                        <h4 class="train-btn-name">{name}</h4>
                                        <p class="train-btn-count">{label}</p>
                                    </div>
                                    <div class="train-btn-play">"▶"</div>
                                </button>
                            }
                        }).collect_view()
                    }
                }}
            </section>
        </div>
    }
}
