use leptos::*;

use crate::app::{format_weight, mint_id, show_toast, today_str};
use crate::session::{ActiveSession, SetEntry};
use crate::storage;
use crate::supabase;
use crate::types::{AppView, Routine, User};
use crate::units;

/// One set being edited in the panel: reps as a stepper, weight as a
/// mirrored KG/LBS text pair.
#[derive(Clone, PartialEq)]
struct EditingSet {
    exercise_id: String,
    set_index: usize,
    reps: u8,
    kg: String,
    lbs: String,
}

#[component]
pub fn ActiveWorkout(
    routine: Routine,
    user: User,
    set_view: WriteSignal<AppView>,
    set_toast: WriteSignal<Option<String>>,
) -> impl IntoView {
    let routine_name = routine.name.clone();
    let exercises = routine.exercises.clone();

    let (session, set_session) = create_signal(ActiveSession::start(routine));
    let (editing, set_editing) = create_signal(Option::<EditingSet>::None);
    let (show_leave_confirm, set_show_leave_confirm) = create_signal(false);

    // Leaving discards the session with no durable trace.
    let confirm_leave = move |_| set_view.set(AppView::Dashboard);

    let user_finish = user.clone();
    let finish = move |_| {
        let (log, updated) = session
            .get()
            .finish(&mint_id("log"), &user_finish, &today_str());

        let mut db = storage::load_data();
        db.add_log(log.clone());
        db.upsert_routine(updated.clone());
        let _ = storage::save_data(&db);
        storage::increment_data_version();

        supabase::save_log(&log);
        supabase::save_routine(&updated);

        show_toast(set_toast, "¡SESIÓN FINALIZADA! 🏆");
        set_view.set(AppView::Dashboard);
    };

    let confirm_set = move |_| {
        let Some(e) = editing.get() else { return };
        set_session.update(|s| {
            s.record_set(
                &e.exercise_id,
                e.set_index,
                SetEntry {
                    reps: e.reps,
                    weight: units::parse_weight(&e.kg).max(0.0),
                },
            );
        });
        set_editing.set(None);
    };

    let clear_set = move |_| {
        let Some(e) = editing.get() else { return };
        set_session.update(|s| s.clear_set(&e.exercise_id, e.set_index));
        set_editing.set(None);
    };

    view! {
        <div class="active-page">
            <div class="active-head">
                <div>
                    <h2 class="active-name">{routine_name}</h2>
                    <p class="active-sub">"Sesión en progreso"</p>
                </div>
                <button class="active-leave" on:click=move |_| set_show_leave_confirm.set(true)>
                    "SALIR"
                </button>
            </div>

            {exercises.into_iter().map(|ex| {
                let ex_id = ex.id.clone();
                let target = format!("{} REPS", ex.reps);
                let target_weight = format!("{}KG", format_weight(ex.weight));
                view! {
                    <div class="active-exercise">
                        <div class="active-exercise-head">
                            <h4 class="active-exercise-name">{ex.name.clone()}</h4>
                            <div class="active-exercise-targets">
                                <span class="target-weight">{target_weight}</span>
                                <span class="target-reps">{target}</span>
                            </div>
                        </div>

                        <div class="set-row">
                            {(0..ex.sets as usize).map(|i| {
                                let eid = ex_id.clone();
                                let eid_click = ex_id.clone();
                                let default_reps = ex.reps;
                                let default_weight = ex.weight;
                                let slot = move || session.get().set(&eid, i).cloned();
                                let slot_for_class = slot.clone();
                                view! {
                                    <button
                                        class=move || if slot_for_class().is_some() { "set-slot logged" } else { "set-slot" }
                                        on:click=move |_| {
                                            let current = session.get().set(&eid_click, i).cloned();
                                            let reps = current.as_ref().map(|s| s.reps).unwrap_or(default_reps);
                                            let weight = current.as_ref().map(|s| s.weight).unwrap_or(default_weight);
                                            let kg = format_weight(weight);
                                            let lbs = units::mirror_kg_to_lbs(&kg);
                                            set_editing.set(Some(EditingSet {
                                                exercise_id: eid_click.clone(),
                                                set_index: i,
                                                reps,
                                                kg,
                                                lbs,
                                            }));
                                        }
                                    >
                                        <span class="set-slot-label">{format!("S{}", i + 1)}</span>
                                        <span class="set-slot-value">
                                            {move || slot().map(|s| s.reps.to_string()).unwrap_or_else(|| "-".into())}
                                        </span>
                                    </button>
                                }
                            }).collect_view()}
                        </div>

                        {
                            let eid = ex_id.clone();
                            move || {
                                let here = editing.get().is_some_and(|e| e.exercise_id == eid);
                                here.then(|| {
                                    let slot_set = editing.get()
                                        .map(|e| session.get().set(&e.exercise_id, e.set_index).is_some())
                                        .unwrap_or(false);
                                    view! {
                                        <div class="set-editor">
                                            <div class="rep-stepper">
                                                <button on:click=move |_| set_editing.update(|e| {
                                                    if let Some(e) = e { e.reps = e.reps.saturating_sub(1); }
                                                })>"-"</button>
                                                <div class="rep-value">
                                                    {move || editing.get().map(|e| e.reps).unwrap_or(0)}
                                                </div>
                                                <button on:click=move |_| set_editing.update(|e| {
                                                    if let Some(e) = e { e.reps = e.reps.saturating_add(1); }
                                                })>"+"</button>
                                            </div>
                                            <p class="rep-label">"Repeticiones"</p>

                                            <div class="weight-pair">
                                                <div class="weight-field">
                                                    <label>"KG"</label>
                                                    <input
                                                        type="number"
                                                        step="0.5"
                                                        on:input=move |ev| set_editing.update(|e| {
                                                            if let Some(e) = e {
                                                                e.kg = event_target_value(&ev);
                                                                e.lbs = units::mirror_kg_to_lbs(&e.kg);
                                                            }
                                                        })
                                                        prop:value=move || editing.get().map(|e| e.kg).unwrap_or_default()
                                                    />
                                                </div>
                                                <div class="weight-field">
                                                    <label>"LBS"</label>
                                                    <input
                                                        type="number"
                                                        step="0.1"
                                                        on:input=move |ev| set_editing.update(|e| {
                                                            if let Some(e) = e {
                                                                e.lbs = event_target_value(&ev);
                                                                e.kg = units::mirror_lbs_to_kg(&e.lbs);
                                                            }
                                                        })
                                                        prop:value=move || editing.get().map(|e| e.lbs).unwrap_or_default()
                                                    />
                                                </div>
                                            </div>

                                            <div class="set-editor-buttons">
                                                <button class="form-cancel" on:click=move |_| set_editing.set(None)>
                                                    "Cancelar"
                                                </button>
                                                {slot_set.then(|| view! {
                                                    <button class="set-clear" on:click=clear_set>
                                                        "Borrar serie"
                                                    </button>
                                                })}
                                                <button class="form-ok" on:click=confirm_set>
                                                    "Confirmar"
                                                </button>
                                            </div>
                                        </div>
                                    }
                                })
                            }
                        }
                    </div>
                }
            }).collect_view()}

            <button class="finish-btn" on:click=finish>
                "FINALIZAR SESIÓN 🏆"
            </button>

            {move || show_leave_confirm.get().then(|| view! {
                <div class="modal-overlay">
                    <div class="confirm-dialog">
                        <div class="confirm-title">"ABANDONAR"</div>
                        <div class="confirm-text">"¿Quieres salir? No se guardarán los cambios actuales."</div>
                        <div class="confirm-buttons">
                            <button class="confirm-cancel" on:click=move |_| set_show_leave_confirm.set(false)>
                                "Cancelar"
                            </button>
                            <button class="confirm-ok" on:click=confirm_leave>
                                "Confirmar"
                            </button>
                        </div>
                    </div>
                </div>
            })}
        </div>
    }
}
