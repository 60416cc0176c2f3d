use leptos::*;

use crate::app::{format_weight, mint_id, show_toast};
use crate::calendar::WEEKDAY_LABELS;
use crate::editor;
use crate::storage;
use crate::supabase;
use crate::types::{Routine, User};
use crate::units;

/// What a pending confirmation dialog is about to delete.
#[derive(Clone, PartialEq)]
enum Deletion {
    Routine(String),
    Exercise { routine_id: String, exercise_id: String },
}

/// Draft state for the exercise form: weight fields stay as typed text so
/// the KG/LBS mirroring can preserve in-progress edits.
#[derive(Clone, PartialEq)]
struct ExerciseDraft {
    routine_id: String,
    exercise_id: Option<String>,
    name: String,
    kg: String,
    lbs: String,
    sets: String,
    reps: String,
}

impl ExerciseDraft {
    fn blank(routine_id: String) -> Self {
        Self {
            routine_id,
            exercise_id: None,
            name: String::new(),
            kg: "0".into(),
            lbs: "0.0".into(),
            sets: "3".into(),
            reps: "10".into(),
        }
    }

    fn from_existing(routine_id: String, ex: &crate::types::Exercise) -> Self {
        let kg = format_weight(ex.weight);
        let lbs = units::mirror_kg_to_lbs(&kg);
        Self {
            routine_id,
            exercise_id: Some(ex.id.clone()),
            name: ex.name.clone(),
            kg,
            lbs,
            sets: ex.sets.to_string(),
            reps: ex.reps.to_string(),
        }
    }
}

/// Apply one mutation to the local cache, bump the version memos watch,
/// and mirror the result to the cloud.
fn persist_routine(routine: Routine) {
    let mut db = storage::load_data();
    db.upsert_routine(routine.clone());
    let _ = storage::save_data(&db);
    storage::increment_data_version();
    supabase::save_routine(&routine);
}

#[component]
pub fn Routines(user: User, set_toast: WriteSignal<Option<String>>) -> impl IntoView {
    let user_id = user.id.clone();

    let (data_version, set_data_version) = create_signal(storage::get_data_version());
    let (adding, set_adding) = create_signal(false);
    let (new_name, set_new_name) = create_signal(String::new());
    let (form_error, set_form_error) = create_signal(Option::<String>::None);
    let (draft, set_draft) = create_signal(Option::<ExerciseDraft>::None);
    let (pending_deletion, set_pending_deletion) = create_signal(Option::<Deletion>::None);

    let my_routines = {
        let uid = user_id.clone();
        create_memo(move |_| {
            let _ = data_version.get();
            storage::load_data().routines_for(&uid)
        })
    };

    let create_routine = {
        let uid = user_id.clone();
        move |_| {
            match editor::new_routine(mint_id("rt"), &uid, &new_name.get()) {
                Ok(routine) => {
                    persist_routine(routine);
                    set_data_version.set(storage::get_data_version());
                    set_new_name.set(String::new());
                    set_adding.set(false);
                    set_form_error.set(None);
                    show_toast(set_toast, "Rutina creada");
                }
                Err(e) => set_form_error.set(Some(e.to_string())),
            }
        }
    };

    let toggle_day = move |routine_id: String, day: u8| {
        let mut db = storage::load_data();
        if let Some(r) = db.routines.iter_mut().find(|r| r.id == routine_id) {
            editor::toggle_day(r, day);
            let updated = r.clone();
            let _ = storage::save_data(&db);
            storage::increment_data_version();
            supabase::save_routine(&updated);
            set_data_version.set(storage::get_data_version());
        }
    };

    let save_exercise = move |_| {
        let Some(d) = draft.get() else { return };
        let id = d.exercise_id.clone().unwrap_or_else(|| mint_id("ex"));
        match editor::build_exercise(id, &d.name, &d.kg, &d.sets, &d.reps) {
            Ok(exercise) => {
                let mut db = storage::load_data();
                if let Some(r) = db.routines.iter_mut().find(|r| r.id == d.routine_id) {
                    editor::upsert_exercise(r, exercise);
                    let updated = r.clone();
                    let _ = storage::save_data(&db);
                    storage::increment_data_version();
                    supabase::save_routine(&updated);
                }
                set_data_version.set(storage::get_data_version());
                set_draft.set(None);
                set_form_error.set(None);
                show_toast(set_toast, "Ejercicio guardado");
            }
            Err(e) => set_form_error.set(Some(e.to_string())),
        }
    };

    let confirm_deletion = move |_| {
        let Some(target) = pending_deletion.get() else { return };
        let mut db = storage::load_data();
        match target {
            Deletion::Routine(id) => {
                // Historical logs stay; only the plan itself goes.
                db.delete_routine(&id);
                let _ = storage::save_data(&db);
                storage::increment_data_version();
                supabase::delete_routine(&id);
                show_toast(set_toast, "Rutina eliminada");
            }
            Deletion::Exercise { routine_id, exercise_id } => {
                if let Some(r) = db.routines.iter_mut().find(|r| r.id == routine_id) {
                    editor::delete_exercise(r, &exercise_id);
                    let updated = r.clone();
                    let _ = storage::save_data(&db);
                    storage::increment_data_version();
                    supabase::save_routine(&updated);
                }
                show_toast(set_toast, "Ejercicio borrado");
            }
        }
        set_data_version.set(storage::get_data_version());
        set_pending_deletion.set(None);
    };

    view! {
        <div class="routines-page">
            <div class="routines-head">
                <h2 class="routines-title">"Tus Planes"</h2>
                <button class="add-routine-btn" on:click=move |_| {
                    set_adding.set(true);
                    set_form_error.set(None);
                }>"+ NUEVA"</button>
            </div>

            {move || adding.get().then(|| view! {
                <div class="new-routine-form">
                    {move || form_error.get().map(|e| view! { <div class="form-error">{e}</div> })}
                    <input
                        class="new-routine-input"
                        placeholder="Nombre de Rutina"
                        on:input=move |ev| set_new_name.set(event_target_value(&ev))
                        prop:value=new_name
                    />
                    <div class="form-buttons">
                        <button class="form-cancel" on:click=move |_| {
                            set_adding.set(false);
                            set_form_error.set(None);
                        }>"Cancelar"</button>
                        <button class="form-ok" on:click=create_routine.clone()>"Crear"</button>
                    </div>
                </div>
            })}

            {move || my_routines.get().into_iter().map(|r| {
                let routine_id = r.id.clone();
                let routine_id_del = r.id.clone();
                let routine_id_add = r.id.clone();
                let days = r.days.clone();
                view! {
                    <div class="routine-card">
                        <div class="routine-card-head">
                            <h3 class="routine-card-name">{r.name.clone()}</h3>
                            <button class="routine-delete" on:click=move |_| {
                                set_pending_deletion.set(Some(Deletion::Routine(routine_id_del.clone())));
                            }>"🗑"</button>
                        </div>

                        <div class="day-chips">
                            {WEEKDAY_LABELS.iter().enumerate().map(|(i, label)| {
                                // Labels run Monday-first; markers are stored 0=domingo.
                                let day = ((i + 1) % 7) as u8;
                                let marked = days.contains(&day);
                                let rid = routine_id.clone();
                                view! {
                                    <button
                                        class=if marked { "day-chip on" } else { "day-chip" }
                                        on:click=move |_| toggle_day(rid.clone(), day)
                                    >
                                        {*label}
                                    </button>
                                }
                            }).collect_view()}
                        </div>

                        <div class="routine-exercises">
                            {r.exercises.iter().map(|ex| {
                                let rid_edit = routine_id.clone();
                                let rid_del = routine_id.clone();
                                let ex_edit = ex.clone();
                                let ex_id_del = ex.id.clone();
                                let summary = format!(
                                    "{}x{} @ {}kg",
                                    ex.sets, ex.reps, format_weight(ex.weight)
                                );
                                view! {
                                    <div class="exercise-row">
                                        <div>
                                            <div class="exercise-name">{ex.name.clone()}</div>
                                            <div class="exercise-summary">{summary}</div>
                                        </div>
                                        <div class="exercise-actions">
                                            <button class="exercise-edit" on:click=move |_| {
                                                set_form_error.set(None);
                                                set_draft.set(Some(ExerciseDraft::from_existing(rid_edit.clone(), &ex_edit)));
                                            }>"✎"</button>
                                            <button class="exercise-delete" on:click=move |_| {
                                                set_pending_deletion.set(Some(Deletion::Exercise {
                                                    routine_id: rid_del.clone(),
                                                    exercise_id: ex_id_del.clone(),
                                                }));
                                            }>"🗑"</button>
                                        </div>
                                    </div>
                                }
                            }).collect_view()}

                            {
                                let rid = routine_id_add.clone();
                                move || {
                                    let editing_here = draft.get().is_some_and(|d| d.routine_id == rid);
                                    if editing_here {
                                        view! {
                                            <div class="exercise-form">
                                                <div class="exercise-form-head">
                                                    <h4>"Configurar Ejercicio"</h4>
                                                    <button on:click=move |_| set_draft.set(None)>"✕"</button>
                                                </div>

                                                {move || form_error.get().map(|e| view! { <div class="form-error">{e}</div> })}

                                                <input
                                                    class="exercise-form-name"
                                                    placeholder="Nombre"
                                                    on:input=move |ev| set_draft.update(|d| {
                                                        if let Some(d) = d { d.name = event_target_value(&ev); }
                                                    })
                                                    prop:value=move || draft.get().map(|d| d.name).unwrap_or_default()
                                                />

                                                <div class="weight-pair">
                                                    <div class="weight-field">
                                                        <label>"KG"</label>
                                                        <input
                                                            type="number"
                                                            step="0.5"
                                                            on:input=move |ev| set_draft.update(|d| {
                                                                if let Some(d) = d {
                                                                    d.kg = event_target_value(&ev);
                                                                    d.lbs = units::mirror_kg_to_lbs(&d.kg);
                                                                }
                                                            })
                                                            prop:value=move || draft.get().map(|d| d.kg).unwrap_or_default()
                                                        />
                                                    </div>
                                                    <div class="weight-field">
                                                        <label>"LBS"</label>
                                                        <input
                                                            type="number"
                                                            step="0.1"
                                                            on:input=move |ev| set_draft.update(|d| {
                                                                if let Some(d) = d {
                                                                    d.lbs = event_target_value(&ev);
                                                                    d.kg = units::mirror_lbs_to_kg(&d.lbs);
                                                                }
                                                            })
                                                            prop:value=move || draft.get().map(|d| d.lbs).unwrap_or_default()
                                                        />
                                                    </div>
                                                </div>

                                                <div class="count-pair">
                                                    <div class="count-stepper">
                                                        <button on:click=move |_| set_draft.update(|d| {
                                                            if let Some(d) = d {
                                                                let n = editor::parse_count(&d.sets).saturating_sub(1).max(1);
                                                                d.sets = n.to_string();
                                                            }
                                                        })>"-"</button>
                                                        <input
                                                            type="text"
                                                            inputmode="numeric"
                                                            on:input=move |ev| set_draft.update(|d| {
                                                                if let Some(d) = d { d.sets = event_target_value(&ev); }
                                                            })
                                                            prop:value=move || draft.get().map(|d| d.sets).unwrap_or_default()
                                                        />
                                                        <span class="count-label">"S"</span>
                                                        <button on:click=move |_| set_draft.update(|d| {
                                                            if let Some(d) = d {
                                                                let n = editor::parse_count(&d.sets).saturating_add(1);
                                                                d.sets = n.to_string();
                                                            }
                                                        })>"+"</button>
                                                    </div>
                                                    <div class="count-stepper">
                                                        <button on:click=move |_| set_draft.update(|d| {
                                                            if let Some(d) = d {
                                                                let n = editor::parse_count(&d.reps).saturating_sub(1).max(1);
                                                                d.reps = n.to_string();
                                                            }
                                                        })>"-"</button>
                                                        <input
                                                            type="text"
                                                            inputmode="numeric"
                                                            on:input=move |ev| set_draft.update(|d| {
                                                                if let Some(d) = d { d.reps = event_target_value(&ev); }
                                                            })
                                                            prop:value=move || draft.get().map(|d| d.reps).unwrap_or_default()
                                                        />
                                                        <span class="count-label">"R"</span>
                                                        <button on:click=move |_| set_draft.update(|d| {
                                                            if let Some(d) = d {
                                                                let n = editor::parse_count(&d.reps).saturating_add(1);
                                                                d.reps = n.to_string();
                                                            }
                                                        })>"+"</button>
                                                    </div>
                                                </div>

                                                <div class="form-buttons">
                                                    <button class="form-cancel" on:click=move |_| set_draft.set(None)>"Cerrar"</button>
                                                    <button class="form-ok" on:click=save_exercise>"Guardar"</button>
                                                </div>
                                            </div>
                                        }.into_view()
                                    } else {
                                        let rid = rid.clone();
                                        view! {
                                            <button class="add-exercise-btn" on:click=move |_| {
                                                set_form_error.set(None);
                                                set_draft.set(Some(ExerciseDraft::blank(rid.clone())));
                                            }>"+ AÑADIR EJERCICIO"</button>
                                        }.into_view()
                                    }
                                }
                            }
                        </div>
                    </div>
                }
            }).collect_view()}

            {move || pending_deletion.get().map(|target| {
                let (title, message) = match &target {
                    Deletion::Routine(_) => (
                        "BORRAR RUTINA",
                        "¿Seguro que quieres eliminar esta rutina completa?",
                    ),
                    Deletion::Exercise { .. } => (
                        "BORRAR EJERCICIO",
                        "¿Quieres quitar este ejercicio de la rutina?",
                    ),
                };
                view! {
                    <div class="modal-overlay">
                        <div class="confirm-dialog">
                            <div class="confirm-title">{title}</div>
                            <div class="confirm-text">{message}</div>
                            <div class="confirm-buttons">
                                <button class="confirm-cancel" on:click=move |_| set_pending_deletion.set(None)>
                                    "Cancelar"
                                </button>
                                <button class="confirm-ok" on:click=confirm_deletion>
                                    "Confirmar"
                                </button>
                            </div>
                        </div>
                    </div>
                }
            })}
        </div>
    }
}
