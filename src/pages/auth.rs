use leptos::*;

use crate::app::mint_id;
use crate::auth;
use crate::storage;
use crate::supabase;
use crate::types::{AppView, User, APP_NAME};

/// Login and registration over the shared roster. The roster is whatever
/// the last cloud snapshot (or local cache) holds; registering uploads the
/// new user and logs them in directly.
#[component]
pub fn Login(set_view: WriteSignal<AppView>, set_user: WriteSignal<Option<User>>) -> impl IntoView {
    let (registering, set_registering) = create_signal(false);
    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (keep_session, set_keep_session) = create_signal(true);
    let (error, set_error) = create_signal(Option::<String>::None);

    let complete_login = move |user: User| {
        if keep_session.get() {
            storage::save_session_user(&user);
        }
        // Pull this user's routines right away, whether or not the
        // session was persisted.
        supabase::sync_from_cloud(Some(user.id.clone()));
        set_user.set(Some(user));
        set_view.set(AppView::Dashboard);
    };

    let submit = move |_| {
        set_error.set(None);
        let name = username.get();
        let pass = password.get();
        let mut db = storage::load_data();

        if registering.get() {
            match auth::register(&db.users, mint_id("user"), &name, &pass) {
                Ok(new_user) => {
                    db.upsert_user(new_user.clone());
                    let _ = storage::save_data(&db);
                    storage::increment_data_version();
                    supabase::save_user(&new_user);
                    complete_login(new_user);
                }
                Err(e) => set_error.set(Some(e.to_string())),
            }
        } else {
            match auth::authenticate(&db.users, &name, &pass) {
                Ok(user) => complete_login(user.clone()),
                Err(e) => set_error.set(Some(e.to_string())),
            }
        }
    };

    view! {
        <div class="auth-container">
            <div class="auth-logo">{APP_NAME}<span class="auth-logo-dot">"."</span></div>
            <p class="auth-tagline">
                {move || if registering.get() { "Únete al escuadrón" } else { "Vuelve al entrenamiento" }}
            </p>

            <div class="auth-card">
                {move || error.get().map(|e| view! { <div class="auth-error">{e}</div> })}

                <label class="auth-label">"Nombre de Atleta"</label>
                <input
                    type="text"
                    class="auth-input"
                    placeholder="p.ej. Arnold123"
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                    prop:value=username
                />

                <label class="auth-label">"Contraseña"</label>
                <input
                    type="password"
                    class="auth-input"
                    placeholder="••••••••"
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    prop:value=password
                />

                <div class="auth-keep-row">
                    <button
                        class=move || if keep_session.get() { "auth-toggle on" } else { "auth-toggle" }
                        on:click=move |_| set_keep_session.update(|k| *k = !*k)
                    >
                        <div class="auth-toggle-knob"></div>
                    </button>
                    <span class="auth-keep-label">"Mantener sesión iniciada"</span>
                </div>

                <button class="auth-button" on:click=submit>
                    {move || if registering.get() { "CREAR MI CUENTA" } else { "ENTRAR A ENTRENAR" }}
                </button>
            </div>

            <button
                class="auth-switch"
                on:click=move |_| {
                    set_registering.update(|r| *r = !*r);
                    set_error.set(None);
                }
            >
                {move || if registering.get() {
                    "¿Ya tienes cuenta? Inicia Sesión"
                } else {
                    "¿Eres nuevo? Regístrate aquí"
                }}
            </button>
        </div>
    }
}
