use chrono::NaiveDate;
use leptos::*;

use crate::pages::{ActiveWorkout, Dashboard, History, Login, Routines};
use crate::storage;
use crate::supabase;
use crate::types::{AppView, APP_NAME};

/// Collision-resistant enough for ids minted on one device.
pub fn mint_id(prefix: &str) -> String {
    let now = js_sys::Date::now() as u64;
    let random = (js_sys::Math::random() * 1_000_000.0) as u64;
    format!("{}-{:x}{:x}", prefix, now, random)
}

/// Today's calendar date in the device's local timezone.
pub fn today() -> NaiveDate {
    let d = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        d.get_full_year() as i32,
        d.get_month() + 1,
        d.get_date(),
    )
    .unwrap_or_default()
}

pub fn today_str() -> String {
    today().format("%Y-%m-%d").to_string()
}

pub fn format_weight(w: f64) -> String {
    if w.fract() == 0.0 {
        format!("{:.0}", w)
    } else {
        format!("{:.1}", w)
    }
}

/// Three-second toast, shared by every page through its write signal.
pub fn show_toast(set_toast: WriteSignal<Option<String>>, msg: &str) {
    set_toast.set(Some(msg.to_string()));
    gloo_timers::callback::Timeout::new(3000, move || set_toast.set(None)).forget();
}

#[component]
pub fn App() -> impl IntoView {
    let (user, set_user) = create_signal(storage::load_session_user());
    let initial_view = if user.get_untracked().is_some() {
        AppView::Dashboard
    } else {
        AppView::Login
    };
    let (view, set_view) = create_signal(initial_view);
    let (toast, set_toast) = create_signal(Option::<String>::None);
    let (show_logout_confirm, set_show_logout_confirm) = create_signal(false);

    let confirm_logout = move |_| {
        storage::clear_session_user();
        set_user.set(None);
        set_show_logout_confirm.set(false);
        set_view.set(AppView::Login);
    };

    view! {
        <div class="app">
            {move || toast.get().map(|msg| view! {
                <div class="toast">"⚡ " {msg}</div>
            })}

            {move || match user.get() {
                None => view! {
                    <Login set_view=set_view set_user=set_user />
                }.into_view(),
                Some(current) => {
                    let header_user = current.clone();
                    view! {
                        <header class="app-header">
                            <div class="app-brand" on:click=move |_| set_view.set(AppView::Dashboard)>
                                <h1 class="app-title">{APP_NAME}</h1>
                                <p class="app-mode">
                                    {if supabase::is_cloud_active() { "● Cloud Sync" } else { "● Modo Local" }}
                                </p>
                            </div>
                            <div class="app-header-right">
                                <button class="logout-btn" title="Cerrar sesión"
                                    on:click=move |_| set_show_logout_confirm.set(true)>
                                    <svg width="20" height="20" fill="none" viewBox="0 0 24 24" stroke="currentColor" stroke-width="2.5">
                                        <path d="M17 16l4-4m0 0l-4-4m4 4H7m6 4v1a3 3 0 01-3 3H6a3 3 0 01-3-3V7a3 3 0 013-3h4a3 3 0 013 3v1"/>
                                    </svg>
                                </button>
                                <img class="app-avatar" src=header_user.avatar.clone() alt=header_user.name.clone() />
                            </div>
                        </header>

                        <main class="app-main">
                            {move || match view.get() {
                                AppView::Login | AppView::Dashboard => view! {
                                    <Dashboard user=current.clone() set_view=set_view />
                                }.into_view(),
                                AppView::Routines => view! {
                                    <Routines user=current.clone() set_toast=set_toast />
                                }.into_view(),
                                AppView::Active(routine) => view! {
                                    <ActiveWorkout routine=routine user=current.clone() set_view=set_view set_toast=set_toast />
                                }.into_view(),
                                AppView::History => view! {
                                    <History user=current.clone() />
                                }.into_view(),
                            }}
                        </main>

                        <nav class="bottom-nav">
                            <NavButton label="Home"
                                active=Signal::derive(move || matches!(view.get(), AppView::Dashboard | AppView::Login))
                                on_click=move |_| set_view.set(AppView::Dashboard) />
                            <NavButton label="Planes"
                                active=Signal::derive(move || view.get() == AppView::Routines)
                                on_click=move |_| set_view.set(AppView::Routines) />
                            <NavButton label="Historial"
                                active=Signal::derive(move || view.get() == AppView::History)
                                on_click=move |_| set_view.set(AppView::History) />
                        </nav>

                        {move || show_logout_confirm.get().then(|| view! {
                            <div class="modal-overlay">
                                <div class="confirm-dialog">
                                    <div class="confirm-title">"CERRAR SESIÓN"</div>
                                    <div class="confirm-text">"¿Estás seguro de que quieres cerrar tu sesión actual?"</div>
                                    <div class="confirm-buttons">
                                        <button class="confirm-cancel" on:click=move |_| set_show_logout_confirm.set(false)>
                                            "Cancelar"
                                        </button>
                                        <button class="confirm-ok" on:click=confirm_logout>
                                            "Confirmar"
                                        </button>
                                    </div>
                                </div>
                            </div>
                        })}
                    }.into_view()
                }
            }}
        </div>
    }
}

#[component]
fn NavButton(
    label: &'static str,
    active: Signal<bool>,
    #[prop(into)] on_click: Callback<ev::MouseEvent>,
) -> impl IntoView {
    view! {
        <button
            class=move || if active.get() { "nav-btn active" } else { "nav-btn" }
            on:click=move |ev| on_click.call(ev)
        >
            {label}
        </button>
    }
}
