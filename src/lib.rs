mod app;
mod auth;
mod calendar;
mod coach;
mod editor;
mod leaderboard;
mod pages;
mod session;
mod storage;
mod supabase;
mod types;
mod units;

use leptos::*;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    // Fresh snapshot in the background; the UI follows the sync status.
    storage::reset_sync_status();
    supabase::sync_from_cloud(storage::load_session_user().map(|u| u.id));

    mount_to_body(app::App);
}
