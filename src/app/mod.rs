use crate::config::AppConfig;
use crate::pages::NotesPage;
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::Router;

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new(AppConfig::from_env());
    state.install_effects();
    provide_context(AppContext(state));

    // NotesPage reads the path itself, so it stays mounted across
    // navigation (/, /archive, /trash, /folder/:id, /category/:id, /tag/:name).
    view! {
        <Router>
            <NotesPage />
        </Router>
    }
}
