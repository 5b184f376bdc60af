use crate::state::use_app_state;
use icons::X;
use leptos::prelude::*;

#[component]
pub fn ToastView() -> impl IntoView {
    let state = use_app_state();
    let toast = state.toast;
    let message = move || toast.with(|t| t.as_ref().map(|t| t.message.clone()).unwrap_or_default());
    let has_undo = move || toast.with(|t| t.as_ref().is_some_and(|t| t.has_undo()));

    let toaster = state.toaster.clone();
    let undo = move |_| toaster.undo();
    let toaster = state.toaster.clone();
    let dismiss = move |_| toaster.dismiss();

    view! {
        <Show when=move || toast.with(Option::is_some)>
            <div
                data-name="Toast"
                role="status"
                aria-live="polite"
                class="fixed bottom-6 left-6 z-80 flex max-w-sm items-center gap-3 rounded-lg bg-foreground px-4 py-3 text-sm text-background shadow-lg"
            >
                <span class="flex-1">{message}</span>
                <button
                    type="button"
                    class="font-semibold text-primary hover:underline"
                    class:hidden=move || !has_undo()
                    on:click=undo.clone()
                >
                    "Undo"
                </button>
                <button type="button" class="opacity-70 hover:opacity-100 [&_svg]:size-4" aria-label="Dismiss" on:click=dismiss.clone()>
                    <X />
                </button>
            </div>
        </Show>
    }
}
