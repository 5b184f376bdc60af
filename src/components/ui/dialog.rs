use icons::X;
use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::*;

mod components {
    use super::*;
    clx! {DialogBody, div, "flex flex-col gap-4"}
    clx! {DialogHeader, div, "flex flex-col gap-2 text-center sm:text-left"}
    clx! {DialogTitle, h3, "text-lg leading-none font-semibold"}
    clx! {DialogDescription, p, "text-muted-foreground text-sm"}
    clx! {DialogFooter, footer, "flex flex-col-reverse gap-2 sm:flex-row sm:justify-end"}
}

pub use components::*;

/// Signal-driven modal. Rendered only while `open` is true; the backdrop
/// and the close button both call `on_close`.
#[component]
pub fn Modal(
    children: ChildrenFn,
    #[prop(into)] open: Signal<bool>,
    on_close: Callback<()>,
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] label: String,
    #[prop(optional)] hide_close_button: bool,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "pointer-events-auto relative bg-background border rounded-2xl shadow-lg p-6 w-full max-w-lg max-h-[85vh] overflow-y-auto",
        class
    );

    view! {
        <Show when=move || open.get()>
            <div
                data-name="ModalBackdrop"
                class="fixed inset-0 z-60 bg-black/50"
                on:click=move |_| on_close.run(())
            />
            <div
                data-name="ModalContent"
                role="dialog"
                aria-modal="true"
                aria-label=label.clone()
                class="pointer-events-none fixed inset-0 z-70 flex items-center justify-center p-4"
            >
                <div class=merged_class.clone()>
                    <Show when=move || !hide_close_button>
                        <button
                            type="button"
                            class="absolute top-4 right-4 rounded-sm p-1 focus:ring-2 focus:ring-ring focus:outline-none [&_svg:not([class*='size-'])]:size-4"
                            aria-label="Close dialog"
                            on:click=move |_| on_close.run(())
                        >
                            <X />
                        </button>
                    </Show>
                    {children()}
                </div>
            </div>
        </Show>
    }
}
