use crate::models::NOTE_COLORS;
use crate::state::use_app_state;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Palette swatches plus the user's saved custom colours and a native
/// colour input that adds to them.
#[component]
pub fn ColorSwatches(#[prop(into)] selected: Signal<String>, on_pick: Callback<String>) -> impl IntoView {
    let state = use_app_state();
    let custom_colors = state.custom_colors;

    let swatch = move |color: String| {
        let pick = color.clone();
        let is_selected = {
            let color = color.clone();
            move || selected.get().eq_ignore_ascii_case(&color)
        };
        view! {
            <button
                type="button"
                class="size-6 rounded-full border border-white/20 transition-transform hover:scale-110"
                class:ring-2=is_selected
                style=format!("background-color: {color}")
                title=color.clone()
                aria-label=format!("Colour {color}")
                on:click=move |ev: web_sys::MouseEvent| {
                    ev.stop_propagation();
                    on_pick.run(pick.clone());
                }
            />
        }
    };

    let on_custom = move |ev: web_sys::Event| {
        if let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        {
            let color = input.value();
            state.remember_custom_color(&color);
            on_pick.run(color);
        }
    };

    view! {
        <div class="flex flex-wrap items-center gap-1.5" on:click=|ev| ev.stop_propagation()>
            {NOTE_COLORS.iter().map(|c| swatch(c.to_string())).collect_view()}
            {move || custom_colors.get().into_iter().map(swatch).collect_view()}
            <label class="relative size-6 cursor-pointer rounded-full border border-dashed text-center text-xs leading-6" title="Custom colour">
                "+"
                <input type="color" class="absolute inset-0 cursor-pointer opacity-0" on:change=on_custom />
            </label>
        </div>
    }
}
