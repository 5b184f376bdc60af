use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Panel, section, "bg-card text-card-foreground flex flex-col gap-3 rounded-xl border p-3 shadow-sm"}
    clx! {PanelHeader, div, "flex items-center justify-between gap-2"}
    clx! {PanelTitle, h2, "text-xs font-semibold uppercase tracking-wide text-muted-foreground"}
    clx! {PanelList, ul, "flex flex-col gap-0.5"}
    clx! {PanelItem, li, "group flex min-w-0 items-center gap-1"}
}

pub use components::*;
