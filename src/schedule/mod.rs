//! One-shot timers behind a trait, so timer-driven code can run against the
//! browser clock or a manual clock in tests.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

pub(crate) type TimerId = i32;

pub(crate) trait Scheduler: Clone + 'static {
    /// Runs `task` once after `delay_ms`.
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId;
    fn cancel(&self, id: TimerId);
}

/// `window.setTimeout` / `window.clearTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId {
        let Some(win) = web_sys::window() else {
            return 0;
        };
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || task());
        win.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            i32::try_from(delay_ms).unwrap_or(i32::MAX),
        )
        .unwrap_or(0)
    }

    fn cancel(&self, id: TimerId) {
        if let Some(win) = web_sys::window() {
            win.clear_timeout_with_handle(id);
        }
    }
}

/// A value shared between the code that schedules work and the task that
/// later runs. Reactive signals in the app, plain cells in tests.
pub(crate) trait SharedCell<T>: Clone + 'static {
    fn get_cell(&self) -> T;
    fn set_cell(&self, value: T);
}

impl<T> SharedCell<T> for RwSignal<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn get_cell(&self) -> T {
        self.get_untracked()
    }

    fn set_cell(&self, value: T) {
        self.set(value);
    }
}

#[cfg(test)]
pub(crate) use manual::ManualScheduler;
