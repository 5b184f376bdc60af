//! Single-slot notifications with optional undo, and the motivational
//! quote ticker.

use crate::schedule::{Scheduler, SharedCell, TimerId};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub(crate) type UndoFn = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub(crate) struct Toast {
    pub id: u64,
    pub message: String,
    pub undo: Option<UndoFn>,
}

impl Toast {
    pub fn has_undo(&self) -> bool {
        self.undo.is_some()
    }
}

impl std::fmt::Debug for Toast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toast")
            .field("id", &self.id)
            .field("message", &self.message)
            .field("undo", &self.undo.is_some())
            .finish()
    }
}

impl PartialEq for Toast {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Shows at most one toast. A new toast replaces the current one and
/// restarts the auto-dismiss timer.
#[derive(Clone)]
pub(crate) struct Toaster<S, C> {
    scheduler: S,
    slot: C,
    timer: Arc<Mutex<Option<TimerId>>>,
    next_id: Arc<AtomicU64>,
    duration_ms: u32,
}

impl<S, C> Toaster<S, C>
where
    S: Scheduler,
    C: SharedCell<Option<Toast>>,
{
    pub fn new(scheduler: S, slot: C, duration_ms: u32) -> Self {
        Self {
            scheduler,
            slot,
            timer: Arc::new(Mutex::new(None)),
            next_id: Arc::new(AtomicU64::new(0)),
            duration_ms,
        }
    }

    pub fn show(&self, message: impl Into<String>) {
        self.present(message.into(), None);
    }

    pub fn show_with_undo(&self, message: impl Into<String>, undo: UndoFn) {
        self.present(message.into(), Some(undo));
    }

    fn cancel_timer(&self) {
        if let Ok(mut timer) = self.timer.lock() {
            if let Some(id) = timer.take() {
                self.scheduler.cancel(id);
            }
        }
    }

    fn present(&self, message: String, undo: Option<UndoFn>) {
        self.cancel_timer();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.slot.set_cell(Some(Toast { id, message, undo }));

        let slot = self.slot.clone();
        let timer_id = self.scheduler.schedule(
            self.duration_ms,
            Box::new(move || {
                if slot.get_cell().is_some_and(|t| t.id == id) {
                    slot.set_cell(None);
                }
            }),
        );
        if let Ok(mut timer) = self.timer.lock() {
            *timer = Some(timer_id);
        }
    }

    pub fn dismiss(&self) {
        self.cancel_timer();
        self.slot.set_cell(None);
    }

    /// Runs the current toast's undo, if any, and dismisses it.
    pub fn undo(&self) {
        let current = self.slot.get_cell();
        self.dismiss();
        if let Some(undo) = current.and_then(|t| t.undo) {
            undo();
        }
    }

    pub fn teardown(&self) {
        self.cancel_timer();
    }
}

pub(crate) const MOTIVATIONAL_QUOTES: [&str; 10] = [
    "Success is the sum of small efforts repeated day in and day out.",
    "The only way to do great work is to love what you do. Keep going!",
    "Don't stop when you're tired, stop when you're done. You can do it!",
    "Perseverance is not a long race; it is many short races one after another.",
    "Your future is created by what you do today, not tomorrow.",
    "Discipline is the bridge between goals and accomplishment.",
    "Believe in yourself. You are braver than you think and capable of more than you imagine.",
    "Every achievement starts with the decision to try.",
    "Hard work beats talent when talent doesn't work hard.",
    "Even the darkest night will end and the sun will rise. A short break can recharge a lot of energy!",
];

/// Picks a quote from a unit-interval random value.
pub(crate) fn quote_for(unit: f64) -> &'static str {
    let index = (unit.clamp(0.0, 1.0) * MOTIVATIONAL_QUOTES.len() as f64) as usize;
    MOTIVATIONAL_QUOTES[index.min(MOTIVATIONAL_QUOTES.len() - 1)]
}

/// Fires a callback at random intervals between `min_ms` and `max_ms`,
/// rescheduling itself after each tick until torn down.
#[derive(Clone)]
pub(crate) struct QuoteTicker<S> {
    scheduler: S,
    timer: Arc<Mutex<Option<TimerId>>>,
    stopped: Arc<AtomicBool>,
    min_ms: u32,
    max_ms: u32,
    random: fn() -> f64,
}

impl<S: Scheduler> QuoteTicker<S> {
    pub fn new(scheduler: S, min_ms: u32, max_ms: u32, random: fn() -> f64) -> Self {
        Self {
            scheduler,
            timer: Arc::new(Mutex::new(None)),
            stopped: Arc::new(AtomicBool::new(false)),
            min_ms: min_ms.min(max_ms),
            max_ms: max_ms.max(min_ms),
            random,
        }
    }

    fn next_delay(&self) -> u32 {
        let span = f64::from(self.max_ms - self.min_ms);
        self.min_ms + ((self.random)().clamp(0.0, 1.0) * span) as u32
    }

    pub fn start(&self, on_tick: impl Fn() + 'static) {
        self.stopped.store(false, Ordering::Relaxed);
        self.arm(Rc::new(on_tick));
    }

    fn arm(&self, on_tick: Rc<dyn Fn()>) {
        if self.stopped.load(Ordering::Relaxed) {
            return;
        }
        let this = self.clone();
        let id = self.scheduler.schedule(
            self.next_delay(),
            Box::new(move || {
                if this.stopped.load(Ordering::Relaxed) {
                    return;
                }
                on_tick();
                this.arm(on_tick);
            }),
        );
        if let Ok(mut timer) = self.timer.lock() {
            *timer = Some(id);
        }
    }

    pub fn teardown(&self) {
        self.stopped.store(true, Ordering::Relaxed);
        if let Ok(mut timer) = self.timer.lock() {
            if let Some(id) = timer.take() {
                self.scheduler.cancel(id);
            }
        }
    }
}
