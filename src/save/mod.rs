//! Save envelope around every state mutation: the loading flag goes up at
//! once, the mutation runs after a short delay, and the flag comes down
//! after a further delay.

use crate::schedule::{Scheduler, SharedCell};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct SaveOrchestrator<S, L> {
    scheduler: S,
    loading: L,
    /// Bumped per invocation; only the newest invocation may clear `loading`.
    generation: Arc<AtomicU64>,
    apply_delay_ms: u32,
    clear_delay_ms: u32,
}

impl<S, L> SaveOrchestrator<S, L>
where
    S: Scheduler,
    L: SharedCell<bool>,
{
    pub fn new(scheduler: S, loading: L, apply_delay_ms: u32, clear_delay_ms: u32) -> Self {
        Self {
            scheduler,
            loading,
            generation: Arc::new(AtomicU64::new(0)),
            apply_delay_ms,
            clear_delay_ms,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get_cell()
    }

    /// Runs `mutate` inside the envelope.
    pub fn perform(&self, mutate: impl FnOnce() + 'static) {
        self.loading.set_cell(true);
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;

        let guard = ClearOnDrop {
            scheduler: self.scheduler.clone(),
            loading: self.loading.clone(),
            latest: self.generation.clone(),
            generation,
            delay_ms: self.clear_delay_ms,
        };
        self.scheduler.schedule(
            self.apply_delay_ms,
            Box::new(move || {
                let _guard = guard;
                mutate();
            }),
        );
    }

    /// Like [`perform`](Self::perform) but refuses while a save is in flight.
    pub fn perform_exclusive(&self, mutate: impl FnOnce() + 'static) -> bool {
        if self.is_loading() {
            return false;
        }
        self.perform(mutate);
        true
    }
}

/// Schedules the flag clear when dropped, so it happens even if the
/// mutation unwinds.
struct ClearOnDrop<S: Scheduler, L: SharedCell<bool>> {
    scheduler: S,
    loading: L,
    latest: Arc<AtomicU64>,
    generation: u64,
    delay_ms: u32,
}

impl<S: Scheduler, L: SharedCell<bool>> Drop for ClearOnDrop<S, L> {
    fn drop(&mut self) {
        let loading = self.loading.clone();
        let latest = self.latest.clone();
        let generation = self.generation;
        self.scheduler.schedule(
            self.delay_ms,
            Box::new(move || {
                if latest.load(Ordering::Relaxed) == generation {
                    loading.set_cell(false);
                }
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualScheduler;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn orchestrator() -> (SaveOrchestrator<ManualScheduler, Rc<RefCell<bool>>>, ManualScheduler) {
        let sched = ManualScheduler::default();
        let loading = Rc::new(RefCell::new(false));
        (SaveOrchestrator::new(sched.clone(), loading, 20, 300), sched)
    }

    #[test]
    fn test_flag_set_before_mutation_and_cleared_after() {
        let (save, sched) = orchestrator();
        let ran = Rc::new(RefCell::new(false));
        let r = ran.clone();

        save.perform(move || *r.borrow_mut() = true);
        assert!(save.is_loading());
        assert!(!*ran.borrow());

        sched.advance(20);
        assert!(*ran.borrow());
        assert!(save.is_loading());

        sched.advance(300);
        assert!(!save.is_loading());
    }

    #[test]
    fn test_rapid_invocations_keep_flag_until_last_clears() {
        let (save, sched) = orchestrator();
        let count = Rc::new(RefCell::new(0));

        let c = count.clone();
        save.perform(move || *c.borrow_mut() += 1);
        sched.advance(200);
        let c = count.clone();
        save.perform(move || *c.borrow_mut() += 1);

        // the first clear timer fires here but is stale
        sched.advance(150);
        assert_eq!(*count.borrow(), 2);
        assert!(save.is_loading());

        sched.advance(200);
        assert!(!save.is_loading());
    }

    #[test]
    fn test_flag_clears_when_mutation_panics() {
        let (save, sched) = orchestrator();
        save.perform(|| panic!("boom"));
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sched.advance(20)));
        assert!(outcome.is_err());
        sched.advance(300);
        assert!(!save.is_loading());
    }

    #[test]
    fn test_exclusive_refuses_reentry() {
        let (save, sched) = orchestrator();
        assert!(save.perform_exclusive(|| {}));
        assert!(!save.perform_exclusive(|| {}));
        sched.advance(320);
        assert!(save.perform_exclusive(|| {}));
    }
}
