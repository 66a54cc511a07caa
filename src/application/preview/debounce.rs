//! Quiet-period scheduler for preview renders.
//!
//! The scheduler owns at most one armed timer. Arming always aborts the
//! previous timer, and each timer carries a generation number so a callback
//! that already woke up but lost the race against a cancel is rejected by
//! [`DebounceScheduler::complete`].

use std::time::Duration;

use tokio::{runtime::Handle, task::JoinHandle};

/// Default quiet period between the last edit and the render.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    /// No render is pending.
    Idle,
    /// A timer is armed and will render when it elapses.
    PendingRender,
}

pub struct DebounceScheduler {
    quiet_period: Duration,
    runtime: Handle,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl DebounceScheduler {
    pub fn new(quiet_period: Duration, runtime: Handle) -> Self {
        Self {
            quiet_period,
            runtime,
            generation: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> PreviewState {
        if self.pending.is_some() {
            PreviewState::PendingRender
        } else {
            PreviewState::Idle
        }
    }

    /// Cancel any armed timer and arm a new one.
    ///
    /// `on_elapsed` receives the generation of the timer that fired and must
    /// pass it to [`complete`](Self::complete) before acting. Returns whether
    /// a previous timer was cancelled.
    pub fn arm<F>(&mut self, on_elapsed: F) -> bool
    where
        F: FnOnce(u64) + Send + 'static,
    {
        let cancelled = self.cancel();

        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let quiet_period = self.quiet_period;

        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(quiet_period).await;
            on_elapsed(generation);
        }));

        cancelled
    }

    /// Abort the armed timer, if any. Returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(timer) => {
                timer.abort();
                true
            }
            None => false,
        }
    }

    /// Claim the render for the timer identified by `generation`.
    ///
    /// Returns `false` when that timer was cancelled or superseded.
    pub fn complete(&mut self, generation: u64) -> bool {
        if self.pending.is_some() && generation == self.generation {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    fn shared(scheduler: DebounceScheduler) -> Arc<Mutex<DebounceScheduler>> {
        Arc::new(Mutex::new(scheduler))
    }

    fn arm_counting(scheduler: &Arc<Mutex<DebounceScheduler>>, fired: &Arc<AtomicUsize>) -> bool {
        let weak = Arc::downgrade(scheduler);
        let fired = fired.clone();
        scheduler.lock().expect("lock").arm(move |generation| {
            let Some(scheduler) = weak.upgrade() else {
                return;
            };
            if scheduler.lock().expect("lock").complete(generation) {
                fired.fetch_add(1, Ordering::SeqCst);
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_cancels_previous_timer() {
        let scheduler = shared(DebounceScheduler::new(
            Duration::from_millis(500),
            Handle::current(),
        ));
        let fired = Arc::new(AtomicUsize::new(0));

        assert!(!arm_counting(&scheduler, &fired));
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(arm_counting(&scheduler, &fired));
        assert_eq!(
            scheduler.lock().expect("lock").state(),
            PreviewState::PendingRender
        );

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.lock().expect("lock").state(), PreviewState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let scheduler = shared(DebounceScheduler::new(
            DEFAULT_QUIET_PERIOD,
            Handle::current(),
        ));
        let fired = Arc::new(AtomicUsize::new(0));

        arm_counting(&scheduler, &fired);
        assert!(scheduler.lock().expect("lock").cancel());
        assert!(!scheduler.lock().expect("lock").cancel());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stale_generation_is_rejected() {
        let mut scheduler = DebounceScheduler::new(Duration::from_secs(60), Handle::current());
        scheduler.arm(|_| {});
        scheduler.arm(|_| {});

        assert!(!scheduler.complete(1));
        assert!(scheduler.complete(2));
        assert!(!scheduler.complete(2));
    }
}
