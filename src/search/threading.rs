//! Search-worker control primitives.
//!
//! `SearchControl` is the single synchronization point between the main game
//! thread and one search worker. The main thread issues idempotent signals
//! (`block`, `request_pause`, `request_resume`, `request_stop`) and hands out
//! jobs tagged with a generation number; the worker waits for jobs and calls
//! `checkpoint` between search steps. A checkpoint parks the worker while it is
//! paused or blocked and fails once the worker is stopped or its generation is
//! no longer the active one, which is how stale searches are cancelled.
//!
//! The common case (running, not superseded) is answered from atomics without
//! touching the mutex.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Condvar, Mutex, MutexGuard, PoisonError,
};
use std::time::{Duration, Instant};

use thiserror::Error;

const NO_GENERATION: u64 = u64::MAX;

/// Returned by checkpoints once a search must unwind without a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("search interrupted")]
pub struct SearchInterrupt;

#[derive(Debug, Default)]
struct GateState {
    blocked: bool,
    paused: bool,
    stopped: bool,
    /// Job handed out but not yet picked up by the worker.
    pending: Option<u64>,
    /// Generation whose result the main thread still wants.
    active: Option<u64>,
    next_generation: u64,
}

impl GateState {
    #[inline]
    fn halted(&self) -> bool {
        self.blocked || self.paused || self.stopped
    }
}

#[derive(Debug)]
pub struct SearchControl {
    gate: Mutex<GateState>,
    wake: Condvar,

    // Mirrors of the gate for the checkpoint fast path.
    halted: AtomicBool,
    active_generation: AtomicU64,

    step_delay_ms: AtomicU64,
    pub nodes_visited: AtomicU64,
}

impl SearchControl {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: Mutex::new(GateState::default()),
            wake: Condvar::new(),
            halted: AtomicBool::new(false),
            active_generation: AtomicU64::new(NO_GENERATION),
            step_delay_ms: AtomicU64::new(0),
            nodes_visited: AtomicU64::new(0),
        })
    }

    #[inline]
    fn lock_gate(&self) -> MutexGuard<'_, GateState> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `change` under the lock, refreshes the fast-path mirrors and
    /// wakes every waiter.
    fn update(&self, change: impl FnOnce(&mut GateState)) {
        let mut gate = self.lock_gate();
        change(&mut gate);
        self.halted.store(gate.halted(), Ordering::Release);
        self.active_generation
            .store(gate.active.unwrap_or(NO_GENERATION), Ordering::Release);
        drop(gate);
        self.wake.notify_all();
    }

    /// Gates the worker before it starts searching.
    pub fn block(&self, blocked: bool) {
        self.update(|gate| gate.blocked = blocked);
    }

    pub fn request_pause(&self) {
        self.update(|gate| gate.paused = true);
    }

    pub fn request_resume(&self) {
        self.update(|gate| gate.paused = false);
    }

    /// Terminal: the worker finishes within one checkpoint and exits.
    pub fn request_stop(&self) {
        self.update(|gate| {
            gate.stopped = true;
            gate.pending = None;
            gate.active = None;
        });
    }

    pub fn is_blocked(&self) -> bool {
        self.lock_gate().blocked
    }

    pub fn is_paused(&self) -> bool {
        self.lock_gate().paused
    }

    pub fn is_stopped(&self) -> bool {
        self.lock_gate().stopped
    }

    pub fn set_delay(&self, delay: Duration) {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.step_delay_ms.store(ms, Ordering::Relaxed);
        self.wake.notify_all();
    }

    #[inline]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms.load(Ordering::Relaxed))
    }

    /// Queues a new search and returns its generation. Any earlier search is
    /// superseded.
    pub fn start_search(&self) -> u64 {
        let mut generation = 0;
        self.update(|gate| {
            generation = gate.next_generation;
            gate.next_generation = gate.next_generation.wrapping_add(1) % NO_GENERATION;
            gate.pending = Some(generation);
            gate.active = Some(generation);
        });
        generation
    }

    /// Drops the outstanding search, if any. The worker unwinds at its next
    /// checkpoint and waits for another job.
    pub fn cancel_search(&self) {
        self.update(|gate| {
            gate.pending = None;
            gate.active = None;
        });
    }

    pub fn active_generation(&self) -> Option<u64> {
        self.lock_gate().active
    }

    /// Blocks until a job may start. `None` once stopped.
    pub fn wait_for_job(&self) -> Option<u64> {
        let mut gate = self.lock_gate();
        loop {
            if gate.stopped {
                return None;
            }
            if !gate.halted() {
                if let Some(generation) = gate.pending.take() {
                    return Some(generation);
                }
            }
            gate = self.wake.wait(gate).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Parks while paused or blocked; fails once stopped or superseded.
    pub fn checkpoint(&self, generation: u64) -> Result<(), SearchInterrupt> {
        if !self.halted.load(Ordering::Acquire)
            && self.active_generation.load(Ordering::Acquire) == generation
        {
            return Ok(());
        }

        let mut gate = self.lock_gate();
        loop {
            if gate.stopped || gate.active != Some(generation) {
                return Err(SearchInterrupt);
            }
            if !gate.halted() {
                return Ok(());
            }
            gate = self.wake.wait(gate).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Sleeps for the configured step delay, waking early on stop or
    /// supersession, then runs a checkpoint.
    pub fn pace(&self, generation: u64) -> Result<(), SearchInterrupt> {
        let delay = self.delay();
        if !delay.is_zero() {
            let deadline = Instant::now() + delay;
            let mut gate = self.lock_gate();
            loop {
                if gate.stopped || gate.active != Some(generation) {
                    return Err(SearchInterrupt);
                }
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                gate = self
                    .wake
                    .wait_timeout(gate, deadline - now)
                    .map(|(guard, _)| guard)
                    .unwrap_or_else(|poisoned| poisoned.into_inner().0);
            }
        }
        self.checkpoint(generation)
    }

    #[inline]
    pub fn add_nodes(&self, n: u64) {
        self.nodes_visited.fetch_add(n, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::{SearchControl, SearchInterrupt};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn checkpoint_passes_for_active_generation_only() {
        let control = SearchControl::new();
        let first = control.start_search();
        assert_eq!(control.checkpoint(first), Ok(()));

        let second = control.start_search();
        assert_eq!(control.checkpoint(first), Err(SearchInterrupt));
        assert_eq!(control.checkpoint(second), Ok(()));

        control.cancel_search();
        assert_eq!(control.checkpoint(second), Err(SearchInterrupt));
    }

    #[test]
    fn blocked_worker_does_not_receive_job_until_released() {
        let control = SearchControl::new();
        control.block(true);
        let generation = control.start_search();

        let worker_control = Arc::clone(&control);
        let worker = thread::spawn(move || worker_control.wait_for_job());

        thread::sleep(Duration::from_millis(30));
        assert!(!worker.is_finished());
        control.block(false);
        assert_eq!(worker.join().expect("worker joins"), Some(generation));
    }

    #[test]
    fn paused_checkpoint_waits_for_resume() {
        let control = SearchControl::new();
        let generation = control.start_search();
        control.request_pause();

        let worker_control = Arc::clone(&control);
        let worker = thread::spawn(move || worker_control.checkpoint(generation));

        thread::sleep(Duration::from_millis(30));
        assert!(!worker.is_finished());
        control.request_resume();
        assert_eq!(worker.join().expect("worker joins"), Ok(()));
    }

    #[test]
    fn stop_releases_paused_and_idle_waiters() {
        let control = SearchControl::new();
        let generation = control.start_search();
        control.request_pause();

        let paused_control = Arc::clone(&control);
        let paused = thread::spawn(move || paused_control.checkpoint(generation));
        control.request_stop();
        assert_eq!(paused.join().expect("joins"), Err(SearchInterrupt));
        assert_eq!(control.wait_for_job(), None);
    }

    #[test]
    fn pace_wakes_early_on_cancel() {
        let control = SearchControl::new();
        control.set_delay(Duration::from_secs(30));
        let generation = control.start_search();

        let worker_control = Arc::clone(&control);
        let worker = thread::spawn(move || worker_control.pace(generation));
        thread::sleep(Duration::from_millis(20));
        control.cancel_search();
        assert_eq!(worker.join().expect("joins"), Err(SearchInterrupt));
    }
}
