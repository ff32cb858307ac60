//! Timer scheduling for the reveal animation and cursor blink.
//!
//! Fired timers are delivered back into the controller's event queue, so all
//! view mutation stays on the single task that drains that queue.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::controller::ControllerEvent;

/// Timers the controller schedules for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    RevealStep,
    CursorBlink,
}

/// Handle returned by [`Scheduler::schedule`]; cancelling it suppresses delivery.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: CancellationToken,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }
}

pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, timer: Timer) -> CancelToken;
}

/// Production scheduler: one tokio task per timer, racing sleep against cancellation.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    events: mpsc::UnboundedSender<ControllerEvent>,
}

impl TokioScheduler {
    pub fn new(events: mpsc::UnboundedSender<ControllerEvent>) -> Self {
        Self { events }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, timer: Timer) -> CancelToken {
        let token = CancelToken::new();
        let cancelled = token.inner.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = cancelled.cancelled() => {
                    trace!(target: "typist.scheduler", ?timer, "Timer cancelled");
                }
                () = tokio::time::sleep(delay) => {
                    if !cancelled.is_cancelled() {
                        // Receiver gone means the controller shut down.
                        let _ = events.send(ControllerEvent::Timer(timer));
                    }
                }
            }
        });
        token
    }
}

#[derive(Debug)]
struct PendingTimer {
    due: Duration,
    seq: u64,
    timer: Timer,
    token: CancelToken,
}

#[derive(Debug, Default)]
struct ManualState {
    now: Duration,
    next_seq: u64,
    pending: Vec<PendingTimer>,
}

impl ManualState {
    fn prune(&mut self) {
        self.pending.retain(|p| !p.token.is_cancelled());
    }

    fn earliest(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)
    }
}

/// Virtual clock for deterministic tests. Nothing fires until the test
/// advances time.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Live (not cancelled, not fired) timers.
    pub fn pending(&self) -> Vec<Timer> {
        let mut state = self.lock();
        state.prune();
        let mut pending: Vec<_> = state.pending.iter().map(|p| (p.due, p.seq, p.timer)).collect();
        pending.sort_by_key(|(due, seq, _)| (*due, *seq));
        pending.into_iter().map(|(_, _, timer)| timer).collect()
    }

    /// Move the clock forward and fire every timer that became due, in order.
    pub fn advance(&self, by: Duration) -> Vec<Timer> {
        let mut state = self.lock();
        state.prune();
        state.now += by;
        let mut fired = Vec::new();
        while let Some(i) = state.earliest() {
            if state.pending[i].due > state.now {
                break;
            }
            fired.push(state.pending.remove(i).timer);
        }
        fired
    }

    /// Jump the clock to the next live timer and fire it.
    pub fn fire_next(&self) -> Option<Timer> {
        let mut state = self.lock();
        state.prune();
        let i = state.earliest()?;
        let next = state.pending.remove(i);
        state.now = state.now.max(next.due);
        Some(next.timer)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, timer: Timer) -> CancelToken {
        let token = CancelToken::new();
        let mut state = self.lock();
        let seq = state.next_seq;
        state.next_seq += 1;
        let due = state.now + delay;
        state.pending.push(PendingTimer {
            due,
            seq,
            timer,
            token: token.clone(),
        });
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_scheduler_fires_in_due_order() {
        let sched = ManualScheduler::new();
        sched.schedule(Duration::from_millis(30), Timer::CursorBlink);
        sched.schedule(Duration::from_millis(10), Timer::RevealStep);

        assert!(sched.advance(Duration::from_millis(5)).is_empty());
        assert_eq!(
            sched.advance(Duration::from_millis(5)),
            vec![Timer::RevealStep]
        );
        assert_eq!(
            sched.advance(Duration::from_millis(100)),
            vec![Timer::CursorBlink]
        );
        assert_eq!(sched.now(), Duration::from_millis(110));
    }

    #[test]
    fn equal_deadlines_fire_in_insertion_order() {
        let sched = ManualScheduler::new();
        sched.schedule(Duration::from_millis(10), Timer::CursorBlink);
        sched.schedule(Duration::from_millis(10), Timer::RevealStep);
        assert_eq!(
            sched.advance(Duration::from_millis(10)),
            vec![Timer::CursorBlink, Timer::RevealStep]
        );
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let sched = ManualScheduler::new();
        let token = sched.schedule(Duration::from_millis(10), Timer::RevealStep);
        token.cancel();
        assert!(sched.pending().is_empty());
        assert_eq!(sched.fire_next(), None);
    }

    #[test]
    fn fire_next_jumps_the_clock() {
        let sched = ManualScheduler::new();
        sched.schedule(Duration::from_millis(500), Timer::CursorBlink);
        assert_eq!(sched.fire_next(), Some(Timer::CursorBlink));
        assert_eq!(sched.now(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_scheduler_delivers_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sched = TokioScheduler::new(tx);
        sched.schedule(Duration::from_millis(20), Timer::RevealStep);

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, ControllerEvent::Timer(Timer::RevealStep)));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_scheduler_respects_cancellation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sched = TokioScheduler::new(tx);
        let token = sched.schedule(Duration::from_millis(20), Timer::CursorBlink);
        token.cancel();
        drop(sched);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }
}
