/// Scheduler implementations for playback.
/// `VirtualScheduler` runs on a manual clock for deterministic replay and tests;
/// `TokioScheduler` backs interactive sessions with real timers.

use crate::ports::{Scheduler, TimerId};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Intervals below this are raised to it so a timer can never fire in a busy loop.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

// ============================================================================
// VirtualScheduler - manual clock
// ============================================================================

#[derive(Debug, Default)]
struct VirtualClock {
    now: Duration,
    next_id: u64,
    // id -> (interval, next deadline)
    timers: BTreeMap<TimerId, (Duration, Duration)>,
}

/// Scheduler whose time only moves when [`VirtualScheduler::advance`] is called.
/// Clones share the same clock, so a test can keep one handle while the
/// controller owns another.
#[derive(Debug, Clone, Default)]
pub struct VirtualScheduler {
    clock: Rc<RefCell<VirtualClock>>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    pub fn active_timers(&self) -> usize {
        self.clock.borrow().timers.len()
    }

    /// Move the clock forward by `by`, handing every fired timer to `on_tick`
    /// in deadline order. Timers started or cancelled by `on_tick` take effect
    /// immediately.
    pub fn advance(&self, by: Duration, mut on_tick: impl FnMut(TimerId)) {
        let target = self.now() + by;
        while let Some(id) = self.fire_next(target) {
            on_tick(id);
        }
        self.clock.borrow_mut().now = target;
    }

    fn fire_next(&self, target: Duration) -> Option<TimerId> {
        let mut clock = self.clock.borrow_mut();
        let (id, deadline) = clock
            .timers
            .iter()
            .filter(|(_, (_, deadline))| *deadline <= target)
            .min_by_key(|(id, (_, deadline))| (*deadline, **id))
            .map(|(id, (_, deadline))| (*id, *deadline))?;
        clock.now = deadline;
        if let Some((interval, next)) = clock.timers.get_mut(&id) {
            *next = deadline + *interval;
        }
        Some(id)
    }
}

impl Scheduler for VirtualScheduler {
    fn start_repeating(&mut self, interval: Duration) -> TimerId {
        let mut clock = self.clock.borrow_mut();
        let interval = interval.max(MIN_INTERVAL);
        let id = TimerId(clock.next_id);
        clock.next_id += 1;
        let deadline = clock.now + interval;
        clock.timers.insert(id, (interval, deadline));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.clock.borrow_mut().timers.remove(&id);
    }
}

// ============================================================================
// TokioScheduler - real timers
// ============================================================================

/// Each timer is a tokio task sending its id down a channel on every tick.
/// Must be used from inside a tokio runtime.
pub struct TokioScheduler {
    next_id: u64,
    tx: UnboundedSender<TimerId>,
    tasks: HashMap<TimerId, JoinHandle<()>>,
}

impl TokioScheduler {
    /// Create the scheduler and the receiver its ticks arrive on.
    pub fn new() -> (Self, UnboundedReceiver<TimerId>) {
        let (tx, rx) = unbounded_channel();
        let scheduler = Self {
            next_id: 0,
            tx,
            tasks: HashMap::new(),
        };
        (scheduler, rx)
    }

    pub fn active_timers(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for TokioScheduler {
    fn start_repeating(&mut self, interval: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let interval = interval.max(MIN_INTERVAL);
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            loop {
                ticker.tick().await;
                if tx.send(id).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(id, handle);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.tasks.remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_timer_fires_on_interval() {
        let mut sched = VirtualScheduler::new();
        let id = sched.start_repeating(Duration::from_millis(100));
        let mut fired = Vec::new();
        sched.advance(Duration::from_millis(350), |t| fired.push(t));
        assert_eq!(fired, vec![id, id, id]);
        assert_eq!(sched.now(), Duration::from_millis(350));
    }

    #[test]
    fn test_virtual_cancel_stops_ticks() {
        let mut sched = VirtualScheduler::new();
        let id = sched.start_repeating(Duration::from_millis(100));
        sched.cancel(id);
        let mut fired = 0;
        sched.advance(Duration::from_secs(1), |_| fired += 1);
        assert_eq!(fired, 0);
        assert_eq!(sched.active_timers(), 0);
    }

    #[test]
    fn test_virtual_timers_interleave_by_deadline() {
        let mut sched = VirtualScheduler::new();
        let slow = sched.start_repeating(Duration::from_millis(300));
        let fast = sched.start_repeating(Duration::from_millis(200));
        let mut fired = Vec::new();
        sched.advance(Duration::from_millis(600), |t| fired.push(t));
        assert_eq!(fired, vec![fast, slow, fast, slow, fast]);
    }

    #[test]
    fn test_virtual_zero_interval_is_clamped() {
        let mut sched = VirtualScheduler::new();
        sched.start_repeating(Duration::ZERO);
        let mut fired = 0;
        sched.advance(Duration::from_millis(5), |_| fired += 1);
        assert_eq!(fired, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_delivers_and_cancels() {
        let (mut sched, mut rx) = TokioScheduler::new();
        let id = sched.start_repeating(Duration::from_millis(50));
        assert_eq!(rx.recv().await, Some(id));
        assert_eq!(rx.recv().await, Some(id));
        sched.cancel(id);
        assert_eq!(sched.active_timers(), 0);
        let next = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await;
        assert!(next.is_err());
    }
}
