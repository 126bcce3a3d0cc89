//! Deterministic stand-ins for the scheduler and the request dispatcher.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use mycosync_api::models::{ControlCommand, SettingsUpdate};

use crate::events::TimerEvent;
use crate::services::dispatcher::RequestDispatcher;
use crate::services::scheduler::{Scheduler, TimerHandle};

struct ManualTimer {
    due: Duration,
    period: Option<Duration>,
    event: TimerEvent,
    cancelled: Arc<AtomicBool>,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    timers: Vec<ManualTimer>,
}

/// Virtual clock that fires timers only when advanced explicitly.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<ManualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualClock> {
        self.clock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, delay: Duration, period: Option<Duration>, event: TimerEvent) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut clock = self.lock();
        let due = clock.now + delay;

        clock.timers.push(ManualTimer {
            due,
            period,
            event,
            cancelled: Arc::clone(&cancelled),
        });

        TimerHandle::from_flag(cancelled)
    }

    /// Moves the clock forward and returns every event that came due, in
    /// firing order.
    pub fn advance(&self, by: Duration) -> Vec<TimerEvent> {
        let mut clock = self.lock();
        let target = clock.now + by;
        let mut fired = Vec::new();

        loop {
            clock.timers.retain(|t| !t.cancelled.load(Ordering::SeqCst));

            let next = clock
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due <= target)
                .min_by_key(|(_, t)| t.due)
                .map(|(index, _)| index);

            let Some(index) = next else { break };

            let timer = &mut clock.timers[index];
            fired.push(timer.event);

            match timer.period {
                Some(period) => timer.due += period,
                None => {
                    clock.timers.remove(index);
                }
            }
        }

        clock.now = target;
        fired
    }

    /// Timers still armed, repeating ones included.
    pub fn active(&self) -> Vec<TimerEvent> {
        self.lock()
            .timers
            .iter()
            .filter(|t| !t.cancelled.load(Ordering::SeqCst))
            .map(|t| t.event)
            .collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay: Duration, event: TimerEvent) -> TimerHandle {
        self.push(delay, None, event)
    }

    fn schedule_repeating(&self, period: Duration, event: TimerEvent) -> TimerHandle {
        self.push(period, Some(period), event)
    }
}

#[derive(Default)]
struct Recorded {
    fetches: Vec<u64>,
    controls: Vec<ControlCommand>,
    settings: Vec<SettingsUpdate>,
}

/// Remembers requests instead of sending them.
#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    recorded: Arc<Mutex<Recorded>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn fetches(&self) -> Vec<u64> {
        self.lock().fetches.clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.lock().fetches.len()
    }

    pub fn controls(&self) -> Vec<ControlCommand> {
        self.lock().controls.clone()
    }

    pub fn settings(&self) -> Vec<SettingsUpdate> {
        self.lock().settings.clone()
    }
}

impl RequestDispatcher for RecordingDispatcher {
    fn fetch(&self, seq: u64) {
        self.lock().fetches.push(seq);
    }

    fn control(&self, command: ControlCommand) {
        self.lock().controls.push(command);
    }

    fn settings(&self, update: SettingsUpdate) {
        self.lock().settings.push(update);
    }
}
