use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::events::{DashboardEvent, TimerEvent};

/// Source of timer events for the controller.
pub trait Scheduler: Send {
    fn schedule_once(&self, delay: Duration, event: TimerEvent) -> TimerHandle;

    /// First fire happens one `period` from now.
    fn schedule_repeating(&self, period: Duration, event: TimerEvent) -> TimerHandle;
}

/// Cancels its timer on request; dropping the handle leaves the timer running.
#[derive(Debug)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
    task: Option<AbortHandle>,
}

impl TimerHandle {
    pub fn from_task(task: AbortHandle) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            task: Some(task),
        }
    }

    /// A handle whose cancellation is observed through the shared flag.
    pub fn from_flag(cancelled: Arc<AtomicBool>) -> Self {
        Self {
            cancelled,
            task: None,
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Posts timer events into the dashboard event channel from tokio tasks.
#[derive(Clone)]
pub struct TokioScheduler {
    events: UnboundedSender<DashboardEvent>,
}

impl TokioScheduler {
    pub fn new(events: UnboundedSender<DashboardEvent>) -> Self {
        Self { events }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, delay: Duration, event: TimerEvent) -> TimerHandle {
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(DashboardEvent::Timer(event));
        });

        TimerHandle::from_task(task.abort_handle())
    }

    fn schedule_repeating(&self, period: Duration, event: TimerEvent) -> TimerHandle {
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if events.send(DashboardEvent::Timer(event)).is_err() {
                    break;
                }
            }
        });

        TimerHandle::from_task(task.abort_handle())
    }
}
