use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct UptimeClock {
    started: Instant,
    elapsed: Duration,
}

impl UptimeClock {
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    pub fn started_at(started: Instant) -> Self {
        Self {
            started,
            elapsed: Duration::ZERO,
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        self.elapsed = now.saturating_duration_since(self.started);
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn display(&self) -> String {
        format_elapsed(self.elapsed)
    }
}

impl Default for UptimeClock {
    fn default() -> Self {
        Self::new()
    }
}

/// `HH:MM:SS`; hours keep counting past 99.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
