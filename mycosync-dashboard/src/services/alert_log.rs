use std::collections::VecDeque;

use time::OffsetDateTime;

pub type AlertId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Critical,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub id: AlertId,
    pub timestamp: OffsetDateTime,
    pub message: String,
    pub severity: Severity,
    /// Set once the entry entered its removal stage
    pub faded: bool,
}

impl Alert {
    pub fn expires(&self) -> bool {
        self.severity != Severity::Critical
    }
}

/// Bounded alert history, newest first.
#[derive(Debug)]
pub struct AlertLog {
    entries: VecDeque<Alert>,
    capacity: usize,
    next_id: AlertId,
}

impl AlertLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
            next_id: 1,
        }
    }

    /// Prepends an entry stamped with the local wall clock. Returns the new
    /// id and whatever fell off the end.
    pub fn push(&mut self, message: impl Into<String>, severity: Severity) -> (AlertId, Vec<Alert>) {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        self.push_at(message, severity, now)
    }

    pub fn push_at(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        timestamp: OffsetDateTime,
    ) -> (AlertId, Vec<Alert>) {
        let id = self.next_id;
        self.next_id += 1;

        self.entries.push_front(Alert {
            id,
            timestamp,
            message: message.into(),
            severity,
            faded: false,
        });

        let mut evicted = Vec::new();
        while self.entries.len() > self.capacity {
            if let Some(alert) = self.entries.pop_back() {
                evicted.push(alert);
            }
        }

        (id, evicted)
    }

    /// Marks an entry as fading. Returns `false` if it is no longer present.
    pub fn fade(&mut self, id: AlertId) -> bool {
        match self.entries.iter_mut().find(|alert| alert.id == id) {
            Some(alert) => {
                alert.faded = true;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: AlertId) -> Option<Alert> {
        let index = self.entries.iter().position(|alert| alert.id == id)?;
        self.entries.remove(index)
    }

    pub fn get(&self, id: AlertId) -> Option<&Alert> {
        self.entries.iter().find(|alert| alert.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
