use std::fmt;

use mycosync_api::models::{Range, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricStatus {
    Optimal,
    TooLow,
    TooHigh,
    /// The reading could not be compared, e.g. NaN from a faulty probe
    Unknown,
}

impl MetricStatus {
    pub fn label(self) -> &'static str {
        match self {
            MetricStatus::Optimal => "OPTIMAL",
            MetricStatus::TooLow => "TOO LOW",
            MetricStatus::TooHigh => "TOO HIGH",
            MetricStatus::Unknown => "UNKNOWN",
        }
    }

    pub fn is_critical(self) -> bool {
        matches!(self, MetricStatus::TooLow | MetricStatus::TooHigh)
    }
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    Moisture,
    Ph,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Moisture, Metric::Ph];

    /// Name used in alert messages.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "Temp",
            Metric::Moisture => "Moisture",
            Metric::Ph => "Ph",
        }
    }

    pub fn reading(self, snapshot: &Snapshot) -> f64 {
        match self {
            Metric::Temperature => snapshot.temperature(),
            Metric::Moisture => snapshot.moisture(),
            Metric::Ph => snapshot.ph(),
        }
    }

    pub fn range(self, snapshot: &Snapshot) -> Range {
        match self {
            Metric::Temperature => snapshot.temperature_range(),
            Metric::Moisture => snapshot.moisture_range(),
            Metric::Ph => snapshot.ph_range(),
        }
    }
}

/// Classifies a reading against its optimal band, bounds inclusive.
pub fn classify(value: f64, min: f64, max: f64) -> MetricStatus {
    if value < min {
        MetricStatus::TooLow
    } else if value > max {
        MetricStatus::TooHigh
    } else if value >= min && value <= max {
        MetricStatus::Optimal
    } else {
        MetricStatus::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub metric: Metric,
    pub value: f64,
    pub range: Range,
    pub status: MetricStatus,
}

impl Evaluation {
    pub fn new(metric: Metric, value: f64, range: Range) -> Self {
        Self {
            metric,
            value,
            range,
            status: classify(value, range.min, range.max),
        }
    }

    pub fn of(metric: Metric, snapshot: &Snapshot) -> Self {
        Self::new(metric, metric.reading(snapshot), metric.range(snapshot))
    }

    /// Message for the critical alert an out-of-band reading raises.
    pub fn alert_message(&self) -> Option<String> {
        let direction = match self.status {
            MetricStatus::TooLow => "too low",
            MetricStatus::TooHigh => "too high",
            MetricStatus::Optimal | MetricStatus::Unknown => return None,
        };

        Some(format!("{} {direction}: {}", self.metric.label(), self.value))
    }
}

pub fn evaluate_snapshot(snapshot: &Snapshot) -> [Evaluation; 3] {
    Metric::ALL.map(|metric| Evaluation::of(metric, snapshot))
}
