use std::io::{self, Write};

use mycosync_api::models::{Actuator, Mode, SwitchState};
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::controller::{ControlPanel, DashboardController};
use crate::services::alert_log::Severity;
use crate::services::evaluator::{Evaluation, Metric, MetricStatus};

const CLOCK_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]:[second]");
const ALERT_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

#[derive(Debug, Clone, PartialEq)]
pub struct MetricView {
    pub metric: Metric,
    pub value: String,
    pub range: String,
    pub status: MetricStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertView {
    pub text: String,
    pub severity: Severity,
    pub faded: bool,
}

/// Everything a render surface needs, already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub metrics: Vec<MetricView>,
    pub actuators: Vec<(Actuator, SwitchState)>,
    pub mode: Mode,
    pub wifi_rssi: String,
    pub wifi_ip: String,
    pub connectivity: String,
    pub last_update: String,
    pub uptime: String,
    pub panel: ControlPanel,
    pub alerts: Vec<AlertView>,
}

impl DashboardView {
    pub fn of(controller: &DashboardController) -> Self {
        let metrics = controller
            .evaluations()
            .map(|evaluations| evaluations.iter().map(metric_view).collect())
            .unwrap_or_default();

        let snapshot = controller.snapshot();
        let status = snapshot.map(|s| s.status()).unwrap_or_default();
        let wifi = snapshot.and_then(|s| s.wifi.as_ref());

        let last_update = controller
            .last_update()
            .and_then(|time| time.format(CLOCK_FORMAT).ok())
            .unwrap_or_else(|| "--:--:--".to_string());

        Self {
            metrics,
            actuators: vec![
                (Actuator::Fan, status.fan),
                (Actuator::Heater, status.heater),
                (Actuator::Humidifier, status.humidifier),
            ],
            mode: status.mode,
            wifi_rssi: wifi
                .and_then(|w| w.rssi)
                .map_or_else(|| "-".to_string(), |rssi| rssi.to_string()),
            wifi_ip: wifi
                .and_then(|w| w.ip.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            connectivity: controller.connectivity().label().to_string(),
            last_update: format!("Last Update: {last_update}"),
            uptime: controller.uptime().display(),
            panel: controller.panel().clone(),
            alerts: controller
                .alerts()
                .map(|alert| AlertView {
                    text: format!("[{}] {}", format_alert_time(alert.timestamp), alert.message),
                    severity: alert.severity,
                    faded: alert.faded,
                })
                .collect(),
        }
    }
}

fn metric_view(evaluation: &Evaluation) -> MetricView {
    let Evaluation {
        metric,
        value,
        range,
        status,
    } = *evaluation;

    let (value, range) = match metric {
        Metric::Temperature => (
            format!("{value:.1}°C"),
            format!("{}-{}°C", range.min, range.max),
        ),
        Metric::Moisture => (format!("{value}%"), format!("{}-{}%", range.min, range.max)),
        Metric::Ph => (format!("{value:.2}"), format!("{}-{}", range.min, range.max)),
    };

    MetricView {
        metric,
        value,
        range,
        status,
    }
}

fn format_alert_time(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(ALERT_FORMAT)
        .unwrap_or_else(|_| "--:--".to_string())
}

/// Render surface for the dashboard.
pub trait Renderer {
    fn render(&mut self, view: &DashboardView) -> io::Result<()>;
}

/// Redraws the whole dashboard as plain text on every render.
pub struct TerminalRenderer<W: Write> {
    out: W,
    clear_screen: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            clear_screen: false,
        }
    }

    /// Emit an ANSI clear before each frame.
    pub fn clearing(mut self) -> Self {
        self.clear_screen = true;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &DashboardView) -> io::Result<()> {
        let out = &mut self.out;

        if self.clear_screen {
            write!(out, "\x1b[2J\x1b[H")?;
        }

        writeln!(
            out,
            "Mushroom Substrate Monitor  [{}]  Uptime {}  {}",
            view.connectivity, view.uptime, view.last_update
        )?;
        writeln!(out, "WiFi RSSI {}  IP {}", view.wifi_rssi, view.wifi_ip)?;
        writeln!(out)?;

        for metric in &view.metrics {
            let flag = if metric.status.is_critical() { '!' } else { ' ' };
            writeln!(
                out,
                "{flag} {:<10} {:>9}  {:<9} ({})",
                metric.metric.label(),
                metric.value,
                metric.status,
                metric.range
            )?;
        }

        writeln!(out)?;
        let actuators = view
            .actuators
            .iter()
            .map(|(actuator, state)| format!("{}={}", actuator.name(), state))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(out, "System  mode={}  {}", view.mode, actuators)?;

        let buttons = if view.panel.manual_controls_visible() {
            Actuator::ALL
                .iter()
                .map(|actuator| format!("[{} {}]", actuator.name(), view.panel.button(*actuator)))
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            String::new()
        };
        writeln!(out, "Control mode={} {}", view.panel.mode, buttons)?;

        writeln!(out)?;
        writeln!(out, "Alerts")?;
        for alert in &view.alerts {
            let marker = match (alert.severity, alert.faded) {
                (_, true) => '.',
                (Severity::Critical, false) => '!',
                (Severity::Info, false) => '-',
            };
            writeln!(out, "  {marker} {}", alert.text)?;
        }

        out.flush()
    }
}
