use std::collections::HashMap;

use mycosync_api::models::{
    Actuator, CommandResponse, ControlCommand, Mode, SettingsUpdate, Snapshot, SwitchState,
};
use time::OffsetDateTime;

use crate::configs::Dashboard;
use crate::errors::ClientError;
use crate::events::{DashboardEvent, TimerEvent, UiAction};
use crate::services::alert_log::{Alert, AlertId, AlertLog, Severity};
use crate::services::dispatcher::RequestDispatcher;
use crate::services::evaluator::{Evaluation, MetricStatus, evaluate_snapshot};
use crate::services::scheduler::{Scheduler, TimerHandle};
use crate::services::uptime::UptimeClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// No request has completed yet
    Connecting,
    Connected,
    Disconnected,
}

impl Connectivity {
    pub fn label(self) -> &'static str {
        match self {
            Connectivity::Connecting => "Connecting",
            Connectivity::Connected => "Connected",
            Connectivity::Disconnected => "Disconnected",
        }
    }
}

/// Local state of the control widgets. Actuator buttons flip their own state,
/// independent of what the controller last reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlPanel {
    pub mode: Mode,
    pub fan: SwitchState,
    pub heater: SwitchState,
    pub humidifier: SwitchState,
}

impl ControlPanel {
    pub fn manual_controls_visible(&self) -> bool {
        self.mode == Mode::Manual
    }

    pub fn button(&self, actuator: Actuator) -> SwitchState {
        match actuator {
            Actuator::Fan => self.fan,
            Actuator::Heater => self.heater,
            Actuator::Humidifier => self.humidifier,
        }
    }

    /// Flips the button and returns its new state.
    pub fn toggle(&mut self, actuator: Actuator) -> SwitchState {
        let slot = match actuator {
            Actuator::Fan => &mut self.fan,
            Actuator::Heater => &mut self.heater,
            Actuator::Humidifier => &mut self.humidifier,
        };
        *slot = slot.toggled();
        *slot
    }
}

pub struct DashboardController {
    config: Dashboard,
    scheduler: Box<dyn Scheduler>,
    requests: Box<dyn RequestDispatcher>,
    snapshot: Option<Snapshot>,
    evaluations: Option<[Evaluation; 3]>,
    connectivity: Connectivity,
    last_update: Option<OffsetDateTime>,
    alerts: AlertLog,
    alert_timers: HashMap<AlertId, TimerHandle>,
    uptime: UptimeClock,
    panel: ControlPanel,
    next_seq: u64,
    applied_seq: u64,
    refresh_timer: Option<TimerHandle>,
    uptime_timer: Option<TimerHandle>,
}

impl DashboardController {
    pub fn new(
        config: Dashboard,
        scheduler: Box<dyn Scheduler>,
        requests: Box<dyn RequestDispatcher>,
    ) -> Self {
        let alerts = AlertLog::new(config.alert_capacity);

        Self {
            config,
            scheduler,
            requests,
            snapshot: None,
            evaluations: None,
            connectivity: Connectivity::Connecting,
            last_update: None,
            alerts,
            alert_timers: HashMap::new(),
            uptime: UptimeClock::new(),
            panel: ControlPanel::default(),
            next_seq: 0,
            applied_seq: 0,
            refresh_timer: None,
            uptime_timer: None,
        }
    }

    /// Initial fetch, then the refresh and uptime timers.
    pub fn start(&mut self) {
        tracing::info!(
            "Starting dashboard, refresh every {:?}",
            self.config.refresh_interval()
        );

        self.fetch_data();
        self.start_auto_refresh();

        if let Some(timer) = self.uptime_timer.take() {
            timer.cancel();
        }
        self.uptime_timer = Some(
            self.scheduler
                .schedule_repeating(self.config.uptime_interval(), TimerEvent::UptimeTick),
        );
    }

    pub fn start_auto_refresh(&mut self) {
        if let Some(timer) = self.refresh_timer.take() {
            timer.cancel();
        }

        self.refresh_timer = Some(
            self.scheduler
                .schedule_repeating(self.config.refresh_interval(), TimerEvent::RefreshTick),
        );
    }

    pub fn shutdown(&mut self) {
        let timers = self
            .refresh_timer
            .take()
            .into_iter()
            .chain(self.uptime_timer.take())
            .chain(self.alert_timers.drain().map(|(_, timer)| timer));

        for timer in timers {
            timer.cancel();
        }

        tracing::info!("Dashboard stopped");
    }

    pub fn handle(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::Timer(timer) => self.on_timer(timer),
            DashboardEvent::Action(action) => self.dispatch(action),
            DashboardEvent::FetchCompleted { seq, result } => self.on_fetch_completed(seq, result),
            DashboardEvent::ControlCompleted { command, result } => {
                self.on_control_completed(command, result)
            }
            DashboardEvent::SettingsCompleted { update, result } => {
                self.on_settings_completed(update, result)
            }
            DashboardEvent::Shutdown => self.shutdown(),
        }
    }

    /// Starts a snapshot request and returns its sequence number.
    pub fn fetch_data(&mut self) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;

        tracing::debug!(seq, "Fetching snapshot");
        self.requests.fetch(seq);

        seq
    }

    pub fn send_control(&mut self, command: ControlCommand) {
        tracing::info!("Sending control command {command}");
        self.requests.control(command);
    }

    pub fn update_settings(&mut self, update: SettingsUpdate) {
        tracing::info!("Sending settings update {:?}", update);
        self.requests.settings(update);
    }

    pub fn dispatch(&mut self, action: UiAction) {
        match action {
            UiAction::SelectMode(mode) => {
                self.panel.mode = mode;
                self.send_control(ControlCommand::mode(mode));
            }
            UiAction::Toggle(actuator) => {
                let state = self.panel.toggle(actuator);
                self.send_control(ControlCommand::switch(actuator, state));
            }
            UiAction::Refresh => {
                self.fetch_data();
            }
            UiAction::UpdateSettings(update) => self.update_settings(update),
        }
    }

    pub fn on_fetch_completed(&mut self, seq: u64, result: Result<Snapshot, ClientError>) {
        match result {
            Ok(snapshot) => {
                // Responses are applied in arrival order, even stale ones
                if seq < self.applied_seq {
                    tracing::debug!(seq, applied = self.applied_seq, "Applying out-of-order snapshot");
                }
                self.applied_seq = self.applied_seq.max(seq);
                self.connectivity = Connectivity::Connected;
                self.update_dashboard(snapshot);
                self.last_update = Some(now());
            }
            Err(err) => {
                tracing::warn!(seq, "Error fetching data: {err}");
                self.add_alert(format!("Connection error: {err}"), Severity::Critical);
                self.connectivity = Connectivity::Disconnected;
            }
        }
    }

    pub fn on_control_completed(
        &mut self,
        command: ControlCommand,
        result: Result<CommandResponse, ClientError>,
    ) {
        match result {
            Ok(response) => {
                tracing::debug!("Control accepted: {}", response.message);
                self.add_alert(format!("Control command sent: {command}"), Severity::Info);
                self.fetch_data();
            }
            Err(err) => {
                tracing::warn!("Error sending control {command}: {err}");
                self.add_alert(format!("Control failed: {err}"), Severity::Critical);
            }
        }
    }

    pub fn on_settings_completed(
        &mut self,
        update: SettingsUpdate,
        result: Result<CommandResponse, ClientError>,
    ) {
        match result {
            Ok(response) => {
                tracing::debug!("Settings accepted: {}", response.message);
                let body = serde_json::to_string(&update).unwrap_or_default();
                self.add_alert(format!("Settings updated: {body}"), Severity::Info);
                self.fetch_data();
            }
            Err(err) => {
                tracing::warn!("Error updating settings: {err}");
                self.add_alert(format!("Settings update failed: {err}"), Severity::Critical);
            }
        }
    }

    fn update_dashboard(&mut self, snapshot: Snapshot) {
        let evaluations = evaluate_snapshot(&snapshot);

        for evaluation in &evaluations {
            self.update_status(evaluation);
        }

        self.evaluations = Some(evaluations);
        self.snapshot = Some(snapshot);
    }

    /// Raises the critical alert for an out-of-band metric.
    fn update_status(&mut self, evaluation: &Evaluation) -> MetricStatus {
        if let Some(message) = evaluation.alert_message() {
            self.add_alert(message, Severity::Critical);
        }

        evaluation.status
    }

    pub fn add_alert(&mut self, message: impl Into<String>, severity: Severity) -> AlertId {
        let (id, evicted) = self.alerts.push(message, severity);

        for alert in evicted {
            if let Some(timer) = self.alert_timers.remove(&alert.id) {
                timer.cancel();
            }
        }

        if self.alerts.get(id).is_some_and(Alert::expires) {
            let timer = self
                .scheduler
                .schedule_once(self.config.alert_ttl(), TimerEvent::AlertFade(id));
            self.alert_timers.insert(id, timer);
        }

        id
    }

    fn on_timer(&mut self, timer: TimerEvent) {
        match timer {
            TimerEvent::RefreshTick => {
                self.fetch_data();
            }
            TimerEvent::UptimeTick => self.uptime.tick(),
            TimerEvent::AlertFade(id) => {
                self.alert_timers.remove(&id);
                if self.alerts.fade(id) {
                    let timer = self
                        .scheduler
                        .schedule_once(self.config.alert_fade(), TimerEvent::AlertRemove(id));
                    self.alert_timers.insert(id, timer);
                }
            }
            TimerEvent::AlertRemove(id) => {
                self.alert_timers.remove(&id);
                self.alerts.remove(id);
            }
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn evaluations(&self) -> Option<&[Evaluation; 3]> {
        self.evaluations.as_ref()
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn last_update(&self) -> Option<OffsetDateTime> {
        self.last_update
    }

    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }

    pub fn uptime(&self) -> &UptimeClock {
        &self.uptime
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mycosync_api::models::{Range, Thresholds};
    use reqwest::StatusCode;

    use super::*;
    use crate::services::evaluator::Metric;
    use crate::services::testing::{ManualScheduler, RecordingDispatcher};

    struct Harness {
        controller: DashboardController,
        scheduler: ManualScheduler,
        requests: RecordingDispatcher,
    }

    impl Harness {
        fn new() -> Self {
            let scheduler = ManualScheduler::new();
            let requests = RecordingDispatcher::new();
            let controller = DashboardController::new(
                Dashboard::default(),
                Box::new(scheduler.clone()),
                Box::new(requests.clone()),
            );

            Self {
                controller,
                scheduler,
                requests,
            }
        }

        fn advance(&mut self, by: Duration) {
            for timer in self.scheduler.advance(by) {
                self.controller.handle(DashboardEvent::Timer(timer));
            }
        }

        fn messages(&self) -> Vec<String> {
            self.controller.alerts().map(|a| a.message.clone()).collect()
        }
    }

    fn http_error(status: StatusCode) -> ClientError {
        ClientError::Protocol { status }
    }

    fn optimal_snapshot() -> Snapshot {
        Snapshot {
            temperature: Some(24.0),
            moisture: Some(65.0),
            ph: Some(6.8),
            ..Default::default()
        }
    }

    #[test]
    fn test_start_fetches_immediately_then_every_interval() {
        let mut harness = Harness::new();

        harness.controller.start();
        assert_eq!(harness.requests.fetches(), vec![1]);

        harness.advance(Duration::from_millis(4_999));
        assert_eq!(harness.requests.fetch_count(), 1);

        harness.advance(Duration::from_millis(1));
        assert_eq!(harness.requests.fetches(), vec![1, 2]);

        harness.advance(Duration::from_secs(10));
        assert_eq!(harness.requests.fetch_count(), 4);
    }

    #[test]
    fn test_too_hot_raises_critical_alert() {
        let mut harness = Harness::new();
        let seq = harness.controller.fetch_data();

        harness.controller.on_fetch_completed(
            seq,
            Ok(Snapshot {
                temperature: Some(30.0),
                thresholds: Some(Thresholds {
                    temp_min: Some(22.0),
                    temp_max: Some(26.0),
                    ..Default::default()
                }),
                moisture: Some(65.0),
                ph: Some(6.8),
                ..Default::default()
            }),
        );

        let evaluations = harness.controller.evaluations().unwrap();
        assert_eq!(evaluations[0].metric, Metric::Temperature);
        assert_eq!(evaluations[0].status, MetricStatus::TooHigh);

        let alerts: Vec<_> = harness.controller.alerts().collect();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert!(alerts[0].message.contains("too high"));
        assert!(alerts[0].message.contains("30"));
        assert_eq!(harness.controller.connectivity(), Connectivity::Connected);
        assert!(harness.controller.last_update().is_some());
    }

    #[test]
    fn test_failed_fetch_disconnects() {
        let mut harness = Harness::new();
        let seq = harness.controller.fetch_data();

        harness
            .controller
            .on_fetch_completed(seq, Err(http_error(StatusCode::INTERNAL_SERVER_ERROR)));

        assert_eq!(harness.controller.connectivity(), Connectivity::Disconnected);
        let alert = harness.controller.alerts().next().unwrap();
        assert_eq!(alert.severity, Severity::Critical);
        assert_eq!(alert.message, "Connection error: HTTP 500");
        assert!(harness.controller.snapshot().is_none());
        assert!(harness.controller.last_update().is_none());
    }

    #[test]
    fn test_reconnects_after_successful_fetch() {
        let mut harness = Harness::new();

        harness
            .controller
            .on_fetch_completed(1, Err(http_error(StatusCode::BAD_GATEWAY)));
        harness.controller.on_fetch_completed(2, Ok(optimal_snapshot()));

        assert_eq!(harness.controller.connectivity(), Connectivity::Connected);
    }

    #[test]
    fn test_successful_command_refetches_once() {
        let mut harness = Harness::new();
        let command = ControlCommand::switch(Actuator::Fan, SwitchState::On);

        harness.controller.send_control(command.clone());
        assert_eq!(harness.requests.controls(), vec![command.clone()]);
        assert_eq!(harness.requests.fetch_count(), 0);

        harness.controller.handle(DashboardEvent::ControlCompleted {
            command,
            result: Ok(CommandResponse {
                success: true,
                message: "Control updated".to_string(),
            }),
        });

        assert_eq!(harness.requests.fetch_count(), 1);
        let alerts: Vec<_> = harness.controller.alerts().collect();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Info);
        assert_eq!(alerts[0].message, r#"Control command sent: {"fan":"ON"}"#);
    }

    #[test]
    fn test_failed_command_is_reported_without_retry() {
        let mut harness = Harness::new();
        let command = ControlCommand::mode(Mode::Manual);

        harness.controller.handle(DashboardEvent::ControlCompleted {
            command,
            result: Err(http_error(StatusCode::SERVICE_UNAVAILABLE)),
        });

        assert_eq!(harness.requests.fetch_count(), 0);
        assert!(harness.requests.controls().is_empty());
        assert_eq!(harness.messages(), vec!["Control failed: HTTP 503"]);
    }

    #[test]
    fn test_missing_thresholds_use_defaults() {
        let mut harness = Harness::new();

        harness.controller.on_fetch_completed(
            1,
            Ok(Snapshot {
                temperature: Some(23.0),
                moisture: Some(72.0),
                ph: Some(6.6),
                ..Default::default()
            }),
        );

        let evaluations = harness.controller.evaluations().unwrap();
        assert_eq!(evaluations[1].range, Range::new(60.0, 70.0));
        assert_eq!(evaluations[1].status, MetricStatus::TooHigh);
        assert_eq!(harness.messages(), vec!["Moisture too high: 72"]);
    }

    #[test]
    fn test_info_alert_fades_then_disappears() {
        let mut harness = Harness::new();
        let info = harness.controller.add_alert("Control command sent: {}", Severity::Info);
        let critical = harness.controller.add_alert("Ph too low: 5.9", Severity::Critical);

        harness.advance(Duration::from_secs(30));
        let faded: Vec<_> = harness.controller.alerts().map(|a| (a.id, a.faded)).collect();
        assert_eq!(faded, vec![(critical, false), (info, true)]);

        harness.advance(Duration::from_secs(1));
        let ids: Vec<_> = harness.controller.alerts().map(|a| a.id).collect();
        assert_eq!(ids, vec![critical]);

        harness.advance(Duration::from_secs(3600));
        assert_eq!(harness.controller.alert_count(), 1);
    }

    #[test]
    fn test_alert_log_stays_bounded() {
        let mut harness = Harness::new();
        harness.controller.add_alert("Control command sent: {}", Severity::Info);

        let hot = Snapshot {
            temperature: Some(35.0),
            moisture: Some(20.0),
            ph: Some(9.0),
            ..Default::default()
        };
        for seq in 1..=20 {
            harness.controller.on_fetch_completed(seq, Ok(hot.clone()));
            assert!(harness.controller.alert_count() <= 10);
        }

        assert_eq!(harness.controller.alert_count(), 10);
        // the evicted info alert took its expiry timer with it
        assert!(harness.scheduler.active().is_empty());
    }

    #[test]
    fn test_toggle_flips_local_button_state() {
        let mut harness = Harness::new();

        harness.controller.dispatch(UiAction::Toggle(Actuator::Fan));
        harness.controller.dispatch(UiAction::Toggle(Actuator::Fan));
        harness.controller.dispatch(UiAction::Toggle(Actuator::Heater));

        assert_eq!(
            harness.requests.controls(),
            vec![
                ControlCommand::switch(Actuator::Fan, SwitchState::On),
                ControlCommand::switch(Actuator::Fan, SwitchState::Off),
                ControlCommand::switch(Actuator::Heater, SwitchState::On),
            ]
        );
        assert_eq!(harness.controller.panel().button(Actuator::Fan), SwitchState::Off);
        assert_eq!(harness.controller.panel().button(Actuator::Heater), SwitchState::On);
    }

    #[test]
    fn test_mode_selection_shows_manual_controls() {
        let mut harness = Harness::new();

        harness.controller.dispatch(UiAction::SelectMode(Mode::Manual));
        assert!(harness.controller.panel().manual_controls_visible());

        harness.controller.dispatch(UiAction::SelectMode(Mode::Auto));
        assert!(!harness.controller.panel().manual_controls_visible());

        assert_eq!(
            harness.requests.controls(),
            vec![ControlCommand::mode(Mode::Manual), ControlCommand::mode(Mode::Auto)]
        );
    }

    #[test]
    fn test_refresh_action_fetches() {
        let mut harness = Harness::new();

        harness.controller.dispatch(UiAction::Refresh);
        harness.controller.dispatch(UiAction::Refresh);

        assert_eq!(harness.requests.fetches(), vec![1, 2]);
    }

    #[test]
    fn test_settings_update_round_trip() {
        let mut harness = Harness::new();
        let update: SettingsUpdate = SettingsUpdate {
            thresholds: Thresholds {
                ph_max: Some(7.2),
                ..Default::default()
            },
        };

        harness.controller.dispatch(UiAction::UpdateSettings(update.clone()));
        assert_eq!(harness.requests.settings(), vec![update.clone()]);

        harness.controller.handle(DashboardEvent::SettingsCompleted {
            update,
            result: Ok(CommandResponse::default()),
        });

        assert_eq!(harness.requests.fetch_count(), 1);
        assert_eq!(harness.messages(), vec![r#"Settings updated: {"ph_max":7.2}"#]);
    }

    #[test]
    fn test_stale_response_still_applied() {
        let mut harness = Harness::new();
        let first = harness.controller.fetch_data();
        let second = harness.controller.fetch_data();

        harness.controller.on_fetch_completed(
            second,
            Ok(Snapshot {
                temperature: Some(25.0),
                ..optimal_snapshot()
            }),
        );
        harness.controller.on_fetch_completed(
            first,
            Ok(Snapshot {
                temperature: Some(23.0),
                ..optimal_snapshot()
            }),
        );

        assert_eq!(harness.controller.snapshot().unwrap().temperature, Some(23.0));
    }

    #[test]
    fn test_shutdown_cancels_timers() {
        let mut harness = Harness::new();
        harness.controller.start();
        harness.controller.add_alert("Control command sent: {}", Severity::Info);
        assert_eq!(harness.scheduler.active().len(), 3);

        harness.controller.handle(DashboardEvent::Shutdown);

        assert!(harness.scheduler.active().is_empty());
        assert!(harness.scheduler.advance(Duration::from_secs(60)).is_empty());
    }
}
