use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::configs::Dashboard;
use crate::controller::DashboardController;
use crate::events::{DashboardEvent, ParseActionError, UiAction};
use crate::render::{DashboardView, Renderer};
use crate::services::client_service::ControllerApi;
use crate::services::dispatcher::TokioDispatcher;
use crate::services::scheduler::TokioScheduler;

/// Event loop owning the controller. Everything that mutates dashboard state
/// arrives through one channel and is handled on this task only.
pub struct DashboardApp<R: Renderer> {
    controller: DashboardController,
    events: UnboundedReceiver<DashboardEvent>,
    sender: UnboundedSender<DashboardEvent>,
    renderer: R,
}

impl<R: Renderer> DashboardApp<R> {
    pub fn new(config: Dashboard, api: Arc<dyn ControllerApi>, renderer: R) -> Self {
        let (sender, events) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler::new(sender.clone());
        let requests = TokioDispatcher::new(api, sender.clone());

        Self {
            controller: DashboardController::new(config, Box::new(scheduler), Box::new(requests)),
            events,
            sender,
            renderer,
        }
    }

    pub fn sender(&self) -> UnboundedSender<DashboardEvent> {
        self.sender.clone()
    }

    /// Runs until a `Shutdown` event and hands back the final state.
    pub async fn run(mut self) -> (DashboardController, R) {
        self.controller.start();
        self.render();

        while let Some(event) = self.events.recv().await {
            let shutdown = matches!(event, DashboardEvent::Shutdown);
            self.controller.handle(event);

            if shutdown {
                break;
            }

            self.render();
        }

        (self.controller, self.renderer)
    }

    fn render(&mut self) {
        let view = DashboardView::of(&self.controller);
        if let Err(e) = self.renderer.render(&view) {
            tracing::warn!("Failed to render dashboard: {e}");
        }
    }
}

/// Turns input lines into UI actions; `quit` stops the dashboard.
///
/// Reads on a plain OS thread rather than tokio's stdin, whose blocking read
/// would keep the runtime from shutting down until the next line arrives.
/// The thread is detached and dies with the process.
pub fn spawn_input_reader<I>(input: I, events: UnboundedSender<DashboardEvent>) -> io::Result<()>
where
    I: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("dashboard-input".to_string())
        .spawn(move || {
            for line in input.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::warn!("Failed to read input: {e}");
                        break;
                    }
                };

                let event = match input_event(&line) {
                    Some(Ok(event)) => event,
                    Some(Err(e)) => {
                        tracing::warn!("{e}");
                        continue;
                    }
                    None => continue,
                };

                let shutdown = matches!(event, DashboardEvent::Shutdown);
                if events.send(event).is_err() || shutdown {
                    break;
                }
            }
            // input closed, the dashboard keeps polling
        })?;

    Ok(())
}

fn input_event(line: &str) -> Option<Result<DashboardEvent, ParseActionError>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if matches!(line, "quit" | "exit" | "q") {
        return Some(Ok(DashboardEvent::Shutdown));
    }

    Some(line.parse::<UiAction>().map(DashboardEvent::Action))
}

pub fn spawn_shutdown_signal(events: UnboundedSender<DashboardEvent>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = events.send(DashboardEvent::Shutdown);
        }
    });
}

pub fn stdout_renderer() -> crate::render::TerminalRenderer<io::Stdout> {
    crate::render::TerminalRenderer::new(io::stdout()).clearing()
}
