//! The walkthrough as a whole: landing terminal, then the pipeline.

use crate::cancellation::EffectScope;
use crate::config::SiteConfig;
use crate::contact::{Clock, ContactForm, ContactMessage, DailyRateLimiter, KeyValueStore, MessageSender};
use crate::content;
use crate::core::{DisplayLine, Stage, Tone};
use crate::events::{self, EventSink};
use crate::pipeline::StageController;
use crate::reveal::{LineRevealSequencer, PacedItem};
use crate::session::WelcomeGate;
use crate::terminal::{CommandOutcome, Terminal};
use crate::views::{StageView, ViewEvent};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info, warn};

/// Which screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The landing terminal.
    Welcome,
    /// The stage-by-stage walkthrough.
    Pipeline,
    /// The visitor quit.
    Exited,
}

/// Text of the first-visit notice.
const WELCOME_NOTICE: &str = "Welcome! This is not a regular portfolio website: it is an interactive DevOps CI/CD pipeline. Type 'start' to launch it.";

/// Collaborators the app needs from the outside world.
pub struct AppDeps {
    /// Local persistence for the rate limit and the welcome flag.
    pub store: Arc<dyn KeyValueStore>,
    /// Outbound contact delivery.
    pub sender: Arc<dyn MessageSender>,
    /// Calendar source for the daily limit.
    pub clock: Arc<dyn Clock>,
    /// Where controller events go.
    pub sink: Arc<dyn EventSink>,
}

impl AppDeps {
    /// Dependencies reporting to the process-wide event sink.
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        sender: Arc<dyn MessageSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            sender,
            clock,
            sink: events::get_event_sink(),
        }
    }
}

struct PipelineScreen {
    controller: Arc<StageController>,
    view: StageView,
    /// Relays view and controller updates to the renderer.
    relay: EffectScope,
    view_events: UnboundedSender<ViewEvent>,
}

/// Drives the walkthrough from visitor input.
///
/// Everything shown is sent to the renderer as [`ViewEvent`]s. Must be
/// created inside a tokio runtime.
pub struct App {
    config: SiteConfig,
    sink: Arc<dyn EventSink>,
    output: UnboundedSender<ViewEvent>,
    phase: Phase,
    boot: LineRevealSequencer<DisplayLine>,
    welcome: Terminal,
    floating: Terminal,
    form: ContactForm,
    gate: WelcomeGate,
    pipeline: Option<PipelineScreen>,
}

impl App {
    /// Creates the app in the welcome phase. Call [`App::start`] to begin.
    #[must_use]
    pub fn new(config: SiteConfig, deps: AppDeps, output: UnboundedSender<ViewEvent>) -> Self {
        let boot_script = content::BOOT_SCRIPT
            .iter()
            .map(|&(text, tone, delay)| PacedItem::after_ms(DisplayLine::new(text, tone), delay))
            .collect::<Vec<_>>();
        let boot = {
            let relay = output.clone();
            let finished = output.clone();
            LineRevealSequencer::new(boot_script)
                .on_item(move |_, line: &DisplayLine| {
                    let _ = relay.send(ViewEvent::Boot(line.clone()));
                })
                .on_finished(move || {
                    let _ = finished.send(ViewEvent::Boot(DisplayLine::new(
                        content::WELCOME_PROMPT_HINT,
                        Tone::Muted,
                    )));
                })
        };

        let limiter = DailyRateLimiter::new(
            deps.store.clone(),
            deps.clock,
            config.contact.storage_key.clone(),
            config.contact.daily_limit,
        );
        let form = ContactForm::new(limiter, deps.sender, config.timing.sent_ack());
        let gate = WelcomeGate::load(deps.store);

        Self {
            config,
            sink: deps.sink,
            output,
            phase: Phase::Welcome,
            boot,
            welcome: Terminal::welcome(),
            floating: Terminal::floating(),
            form,
            gate,
            pipeline: None,
        }
    }

    /// Plays the boot transcript and schedules the first-visit notice.
    pub fn start(&self) {
        info!("Starting walkthrough");
        self.boot.start();
        let notice = self.output.clone();
        self.gate
            .schedule(self.config.timing.welcome_delay(), move || {
                let _ = notice.send(ViewEvent::Notice(DisplayLine::new(WELCOME_NOTICE, Tone::Info)));
            });
    }

    /// The active phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The stage controller, once the pipeline has started.
    #[must_use]
    pub fn controller(&self) -> Option<&StageController> {
        self.pipeline.as_ref().map(|p| p.controller.as_ref())
    }

    /// The welcome terminal.
    #[must_use]
    pub const fn welcome_terminal(&self) -> &Terminal {
        &self.welcome
    }

    /// The floating terminal.
    #[must_use]
    pub const fn floating_terminal(&self) -> &Terminal {
        &self.floating
    }

    /// The contact form.
    #[must_use]
    pub const fn contact_form(&self) -> &ContactForm {
        &self.form
    }

    /// Handles one line of visitor input.
    pub async fn handle_input(&mut self, input: &str) -> Phase {
        if self.gate.is_visible() {
            if let Err(err) = self.gate.dismiss() {
                warn!(error = %err, "Could not persist welcome flag");
            }
        }

        if input.trim().eq_ignore_ascii_case("quit") {
            self.shutdown();
            return self.phase;
        }

        match self.phase {
            Phase::Welcome => self.handle_welcome(input),
            Phase::Pipeline => self.handle_pipeline(input).await,
            Phase::Exited => {}
        }
        self.phase
    }

    fn handle_welcome(&mut self, input: &str) {
        if self.boot.is_revealing() {
            debug!("Input ignored while booting");
            return;
        }
        let before = self.welcome.entries().len();
        let outcome = self.welcome.submit(input);
        match outcome {
            CommandOutcome::Clear => {
                self.boot.clear();
                let _ = self.output.send(ViewEvent::TerminalCleared);
            }
            CommandOutcome::EnterPipeline => {
                self.relay_new_entries(before, true);
                self.enter_pipeline();
            }
            CommandOutcome::Output(_) | CommandOutcome::Nothing => self.relay_new_entries(before, true),
        }
    }

    async fn handle_pipeline(&mut self, input: &str) {
        let trimmed = input.trim();
        if let Some(command) = trimmed.strip_prefix(':') {
            let before = self.floating.entries().len();
            if self.floating.submit(command) == CommandOutcome::Clear {
                let _ = self.output.send(ViewEvent::TerminalCleared);
            } else {
                self.relay_new_entries(before, false);
            }
            return;
        }

        let Some(screen) = self.pipeline.as_ref() else {
            return;
        };
        let controller = screen.controller.clone();
        let lowered = trimmed.to_lowercase();
        let mut words = lowered.splitn(2, char::is_whitespace);
        match (words.next().unwrap_or_default(), words.next().map(str::trim)) {
            ("", _) => {}
            ("n" | "next", None) => {
                if !controller.next() {
                    self.notice("Navigation locked: wait for the stage to finish.", Tone::Warning);
                }
            }
            ("p" | "prev", None) => {
                if !controller.prev() {
                    self.notice("Navigation locked: wait for the stage to finish.", Tone::Warning);
                }
            }
            ("goto", Some(name)) => match name.parse::<Stage>() {
                Ok(stage) => controller.go_to(stage),
                Err(err) => self.notice(err.to_string(), Tone::Error),
            },
            ("send", _) => self.send_contact(trimmed).await,
            (word, None) => match word.parse::<Stage>() {
                Ok(stage) => controller.go_to(stage),
                Err(_) => self.notice(
                    format!("Unknown input: {trimmed}. Use n, p, goto <stage>, :<command> or quit."),
                    Tone::Error,
                ),
            },
            _ => self.notice(
                format!("Unknown input: {trimmed}. Use n, p, goto <stage>, :<command> or quit."),
                Tone::Error,
            ),
        }
        self.sync_view();
    }

    async fn send_contact(&mut self, raw: &str) {
        let current = self.controller().map(StageController::current);
        if current != Some(Stage::Monitor) {
            self.notice("The contact form lives on the monitor stage.", Tone::Warning);
            return;
        }
        let body = raw.get(4..).unwrap_or_default().trim();
        let mut parts = body.splitn(3, '|').map(str::trim);
        let message = ContactMessage::new(
            parts.next().unwrap_or_default(),
            parts.next().unwrap_or_default(),
            parts.next().unwrap_or_default(),
        );
        if message.name.is_empty() || message.email.is_empty() || message.message.is_empty() {
            self.notice("Usage: send <name>|<email>|<message>", Tone::Warning);
            return;
        }

        self.form.fill(message);
        self.notice("Transmitting...", Tone::Muted);
        match self.form.submit().await {
            Ok(usage) => self.notice(
                format!(
                    "Transmission sent. ({}/{} today)",
                    usage.count,
                    self.form.limiter().limit()
                ),
                Tone::Success,
            ),
            Err(err) => self.notice(err.to_string(), Tone::Error),
        }
    }

    fn enter_pipeline(&mut self) {
        info!("Entering pipeline");
        self.boot.cancel();
        self.phase = Phase::Pipeline;
        let _ = self.output.send(ViewEvent::PipelineStarted);

        let controller = Arc::new(StageController::with_event_sink(
            self.config.timing.clone(),
            self.sink.clone(),
        ));
        let relay = EffectScope::new("pipeline-relay");
        let (view_events, mut view_rx) = mpsc::unbounded_channel::<ViewEvent>();

        {
            let controller = controller.clone();
            let output = self.output.clone();
            relay.spawn("view-relay", move |token| async move {
                loop {
                    tokio::select! {
                        biased;
                        () = token.cancelled() => break,
                        event = view_rx.recv() => {
                            let Some(event) = event else { break };
                            if let ViewEvent::ContentFinished { stage, activation } = event {
                                controller.content_finished(stage, activation);
                            }
                            if output.send(event).is_err() {
                                break;
                            }
                        }
                    }
                }
            });
        }
        {
            let mut updates = controller.subscribe();
            let output = self.output.clone();
            let _ = output.send(ViewEvent::Controller(*updates.borrow_and_update()));
            relay.spawn("controller-relay", move |token| async move {
                loop {
                    tokio::select! {
                        biased;
                        () = token.cancelled() => break,
                        changed = updates.changed() => {
                            if changed.is_err() {
                                break;
                            }
                            let snapshot = *updates.borrow_and_update();
                            if output.send(ViewEvent::Controller(snapshot)).is_err() {
                                break;
                            }
                        }
                    }
                }
            });
        }

        let snapshot = controller.snapshot();
        let view = StageView::mount(
            snapshot.stage,
            snapshot.activation,
            &self.config.cv_path,
            view_events.clone(),
        );
        self.pipeline = Some(PipelineScreen {
            controller,
            view,
            relay,
            view_events,
        });
    }

    /// Remounts the stage view whenever the controller entered a stage,
    /// including a jump to the stage already shown.
    fn sync_view(&mut self) {
        let cv_path = self.config.cv_path.clone();
        if let Some(screen) = self.pipeline.as_mut() {
            let snapshot = screen.controller.snapshot();
            if screen.view.activation() != snapshot.activation {
                debug!(
                    from = %screen.view.stage(),
                    to = %snapshot.stage,
                    activation = snapshot.activation,
                    "Remounting stage view"
                );
                screen.view = StageView::mount(
                    snapshot.stage,
                    snapshot.activation,
                    &cv_path,
                    screen.view_events.clone(),
                );
            }
        }
    }

    fn relay_new_entries(&self, from: usize, welcome: bool) {
        let terminal = if welcome { &self.welcome } else { &self.floating };
        for entry in terminal.entries().iter().skip(from) {
            let _ = self.output.send(ViewEvent::Terminal(entry.clone()));
        }
    }

    fn notice(&self, text: impl Into<String>, tone: Tone) {
        let _ = self.output.send(ViewEvent::Notice(DisplayLine::new(text, tone)));
    }

    /// Cancels every pending effect and moves to [`Phase::Exited`].
    pub fn shutdown(&mut self) {
        info!("Shutting down");
        self.boot.cancel();
        if let Some(screen) = self.pipeline.take() {
            screen.relay.cancel_all("shutdown");
        }
        self.phase = Phase::Exited;
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("phase", &self.phase)
            .field("stage", &self.controller().map(StageController::current))
            .finish_non_exhaustive()
    }
}
