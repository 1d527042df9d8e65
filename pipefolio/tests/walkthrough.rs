//! End-to-end walkthrough through the app layer.

use async_trait::async_trait;
use chrono::NaiveDate;
use pipefolio::app::{App, AppDeps, Phase};
use pipefolio::config::{SiteConfig, TimingConfig, UnlockPolicy};
use pipefolio::contact::{ContactMessage, FixedClock, MemoryStore, MessageSender};
use pipefolio::core::Stage;
use pipefolio::errors::SendError;
use pipefolio::events::{self, CollectingEventSink};
use pipefolio::pipeline::StageController;
use pipefolio::render::TextRenderer;
use pipefolio::views::ViewEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};

struct AcceptAll;

#[async_trait]
impl MessageSender for AcceptAll {
    async fn send(&self, _message: &ContactMessage) -> Result<(), SendError> {
        Ok(())
    }
}

struct Harness {
    app: App,
    rx: UnboundedReceiver<ViewEvent>,
    sink: Arc<CollectingEventSink>,
}

impl Harness {
    fn new(config: SiteConfig) -> Self {
        let sink = Arc::new(CollectingEventSink::new());
        let deps = AppDeps {
            store: Arc::new(MemoryStore::new()),
            sender: Arc::new(AcceptAll),
            clock: Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap())),
            sink: sink.clone(),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            app: App::new(config, deps, tx),
            rx,
            sink,
        }
    }

    async fn booted(config: SiteConfig) -> Self {
        let harness = Self::new(config);
        harness.app.start();
        sleep_ms(5_000).await;
        harness
    }

    fn stage(&self) -> Option<Stage> {
        self.app.controller().map(StageController::current)
    }

    fn drain(&mut self) -> Vec<ViewEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}

async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn full_walkthrough_visits_every_stage_in_order() {
    let mut h = Harness::booted(SiteConfig::default()).await;
    assert_eq!(h.app.handle_input("./start-pipeline.sh").await, Phase::Pipeline);

    let mut visited = vec![h.stage().unwrap()];
    while h.stage() != Some(Stage::last()) {
        let wait = if h.stage() == Some(Stage::Build) { 6_000 } else { 700 };
        sleep_ms(wait).await;
        h.app.handle_input("n").await;
        visited.push(h.stage().unwrap());
    }

    assert_eq!(visited, Stage::ALL.to_vec());
    assert_eq!(h.sink.count(events::STAGE_ENTERED), 8);
    assert_eq!(h.sink.count(events::BUILD_COMPLETED), 1);
    assert_eq!(h.sink.count(events::BUILD_PROGRESS), 100);

    let mounted: Vec<Stage> = h
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            ViewEvent::StageMounted(stage) => Some(stage),
            _ => None,
        })
        .collect();
    assert_eq!(mounted, Stage::ALL.to_vec());
}

#[tokio::test(start_paused = true)]
async fn next_at_monitor_is_blocked() {
    let mut h = Harness::booted(SiteConfig::default()).await;
    h.app.handle_input("start").await;
    h.app.handle_input("goto monitor").await;
    sleep_ms(700).await;

    h.app.handle_input("n").await;
    assert_eq!(h.stage(), Some(Stage::Monitor));
    let blocked = h.sink.events_of_type(events::NAVIGATION_BLOCKED);
    assert_eq!(blocked.len(), 1);
    assert_eq!(
        blocked[0].1.as_ref().and_then(|d| d["reason"].as_str()),
        Some("end of pipeline")
    );
}

#[tokio::test(start_paused = true)]
async fn leaving_build_early_abandons_progress() {
    let mut h = Harness::booted(SiteConfig::default()).await;
    h.app.handle_input("start").await;
    h.app.handle_input("build").await;
    sleep_ms(1_000).await;

    let progress = h.app.controller().map(StageController::build_progress).unwrap();
    assert!(progress > 0 && progress < 100);

    h.app.handle_input("goto plan").await;
    sleep_ms(10_000).await;
    assert_eq!(h.sink.count(events::BUILD_COMPLETED), 0);
    assert!(h.sink.count(events::BUILD_PROGRESS) < 30);
}

#[tokio::test(start_paused = true)]
async fn content_finished_policy_unlocks_after_reveal() {
    let config = SiteConfig {
        timing: TimingConfig::default().with_unlock_policy(UnlockPolicy::ContentFinished),
        ..SiteConfig::default()
    };
    let mut h = Harness::booted(config).await;
    h.app.handle_input("start").await;

    sleep_ms(100).await;
    assert_eq!(h.app.controller().map(StageController::can_navigate), Some(false));

    sleep_ms(2_000).await;
    assert_eq!(h.app.controller().map(StageController::can_navigate), Some(true));
    assert!(h
        .drain()
        .iter()
        .any(|e| matches!(e, ViewEvent::ContentFinished { stage: Stage::Plan, .. })));
}

#[tokio::test(start_paused = true)]
async fn revisiting_the_active_stage_unlocks_after_its_new_reveal() {
    let config = SiteConfig {
        timing: TimingConfig::default().with_unlock_policy(UnlockPolicy::ContentFinished),
        ..SiteConfig::default()
    };
    let mut h = Harness::booted(config).await;
    h.app.handle_input("start").await;
    sleep_ms(3_000).await;
    assert_eq!(h.app.controller().map(StageController::can_navigate), Some(true));

    h.app.handle_input("goto plan").await;
    assert_eq!(h.app.controller().map(StageController::can_navigate), Some(false));
    sleep_ms(60_000).await;
    assert_eq!(h.app.controller().map(StageController::can_navigate), Some(true));

    h.app.handle_input("n").await;
    assert_eq!(h.stage(), Some(Stage::Code));
    assert_eq!(h.sink.count(events::STAGE_UNLOCKED), 2);
}

#[tokio::test(start_paused = true)]
async fn welcome_clear_wipes_boot_and_history() {
    let mut h = Harness::booted(SiteConfig::default()).await;
    h.app.handle_input("whoami").await;
    assert_eq!(h.app.welcome_terminal().entries().len(), 2);

    h.drain();
    h.app.handle_input("clear").await;
    assert!(h.app.welcome_terminal().entries().is_empty());
    assert_eq!(h.drain(), vec![ViewEvent::TerminalCleared]);
    assert_eq!(h.app.phase(), Phase::Welcome);
}

#[tokio::test(start_paused = true)]
async fn contact_limit_applies_through_the_app() {
    let mut h = Harness::booted(SiteConfig::default()).await;
    h.app.handle_input("start").await;
    h.app.handle_input("monitor").await;

    for _ in 0..6 {
        h.app.handle_input("send Grace|grace@example.com|Hello").await;
    }
    let limiter = h.app.contact_form().limiter();
    assert_eq!(limiter.usage_today().count, 5);
    assert_eq!(limiter.remaining(), 0);

    let notices: Vec<String> = h
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            ViewEvent::Notice(line) => Some(line.text),
            _ => None,
        })
        .collect();
    assert!(notices.iter().any(|n| n.starts_with("Daily transmission limit reached")));
}

#[tokio::test(start_paused = true)]
async fn quit_cancels_pending_reveals() {
    let mut h = Harness::booted(SiteConfig::default()).await;
    h.app.handle_input("start").await;
    assert_eq!(h.app.handle_input("quit").await, Phase::Exited);

    h.drain();
    sleep_ms(5_000).await;
    assert!(h.drain().is_empty());
}

#[tokio::test(start_paused = true)]
async fn output_is_flushed_after_the_app_is_dropped() {
    let mut h = Harness::booted(SiteConfig::default()).await;
    h.app.handle_input("start").await;
    sleep_ms(100).await;
    h.app.handle_input("quit").await;

    let Harness { app, rx, .. } = h;
    drop(app);
    let mut out = Vec::new();
    let rendered =
        tokio::time::timeout(Duration::from_secs(1), TextRenderer::new(false).run(rx, &mut out)).await;
    assert!(matches!(rendered, Ok(Ok(()))));

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Starting pipeline..."));
    assert!(text.contains("== [1/8] Plan"));
}
