//! The stage controller: active stage, navigation lock, build progress.

use super::ProgressSimulator;
use crate::cancellation::EffectScope;
use crate::config::{TimingConfig, UnlockPolicy};
use crate::core::Stage;
use crate::events::{self, EventSink};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// What the renderer needs to draw the pipeline chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControllerSnapshot {
    /// The active stage.
    pub stage: Stage,
    /// Whether next/prev are currently allowed.
    pub can_navigate: bool,
    /// Build percentage, 0..=100.
    pub build_progress: u8,
    /// Bumped on every stage entry, including re-entry of the active stage.
    /// Timer callbacks and content reports compare it before writing.
    pub activation: u64,
}

struct State {
    snapshot: ControllerSnapshot,
}

struct Shared {
    state: Mutex<State>,
    sink: Arc<dyn EventSink>,
    updates: watch::Sender<ControllerSnapshot>,
}

impl Shared {
    /// Applies `change` if `activation` is still current.
    fn update_if_current<F>(&self, activation: u64, change: F) -> bool
    where
        F: FnOnce(&mut ControllerSnapshot),
    {
        let mut state = self.state.lock();
        if state.snapshot.activation != activation {
            return false;
        }
        change(&mut state.snapshot);
        self.updates.send_replace(state.snapshot);
        true
    }

    fn unlock(&self, activation: u64) {
        let mut stage = None;
        let applied = self.update_if_current(activation, |snapshot| {
            snapshot.can_navigate = true;
            stage = Some(snapshot.stage);
        });
        if let (true, Some(stage)) = (applied, stage) {
            debug!(%stage, "Navigation unlocked");
            self.sink.try_emit(events::STAGE_UNLOCKED, events::stage_data(stage));
        }
    }
}

/// Owns the active stage and arbitrates navigation.
///
/// Every stage change locks navigation and cancels the timers of the previous
/// stage before anything new is scheduled. Entering the build stage restarts
/// the progress simulator from 0; any other stage unlocks according to the
/// configured [`UnlockPolicy`].
///
/// Construction activates the first stage, so it must happen inside a tokio
/// runtime. Dropping the controller cancels every pending timer.
pub struct StageController {
    shared: Arc<Shared>,
    timing: TimingConfig,
    scope: EffectScope,
    simulator: ProgressSimulator,
}

impl StageController {
    /// Creates a controller reporting to the process-wide event sink.
    #[must_use]
    pub fn new(timing: TimingConfig) -> Self {
        Self::with_event_sink(timing, events::get_event_sink())
    }

    /// Creates a controller reporting to `sink`.
    #[must_use]
    pub fn with_event_sink(timing: TimingConfig, sink: Arc<dyn EventSink>) -> Self {
        let initial = ControllerSnapshot {
            stage: Stage::first(),
            can_navigate: false,
            build_progress: 0,
            activation: 0,
        };
        let (updates, _) = watch::channel(initial);
        let simulator = ProgressSimulator::new(timing.build_tick(), timing.build_target);

        let controller = Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State { snapshot: initial }),
                sink,
                updates,
            }),
            timing,
            scope: EffectScope::new("stage-controller"),
            simulator,
        };
        controller.enter(Stage::first());
        controller
    }

    /// The active stage.
    #[must_use]
    pub fn current(&self) -> Stage {
        self.shared.state.lock().snapshot.stage
    }

    /// Whether next/prev are currently allowed.
    #[must_use]
    pub fn can_navigate(&self) -> bool {
        self.shared.state.lock().snapshot.can_navigate
    }

    /// Build percentage, 0..=100.
    #[must_use]
    pub fn build_progress(&self) -> u8 {
        self.shared.state.lock().snapshot.build_progress
    }

    /// The full current state.
    #[must_use]
    pub fn snapshot(&self) -> ControllerSnapshot {
        self.shared.state.lock().snapshot
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Jumps to `stage` unconditionally, ignoring the navigation lock.
    ///
    /// Jumping to the active stage restarts its activation.
    pub fn go_to(&self, stage: Stage) {
        self.enter(stage);
    }

    /// Advances one stage. Returns false (and changes nothing) at the last
    /// stage or while navigation is locked.
    pub fn next(&self) -> bool {
        self.step(Stage::next, "next")
    }

    /// Retreats one stage. Returns false (and changes nothing) at the first
    /// stage or while navigation is locked.
    pub fn prev(&self) -> bool {
        self.step(Stage::prev, "prev")
    }

    /// Reports that the content mounted for `stage` during `activation`
    /// finished animating.
    ///
    /// Unlocks navigation under [`UnlockPolicy::ContentFinished`] when that
    /// activation is still the current one. Reports from an earlier activation
    /// are ignored, even for the same stage. Also ignored for the build stage,
    /// which unlocks on build completion, and under [`UnlockPolicy::FixedDelay`].
    pub fn content_finished(&self, stage: Stage, activation: u64) {
        if self.timing.unlock_policy != UnlockPolicy::ContentFinished || stage.is_build() {
            return;
        }
        {
            let state = self.shared.state.lock();
            let current = &state.snapshot;
            if current.activation != activation {
                debug!(%stage, activation, current = current.activation, "Stale content report");
                return;
            }
            if current.stage != stage || current.can_navigate {
                return;
            }
        }
        self.shared.unlock(activation);
    }

    fn step(&self, direction: fn(Stage) -> Option<Stage>, label: &str) -> bool {
        let (from, locked) = {
            let state = self.shared.state.lock();
            (state.snapshot.stage, !state.snapshot.can_navigate)
        };
        let target = direction(from);

        let reason = match target {
            None => "end of pipeline",
            Some(_) if locked => "animation in progress",
            Some(stage) => {
                self.enter(stage);
                return true;
            }
        };

        debug!(%from, direction = label, reason, "Navigation blocked");
        self.shared
            .sink
            .try_emit(events::NAVIGATION_BLOCKED, events::blocked_data(from, target, reason));
        false
    }

    fn enter(&self, stage: Stage) {
        self.scope.reset("stage changed");
        self.simulator.cancel();

        let activation = {
            let mut state = self.shared.state.lock();
            state.snapshot.activation += 1;
            state.snapshot.stage = stage;
            state.snapshot.can_navigate = false;
            if stage.is_build() {
                state.snapshot.build_progress = 0;
            }
            self.shared.updates.send_replace(state.snapshot);
            state.snapshot.activation
        };

        info!(%stage, "Entered stage");
        self.shared
            .sink
            .try_emit(events::STAGE_ENTERED, events::stage_data(stage));

        if stage.is_build() {
            self.start_build(activation);
        } else if self.timing.unlock_policy == UnlockPolicy::FixedDelay {
            self.schedule_unlock(activation);
        }
    }

    fn start_build(&self, activation: u64) {
        let on_tick = {
            let shared = self.shared.clone();
            move |progress: u8| {
                if shared.update_if_current(activation, |s| s.build_progress = progress) {
                    shared
                        .sink
                        .try_emit(events::BUILD_PROGRESS, events::progress_data(progress));
                }
            }
        };
        let on_done = {
            let shared = self.shared.clone();
            move || {
                if shared.state.lock().snapshot.activation != activation {
                    return;
                }
                info!("Build completed");
                shared.sink.try_emit(events::BUILD_COMPLETED, None);
                shared.unlock(activation);
            }
        };
        self.simulator.start(on_tick, on_done);
    }

    fn schedule_unlock(&self, activation: u64) {
        let shared = self.shared.clone();
        let delay = self.timing.settle_delay();
        self.scope.spawn("settle-unlock", move |token| async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    if !token.is_cancelled() {
                        shared.unlock(activation);
                    }
                }
            }
        });
    }
}

impl std::fmt::Debug for StageController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageController")
            .field("snapshot", &self.snapshot())
            .field("unlock_policy", &self.timing.unlock_policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingEventSink;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn controller_with_spy(timing: TimingConfig) -> (StageController, Arc<CollectingEventSink>) {
        let spy = Arc::new(CollectingEventSink::new());
        let controller = StageController::with_event_sink(timing, spy.clone());
        (controller, spy)
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_locked_on_plan_then_unlocks() {
        let (controller, spy) = controller_with_spy(TimingConfig::default());
        assert_eq!(controller.current(), Stage::Plan);
        assert!(!controller.can_navigate());

        advance(499).await;
        assert!(!controller.can_navigate());
        advance(2).await;
        assert!(controller.can_navigate());
        assert_eq!(spy.names(), vec!["stage.entered", "stage.unlocked"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_while_locked_is_noop() {
        let (controller, spy) = controller_with_spy(TimingConfig::default());
        assert!(!controller.next());
        assert_eq!(controller.current(), Stage::Plan);
        assert_eq!(spy.count(events::NAVIGATION_BLOCKED), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ends_are_noops() {
        let (controller, _) = controller_with_spy(TimingConfig::default());
        advance(600).await;
        assert!(!controller.prev());
        assert_eq!(controller.current(), Stage::Plan);

        controller.go_to(Stage::Monitor);
        advance(600).await;
        assert!(controller.can_navigate());
        assert!(!controller.next());
        assert_eq!(controller.current(), Stage::Monitor);
    }

    #[tokio::test(start_paused = true)]
    async fn test_adjacent_moves_across_every_pair() {
        let (controller, _) = controller_with_spy(TimingConfig::default().with_settle_delay_ms(10));
        for stage in Stage::ALL {
            controller.go_to(stage);
            if stage.is_build() {
                advance(6_000).await;
            } else {
                advance(20).await;
            }
            assert!(controller.can_navigate(), "{stage} should unlock");

            if let Some(next) = stage.next() {
                assert!(controller.next());
                assert_eq!(controller.current(), next);
                assert!(!controller.can_navigate());
                controller.go_to(stage);
                advance(if stage.is_build() { 6_000 } else { 20 }).await;
            }
            if let Some(prev) = stage.prev() {
                assert!(controller.prev());
                assert_eq!(controller.current(), prev);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_go_to_ignores_lock() {
        let (controller, _) = controller_with_spy(TimingConfig::default());
        controller.go_to(Stage::Release);
        assert_eq!(controller.current(), Stage::Release);
        assert!(!controller.can_navigate());
    }

    #[tokio::test(start_paused = true)]
    async fn test_build_progress_reaches_100_then_unlocks() {
        let (controller, spy) = controller_with_spy(TimingConfig::default());
        let mut updates = controller.subscribe();
        controller.go_to(Stage::Build);
        assert_eq!(controller.build_progress(), 0);

        let mut last = 0;
        for _ in 0..100 {
            advance(50).await;
            let progress = controller.build_progress();
            assert!(progress >= last);
            last = progress;
        }
        advance(10).await;
        assert_eq!(controller.build_progress(), 100);
        assert!(controller.can_navigate());
        assert_eq!(spy.count(events::BUILD_PROGRESS), 100);
        assert_eq!(spy.count(events::BUILD_COMPLETED), 1);

        assert!(updates.has_changed().unwrap());
        assert_eq!(
            *updates.borrow_and_update(),
            ControllerSnapshot {
                stage: Stage::Build,
                can_navigate: true,
                build_progress: 100,
                activation: 2,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_build_reentry_resets_progress() {
        let (controller, spy) = controller_with_spy(TimingConfig::default());
        controller.go_to(Stage::Build);
        advance(2_025).await;
        assert_eq!(controller.build_progress(), 40);

        controller.go_to(Stage::Test);
        controller.go_to(Stage::Build);
        assert_eq!(controller.build_progress(), 0);

        advance(6_000).await;
        assert_eq!(controller.build_progress(), 100);
        assert_eq!(spy.count(events::BUILD_COMPLETED), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_build_stops_ticks() {
        let (controller, spy) = controller_with_spy(TimingConfig::default());
        controller.go_to(Stage::Build);
        advance(525).await;
        controller.go_to(Stage::Test);
        let ticks = spy.count(events::BUILD_PROGRESS);

        advance(6_000).await;
        assert_eq!(spy.count(events::BUILD_PROGRESS), ticks);
        assert_eq!(controller.build_progress(), 10);
        assert_eq!(controller.current(), Stage::Test);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_updates_after_drop() {
        let (controller, spy) = controller_with_spy(TimingConfig::default());
        controller.go_to(Stage::Build);
        advance(100).await;
        drop(controller);
        let before = spy.len();

        advance(10_000).await;
        assert_eq!(spy.len(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_content_finished_policy() {
        let timing = TimingConfig::default().with_unlock_policy(UnlockPolicy::ContentFinished);
        let (controller, spy) = controller_with_spy(timing);

        advance(5_000).await;
        assert!(!controller.can_navigate());

        let activation = controller.snapshot().activation;
        controller.content_finished(Stage::Code, activation);
        assert!(!controller.can_navigate());

        controller.content_finished(Stage::Plan, activation);
        assert!(controller.can_navigate());
        assert_eq!(spy.count(events::STAGE_UNLOCKED), 1);

        controller.content_finished(Stage::Plan, activation);
        assert_eq!(spy.count(events::STAGE_UNLOCKED), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_content_finished_ignored_under_fixed_delay() {
        let (controller, _) = controller_with_spy(TimingConfig::default());
        controller.content_finished(Stage::Plan, controller.snapshot().activation);
        assert!(!controller.can_navigate());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reentering_stage_starts_new_activation() {
        let timing = TimingConfig::default().with_unlock_policy(UnlockPolicy::ContentFinished);
        let (controller, spy) = controller_with_spy(timing);
        let first = controller.snapshot().activation;
        controller.content_finished(Stage::Plan, first);
        assert!(controller.can_navigate());

        controller.go_to(Stage::Plan);
        let second = controller.snapshot().activation;
        assert_eq!(second, first + 1);
        assert!(!controller.can_navigate());

        // A report left over from the previous mount of the same stage.
        controller.content_finished(Stage::Plan, first);
        assert!(!controller.can_navigate());
        assert_eq!(spy.count(events::STAGE_UNLOCKED), 1);

        controller.content_finished(Stage::Plan, second);
        assert!(controller.can_navigate());
        assert_eq!(spy.count(events::STAGE_UNLOCKED), 2);
    }
}
