//! Stage views: what each stage reveals, and how.
//!
//! A view is mounted when its stage becomes active and dropped when the stage
//! changes. Everything a view shows is sent as a [`ViewEvent`] to whoever
//! renders; dropping the view cancels every reveal still pending, so a
//! renderer never receives lines from a stage that is no longer active.

use crate::content::{self, Service};
use crate::core::{DisplayLine, HistoryEntry, Stage, Tone};
use crate::pipeline::ControllerSnapshot;
use crate::reveal::{LineRevealSequencer, PacedItem, TypingSequencer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

/// Something for the renderer to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// A boot transcript line on the landing terminal.
    Boot(DisplayLine),
    /// A terminal transcript entry.
    Terminal(HistoryEntry),
    /// The terminal transcript was cleared.
    TerminalCleared,
    /// The pipeline started.
    PipelineStarted,
    /// Controller state changed.
    Controller(ControllerSnapshot),
    /// A stage view was mounted; the renderer should clear the stage area.
    StageMounted(Stage),
    /// The current typing frame of a stage's command line.
    Typing {
        /// Owning stage.
        stage: Stage,
        /// The prefix typed so far.
        text: String,
    },
    /// A revealed stage content line.
    Line {
        /// Owning stage.
        stage: Stage,
        /// The line.
        line: DisplayLine,
    },
    /// A stage finished revealing its content.
    ContentFinished {
        /// Owning stage.
        stage: Stage,
        /// The controller activation the view was mounted for.
        activation: u64,
    },
    /// A one-off notice (welcome, contact results).
    Notice(DisplayLine),
}

/// Per-character delay of the build stage command.
const COMMAND_CHAR_DELAY: Duration = Duration::from_millis(100);
/// Pause between the typed command and the services list.
const COMMAND_SETTLE_MS: u64 = 500;
/// Per-character delay of service titles.
const TITLE_CHAR_MS: u64 = 30;
/// Pause between services.
const SERVICE_GAP_MS: u64 = 100;
/// Stagger between cards on card-style stages.
const CARD_STAGGER_MS: u64 = 100;

fn line(text: impl Into<String>, tone: Tone, delay_ms: u64) -> PacedItem<DisplayLine> {
    PacedItem::after_ms(DisplayLine::new(text, tone), delay_ms)
}

fn plan_script() -> Vec<PacedItem<DisplayLine>> {
    let mut script = vec![
        line("Project Blueprint", Tone::Accent, 0),
        line("Initial planning and architecture phase", Tone::Muted, 0),
        line("STATUS: APPROVED", Tone::Success, 0),
        line(
            "Freelance & Services: edensitko.com. Check out my full professional services, freelance offerings, and detailed portfolio on my main site.",
            Tone::Default,
            CARD_STAGGER_MS,
        ),
        line("Pipeline Strategy", Tone::Accent, CARD_STAGGER_MS),
    ];
    for stage in Stage::ALL {
        let marker = if stage == Stage::first() { " (Current)" } else { "" };
        script.push(line(
            format!(
                "{}. {} - {}{marker}",
                stage.index() + 1,
                stage.display_name(),
                content::roadmap_label(stage)
            ),
            Tone::Default,
            CARD_STAGGER_MS / 2,
        ));
    }
    script.push(line(
        format!("Architecture Sketch: {}", content::ARCHITECTURE.join(" → ")),
        Tone::Info,
        CARD_STAGGER_MS,
    ));
    script.push(line("Draft v1.0 - Approved for Development", Tone::Muted, CARD_STAGGER_MS));
    script.push(line("✓ Ready to Code", Tone::Success, 0));
    script
}

fn code_script() -> Vec<PacedItem<DisplayLine>> {
    content::CODE_LINES
        .iter()
        .zip(0u64..)
        .map(|(&(text, tone), i)| {
            line(format!("{:>2}  {text}", i + 1), tone, i * content::CODE_LINE_STEP_MS)
        })
        .collect()
}

fn title_typing_ms(service: &Service) -> u64 {
    service.title.chars().count() as u64 * TITLE_CHAR_MS
}

fn build_script() -> Vec<PacedItem<DisplayLine>> {
    let mut script = Vec::new();
    let mut pause = COMMAND_SETTLE_MS;
    for service in content::SERVICES {
        script.push(line(service.title, Tone::Success, pause + title_typing_ms(service)));
        for text in service.lines {
            script.push(line(*text, Tone::Muted, 0));
        }
        pause = SERVICE_GAP_MS;
    }
    script
}

fn test_script() -> Vec<PacedItem<DisplayLine>> {
    let mut script = Vec::new();
    for (i, suite) in content::SKILL_SUITES.iter().enumerate() {
        let pause = if i == 0 { 0 } else { content::SUITE_PAUSE_MS };
        script.push(line(format!("▶ Running {}...", suite.name), Tone::Info, pause));
        script.push(line(
            format!("✓ {} PASS ({})", suite.name, suite.verdict),
            Tone::Success,
            content::SUITE_RUN_MS,
        ));
        script.push(line(format!("  {}", suite.items.join(", ")), Tone::Muted, 0));
    }
    let total: usize = content::SKILL_SUITES.iter().map(|s| s.items.len()).sum();
    script.push(line(
        format!("{} suites, {total} checks, 0 failures", content::SKILL_SUITES.len()),
        Tone::Success,
        content::SUITE_PAUSE_MS,
    ));
    script
}

fn release_script() -> Vec<PacedItem<DisplayLine>> {
    let mut script = vec![line(
        "My professional journey as a full-stack developer, devops engineer, IT professional.",
        Tone::Muted,
        0,
    )];
    for release in content::RELEASES {
        script.push(line(
            format!(
                "{}  {} @ {}  ({})",
                release.version, release.role, release.company, release.period
            ),
            Tone::Accent,
            CARD_STAGGER_MS,
        ));
        script.push(line(format!("    {}", release.notes), Tone::Default, 0));
    }
    script
}

fn deploy_script() -> Vec<PacedItem<DisplayLine>> {
    let mut script: Vec<_> = content::DEPLOY_STEPS
        .iter()
        .map(|&(step, delay)| {
            let tone = if step.starts_with('✓') { Tone::Success } else { Tone::Info };
            line(step, tone, delay)
        })
        .collect();
    let mut pause = content::DEPLOY_SETTLE_MS;
    for project in content::PROJECTS {
        script.push(line(project.title, Tone::Accent, pause));
        script.push(line(format!("    {}", project.summary), Tone::Default, 0));
        script.push(line(format!("    [{}]", project.tags.join(", ")), Tone::Muted, 0));
        let mut links = format!("    {}", project.repository);
        if let Some(live) = project.live {
            links.push_str(&format!(" | {live}"));
        }
        script.push(line(links, Tone::Info, 0));
        pause = CARD_STAGGER_MS;
    }
    script
}

fn operate_script() -> Vec<PacedItem<DisplayLine>> {
    let mut script = vec![
        line("Professional qualifications and academic background", Tone::Muted, 0),
        line("Official Certifications", Tone::Accent, 0),
    ];
    for (title, issuer, date) in content::CERTIFICATIONS {
        script.push(line(format!("  {title} | {issuer} | {date}"), Tone::Default, CARD_STAGGER_MS));
    }
    script.push(line("Education", Tone::Accent, CARD_STAGGER_MS));
    for (degree, school, date) in content::EDUCATION {
        script.push(line(format!("  {degree} | {school} | {date}"), Tone::Default, CARD_STAGGER_MS));
    }
    script
}

fn monitor_script(cv_path: &str) -> Vec<PacedItem<DisplayLine>> {
    vec![
        line("System Monitor & Contact", Tone::Accent, 0),
        line("Real-time communication uplink established  [ONLINE]", Tone::Success, 0),
        line(format!("EMAIL   {}", content::CONTACT_EMAIL), Tone::Default, CARD_STAGGER_MS),
        line(format!("RESUME  Download CV: {cv_path}"), Tone::Default, CARD_STAGGER_MS),
        line("CPU Load 12% | Memory 45%", Tone::Muted, CARD_STAGGER_MS),
        line("Send a transmission: send <name>|<email>|<message>", Tone::Info, CARD_STAGGER_MS),
    ]
}

/// A mounted stage: its reveal timers and the channel it reports to.
pub struct StageView {
    stage: Stage,
    activation: u64,
    reveal: Arc<LineRevealSequencer<DisplayLine>>,
    typer: Option<TypingSequencer>,
}

impl StageView {
    /// The paced content of `stage`.
    #[must_use]
    pub fn script(stage: Stage) -> Vec<PacedItem<DisplayLine>> {
        Self::script_with_cv(stage, content::CV_PATH)
    }

    /// The paced content of `stage`, linking the CV at `cv_path`.
    #[must_use]
    pub fn script_with_cv(stage: Stage, cv_path: &str) -> Vec<PacedItem<DisplayLine>> {
        match stage {
            Stage::Plan => plan_script(),
            Stage::Code => code_script(),
            Stage::Build => build_script(),
            Stage::Test => test_script(),
            Stage::Release => release_script(),
            Stage::Deploy => deploy_script(),
            Stage::Operate => operate_script(),
            Stage::Monitor => monitor_script(cv_path),
        }
    }

    /// Mounts `stage` for the controller's `activation` and starts revealing
    /// into `events`.
    ///
    /// The build stage first types its command line, then lists services.
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn mount(
        stage: Stage,
        activation: u64,
        cv_path: &str,
        events: UnboundedSender<ViewEvent>,
    ) -> Self {
        let _ = events.send(ViewEvent::StageMounted(stage));

        let reveal = {
            let on_line = events.clone();
            let on_done = events.clone();
            Arc::new(
                LineRevealSequencer::new(Self::script_with_cv(stage, cv_path))
                    .on_item(move |_, line: &DisplayLine| {
                        let _ = on_line.send(ViewEvent::Line {
                            stage,
                            line: line.clone(),
                        });
                    })
                    .on_finished(move || {
                        trace!(%stage, activation, "Stage content finished");
                        let _ = on_done.send(ViewEvent::ContentFinished { stage, activation });
                    }),
            )
        };

        let typer = if stage.is_build() {
            let typer = TypingSequencer::new(COMMAND_CHAR_DELAY);
            let frames = events;
            let after = reveal.clone();
            typer.start_with(
                content::SERVICES_COMMAND,
                move |text| {
                    let _ = frames.send(ViewEvent::Typing {
                        stage,
                        text: text.to_string(),
                    });
                },
                move || after.start(),
            );
            Some(typer)
        } else {
            reveal.start();
            None
        };

        Self {
            stage,
            activation,
            reveal,
            typer,
        }
    }

    /// The mounted stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// The controller activation this view belongs to.
    #[must_use]
    pub const fn activation(&self) -> u64 {
        self.activation
    }

    /// Lines revealed so far.
    #[must_use]
    pub fn revealed(&self) -> Vec<DisplayLine> {
        self.reveal.transcript()
    }

    /// Returns true while anything is still being typed or revealed.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.typer.as_ref().is_some_and(TypingSequencer::is_typing) || self.reveal.is_revealing()
    }
}

impl Drop for StageView {
    fn drop(&mut self) {
        if let Some(typer) = &self.typer {
            typer.cancel();
        }
        self.reveal.cancel();
    }
}

impl std::fmt::Debug for StageView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageView")
            .field("stage", &self.stage)
            .field("activation", &self.activation)
            .field("revealed", &self.reveal.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_every_stage_has_content() {
        for stage in Stage::ALL {
            assert!(!StageView::script(stage).is_empty(), "{stage} is empty");
        }
    }

    #[test]
    fn test_code_lines_accelerate_by_five_ms() {
        let script = StageView::script(Stage::Code);
        assert_eq!(script.len(), content::CODE_LINES.len());
        assert_eq!(script[0].delay, Duration::ZERO);
        assert_eq!(script[3].delay, Duration::from_millis(15));
        assert_eq!(script[0].item.text, " 1  // ABOUT_ME.TSX");
    }

    #[test]
    fn test_deploy_steps_precede_projects() {
        let script = StageView::script(Stage::Deploy);
        assert_eq!(script[0].item.text, "Building Docker images...");
        assert_eq!(script[4].item.text, "✓ Deployment successful!");
        assert_eq!(script[5].delay, Duration::from_millis(400));
        assert_eq!(script[5].item.text, "🎓 DevOps Capstone Project");
    }

    #[test]
    fn test_monitor_links_cv() {
        let script = StageView::script_with_cv(Stage::Monitor, "/cv.pdf");
        assert!(script.iter().any(|p| p.item.text.ends_with("/cv.pdf")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_reveals_and_finishes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let view = StageView::mount(Stage::Operate, 7, content::CV_PATH, tx);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!view.is_animating());

        let mut lines = 0;
        let mut finished = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                ViewEvent::Line { stage, .. } => {
                    assert_eq!(stage, Stage::Operate);
                    lines += 1;
                }
                ViewEvent::ContentFinished { stage, activation } => {
                    assert_eq!((stage, activation), (Stage::Operate, 7));
                    finished = true;
                }
                _ => {}
            }
        }
        assert_eq!(lines, StageView::script(Stage::Operate).len());
        assert!(finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_build_types_command_first() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let view = StageView::mount(Stage::Build, 1, content::CV_PATH, tx);

        tokio::time::sleep(Duration::from_millis(1_850)).await;
        assert!(view.revealed().is_empty());

        let mut last_frame = String::new();
        while let Ok(event) = rx.try_recv() {
            if let ViewEvent::Typing { text, .. } = event {
                last_frame = text;
            }
        }
        assert_eq!(last_frame, content::SERVICES_COMMAND);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(view.revealed().len(), StageView::script(Stage::Build).len());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_view_stops_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let view = StageView::mount(Stage::Deploy, 1, content::CV_PATH, tx);
        tokio::time::sleep(Duration::from_millis(350)).await;
        drop(view);
        while rx.try_recv().is_ok() {}

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }
}
