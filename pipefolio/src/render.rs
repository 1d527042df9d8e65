//! Plain-text rendering of [`ViewEvent`]s for a terminal.

use crate::core::{DisplayLine, EntryKind, Stage, Tone};
use crate::pipeline::ControllerSnapshot;
use crate::views::ViewEvent;
use std::fmt::Write as _;
use std::io;
use tokio::sync::mpsc::UnboundedReceiver;

const RESET: &str = "\x1b[0m";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
/// Cells in the build progress bar, one per 5%.
const BAR_WIDTH: usize = 20;

const fn ansi(tone: Tone) -> &'static str {
    match tone {
        Tone::Default => "",
        Tone::Command => "\x1b[1;32m",
        Tone::Muted => "\x1b[2m",
        Tone::Success => "\x1b[32m",
        Tone::Info => "\x1b[36m",
        Tone::Warning => "\x1b[33m",
        Tone::Error => "\x1b[31m",
        Tone::Accent => "\x1b[1;35m",
    }
}

/// Turns view events into text, one event at a time.
///
/// Typing frames redraw the current line in place; the next event of any
/// other kind finishes that line first.
#[derive(Debug, Default)]
pub struct TextRenderer {
    color: bool,
    typing: bool,
    last: Option<ControllerSnapshot>,
}

impl TextRenderer {
    /// Creates a renderer, with ANSI colours if `color` is set.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Writes every event from `events` to `out` until all senders are
    /// dropped and the queue is empty.
    pub async fn run<W: io::Write>(
        mut self,
        mut events: UnboundedReceiver<ViewEvent>,
        mut out: W,
    ) -> io::Result<()> {
        while let Some(event) = events.recv().await {
            let text = self.render(&event);
            if text.is_empty() {
                continue;
            }
            out.write_all(text.as_bytes())?;
            out.flush()?;
        }
        Ok(())
    }

    /// Text to write for `event`. May be empty.
    pub fn render(&mut self, event: &ViewEvent) -> String {
        let mut out = String::new();
        if self.typing && !matches!(event, ViewEvent::Typing { .. }) {
            out.push('\n');
            self.typing = false;
        }

        match event {
            ViewEvent::Boot(line) | ViewEvent::Line { line, .. } => self.line(&mut out, line),
            ViewEvent::Notice(line) => {
                let _ = write!(out, "{}", self.paint(Tone::Muted, "» "));
                self.line(&mut out, line);
            }
            ViewEvent::Terminal(entry) => {
                let tone = match entry.kind {
                    EntryKind::Input => Tone::Command,
                    EntryKind::Output => entry.line.tone,
                };
                self.line(&mut out, &DisplayLine::new(entry.content(), tone));
            }
            ViewEvent::TerminalCleared => {
                if self.color {
                    out.push_str(CLEAR_SCREEN);
                } else {
                    out.push_str("--- cleared ---\n");
                }
            }
            ViewEvent::PipelineStarted => {
                self.line(&mut out, &DisplayLine::new("Starting pipeline...", Tone::Success));
            }
            ViewEvent::Controller(snapshot) => self.status(&mut out, *snapshot),
            ViewEvent::StageMounted(stage) => self.header(&mut out, *stage),
            ViewEvent::Typing { text, .. } => {
                let _ = write!(out, "\r{}", self.paint(Tone::Command, text));
                self.typing = true;
            }
            ViewEvent::ContentFinished { .. } => {}
        }
        out
    }

    fn status(&mut self, out: &mut String, snapshot: ControllerSnapshot) {
        let previous = self.last.replace(snapshot);
        if snapshot.stage.is_build() && snapshot.build_progress % 10 == 0 {
            let changed = previous.map_or(true, |p| p.build_progress != snapshot.build_progress);
            if changed && snapshot.build_progress > 0 {
                let filled = usize::from(snapshot.build_progress / 5).min(BAR_WIDTH);
                let bar = format!(
                    "[{}{}] {}%",
                    "#".repeat(filled),
                    ".".repeat(BAR_WIDTH.saturating_sub(filled)),
                    snapshot.build_progress
                );
                self.line(out, &DisplayLine::new(bar, Tone::Info));
            }
        }
        let unlocked = snapshot.can_navigate
            && previous.map_or(true, |p| {
                !p.can_navigate || p.stage != snapshot.stage || p.activation != snapshot.activation
            });
        if unlocked {
            let hint = match (snapshot.stage.prev(), snapshot.stage.next()) {
                (_, Some(next)) => format!("Ready. 'n' continues to {}.", next.display_name()),
                (Some(_), None) => "End of pipeline. 'p' goes back.".to_string(),
                (None, None) => String::new(),
            };
            self.line(out, &DisplayLine::new(hint, Tone::Muted));
        }
    }

    fn header(&self, out: &mut String, stage: Stage) {
        let text = format!(
            "== [{}/{}] {} ({:.0}%) ==",
            stage.index() + 1,
            Stage::ALL.len(),
            stage.display_name(),
            stage.pipeline_percentage()
        );
        out.push('\n');
        self.line(out, &DisplayLine::new(text, Tone::Accent));
    }

    fn line(&self, out: &mut String, line: &DisplayLine) {
        let _ = writeln!(out, "{}", self.paint(line.tone, &line.text));
    }

    fn paint(&self, tone: Tone, text: &str) -> String {
        let code = ansi(tone);
        if !self.color || code.is_empty() {
            return text.to_string();
        }
        format!("{code}{text}{RESET}")
    }
}
