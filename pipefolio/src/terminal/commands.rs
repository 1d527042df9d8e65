//! Command tables and the interpreter.

use crate::content;
use crate::core::{DisplayLine, Tone};
use std::collections::{HashMap, HashSet};

/// How a terminal echoes what the visitor typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoStyle {
    /// Echo the trimmed input; blank input is dropped without an echo.
    Trimmed,
    /// Echo exactly what was typed, blank input included.
    Raw,
}

/// What a submitted command does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Print a line.
    Output(DisplayLine),
    /// Empty the transcript.
    Clear,
    /// Leave the terminal and start the pipeline.
    EnterPipeline,
    /// Nothing to print.
    Nothing,
}

/// A static set of terminal commands.
///
/// Matching is exact after trimming and lowercasing. A `cat <file>` form is
/// served from a separate allow-list when the table has one.
#[derive(Debug, Clone)]
pub struct CommandTable {
    name: &'static str,
    commands: HashMap<String, DisplayLine>,
    files: HashMap<String, DisplayLine>,
    launch_aliases: HashSet<String>,
    not_found: &'static str,
    echo: EchoStyle,
    banner: Vec<DisplayLine>,
}

impl CommandTable {
    /// Creates an empty table. `not_found` may contain a `{cmd}` placeholder.
    #[must_use]
    pub fn new(name: &'static str, not_found: &'static str, echo: EchoStyle) -> Self {
        Self {
            name,
            commands: HashMap::new(),
            files: HashMap::new(),
            launch_aliases: HashSet::new(),
            not_found,
            echo,
            banner: Vec::new(),
        }
    }

    /// The landing terminal shown before the pipeline.
    #[must_use]
    pub fn welcome() -> Self {
        let mut table = Self::new(
            "welcome",
            "Command not found: {cmd}. Type 'help' for available commands.",
            EchoStyle::Trimmed,
        );
        for &(cmd, text, tone) in content::WELCOME_COMMANDS {
            table = table.with_command(cmd, DisplayLine::new(text, tone));
        }
        for &(file, text, tone) in content::WELCOME_FILES {
            table = table.with_file(file, DisplayLine::new(text, tone));
        }
        for alias in content::LAUNCH_ALIASES {
            table = table.with_launch_alias(alias);
        }
        table
    }

    /// The help terminal available on every stage.
    #[must_use]
    pub fn floating() -> Self {
        let mut table = Self::new(
            "floating",
            "Command not found: {cmd}\nType \"help\" for available commands",
            EchoStyle::Raw,
        );
        for &(cmd, text, tone) in content::FLOATING_COMMANDS {
            table = table.with_command(cmd, DisplayLine::new(text, tone));
        }
        table.banner = content::FLOATING_BANNER
            .iter()
            .map(|line| DisplayLine::plain(*line))
            .collect();
        table
    }

    /// Adds an exact command.
    #[must_use]
    pub fn with_command(mut self, command: &str, output: DisplayLine) -> Self {
        self.commands.insert(command.to_lowercase(), output);
        self
    }

    /// Adds a file readable with `cat`.
    #[must_use]
    pub fn with_file(mut self, file: &str, contents: DisplayLine) -> Self {
        self.files.insert(file.to_lowercase(), contents);
        self
    }

    /// Adds a command that enters the pipeline.
    #[must_use]
    pub fn with_launch_alias(mut self, alias: &str) -> Self {
        self.launch_aliases.insert(alias.to_lowercase());
        self
    }

    /// The table name, used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// How input is echoed.
    #[must_use]
    pub const fn echo_style(&self) -> EchoStyle {
        self.echo
    }

    /// Lines printed when a session opens.
    #[must_use]
    pub fn banner(&self) -> &[DisplayLine] {
        &self.banner
    }

    /// Sorted list of exact commands.
    #[must_use]
    pub fn command_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn not_found_line(&self, typed: &str) -> DisplayLine {
        DisplayLine::new(self.not_found.replace("{cmd}", typed), Tone::Error)
    }
}

/// Resolves one line of input against `table`.
///
/// The not-found text echoes the input as typed (trimmed for the
/// [`EchoStyle::Trimmed`] dialect), not the normalized form.
#[must_use]
pub fn interpret(table: &CommandTable, input: &str) -> CommandOutcome {
    let trimmed = input.trim();
    let normalized = trimmed.to_lowercase();

    if normalized.is_empty() {
        return CommandOutcome::Nothing;
    }

    if !table.files.is_empty() {
        if let Some(rest) = normalized.strip_prefix("cat ") {
            let file = rest.trim();
            return CommandOutcome::Output(table.files.get(file).cloned().unwrap_or_else(|| {
                DisplayLine::new(format!("cat: {file}: No such file or directory"), Tone::Error)
            }));
        }
    }

    if normalized == "clear" {
        return CommandOutcome::Clear;
    }

    if table.launch_aliases.contains(&normalized) {
        return CommandOutcome::EnterPipeline;
    }

    match table.commands.get(&normalized) {
        Some(line) => CommandOutcome::Output(line.clone()),
        None => {
            let typed = match table.echo {
                EchoStyle::Trimmed => trimmed,
                EchoStyle::Raw => input,
            };
            CommandOutcome::Output(table.not_found_line(typed))
        }
    }
}
