//! The pipeline stage enum and its fixed order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the eight fixed phases of the simulated pipeline.
///
/// The order is fixed at compile time and never changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Intro and roadmap.
    Plan,
    /// About-me source listing.
    Code,
    /// Services catalog behind a fake build progress bar.
    Build,
    /// Skills presented as passing test suites.
    Test,
    /// Work history presented as release notes.
    Release,
    /// Projects behind a fake deployment timeline.
    Deploy,
    /// Certifications and education.
    Operate,
    /// Contact form.
    Monitor,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Self; 8] = [
        Self::Plan,
        Self::Code,
        Self::Build,
        Self::Test,
        Self::Release,
        Self::Deploy,
        Self::Operate,
        Self::Monitor,
    ];

    /// The stage a fresh walkthrough starts on.
    #[must_use]
    pub const fn first() -> Self {
        Self::Plan
    }

    /// The final stage.
    #[must_use]
    pub const fn last() -> Self {
        Self::Monitor
    }

    /// Zero-based position in [`Stage::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the stage at `index`, if any.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The adjacent stage after this one, or `None` on the last stage.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// The adjacent stage before this one, or `None` on the first stage.
    #[must_use]
    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Returns true for the stage whose unlock is driven by the build simulator.
    #[must_use]
    pub const fn is_build(self) -> bool {
        matches!(self, Self::Build)
    }

    /// Human-facing label.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Plan => "Plan",
            Self::Code => "Code",
            Self::Build => "Build",
            Self::Test => "Test",
            Self::Release => "Release",
            Self::Deploy => "Deploy",
            Self::Operate => "Operate",
            Self::Monitor => "Monitor",
        }
    }

    /// Backdrop colour shown while the stage is active.
    #[must_use]
    pub const fn background_color(self) -> &'static str {
        match self {
            Self::Plan => "#292524",
            Self::Code => "#172554",
            Self::Build => "#422006",
            Self::Test => "#064e3b",
            Self::Release => "#4c1d95",
            Self::Deploy => "#312e81",
            Self::Operate => "#134e4a",
            Self::Monitor => "#111827",
        }
    }

    /// How far through the pipeline this stage is, 0.0 on plan and 100.0 on monitor.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pipeline_percentage(self) -> f64 {
        self.index() as f64 / (Self::ALL.len() - 1) as f64 * 100.0
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::first()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plan => write!(f, "plan"),
            Self::Code => write!(f, "code"),
            Self::Build => write!(f, "build"),
            Self::Test => write!(f, "test"),
            Self::Release => write!(f, "release"),
            Self::Deploy => write!(f, "deploy"),
            Self::Operate => write!(f, "operate"),
            Self::Monitor => write!(f, "monitor"),
        }
    }
}

/// Returned when a string does not name a stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown stage: {0}")]
pub struct ParseStageError(pub String);

impl FromStr for Stage {
    type Err = ParseStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|stage| stage.to_string() == wanted)
            .ok_or_else(|| ParseStageError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let names: Vec<String> = Stage::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            vec!["plan", "code", "build", "test", "release", "deploy", "operate", "monitor"]
        );
    }

    #[test]
    fn test_adjacency() {
        for pair in Stage::ALL.windows(2) {
            assert_eq!(pair[0].next(), Some(pair[1]));
            assert_eq!(pair[1].prev(), Some(pair[0]));
        }
        assert_eq!(Stage::last().next(), None);
        assert_eq!(Stage::first().prev(), None);
    }

    #[test]
    fn test_default_is_plan() {
        assert_eq!(Stage::default(), Stage::Plan);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Build".parse::<Stage>(), Ok(Stage::Build));
        assert_eq!("  monitor ".parse::<Stage>(), Ok(Stage::Monitor));
        assert!("ship".parse::<Stage>().is_err());
    }

    #[test]
    fn test_pipeline_percentage() {
        assert!((Stage::Plan.pipeline_percentage() - 0.0).abs() < f64::EPSILON);
        assert!((Stage::Monitor.pipeline_percentage() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stage_serialize() {
        let json = serde_json::to_string(&Stage::Release).unwrap();
        assert_eq!(json, r#""release""#);

        let deserialized: Stage = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, Stage::Release);
    }
}
