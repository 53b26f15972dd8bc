use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── MODULE KIND ───────────────────────────────────────────────────────────────
//

/// Practice-test category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Listening,
    Reading,
    Writing,
    Speaking,
    Generic,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 5] = [
        ModuleKind::Listening,
        ModuleKind::Reading,
        ModuleKind::Writing,
        ModuleKind::Speaking,
        ModuleKind::Generic,
    ];

    /// Lowercase name used in routes and on the wire.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            ModuleKind::Listening => "listening",
            ModuleKind::Reading => "reading",
            ModuleKind::Writing => "writing",
            ModuleKind::Speaking => "speaking",
            ModuleKind::Generic => "generic",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            ModuleKind::Listening => "Listening",
            ModuleKind::Reading => "Reading",
            ModuleKind::Writing => "Writing",
            ModuleKind::Speaking => "Speaking",
            ModuleKind::Generic => "Practice Test",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown module: {0}")]
pub struct ParseModuleError(String);

impl FromStr for ModuleKind {
    type Err = ParseModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        ModuleKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == lowered)
            .ok_or_else(|| ParseModuleError(s.to_string()))
    }
}

//
// ─── DESCRIPTOR ────────────────────────────────────────────────────────────────
//

/// Shape of the navigation cursor for a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTopology {
    /// Section/passage → question, two-level stepping.
    Sectioned,
    /// A single ordered run of questions.
    Flat,
    /// Parts are browsed as a whole; no question-level stepping.
    Parts,
}

/// How a finished session is turned into a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringRule {
    /// Compare answers against correct option keys.
    Objective,
    /// Word count against each task's minimum.
    WordCount,
    /// Fraction of parts with any recorded note.
    PartCoverage,
}

/// Everything that differs between the timed test flows.
///
/// One runner is parameterised by a descriptor instead of carrying a copy of
/// the session logic per module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    kind: ModuleKind,
    duration_secs: u32,
    low_time_threshold_secs: u32,
    topology: NavigationTopology,
    scoring: ScoringRule,
}

impl ModuleDescriptor {
    /// Default timing, navigation and scoring for a module.
    #[must_use]
    pub fn for_kind(kind: ModuleKind) -> Self {
        let (duration_secs, low_time_threshold_secs, topology, scoring) = match kind {
            ModuleKind::Listening => (1_800, 300, NavigationTopology::Sectioned, ScoringRule::Objective),
            ModuleKind::Reading => (3_600, 300, NavigationTopology::Sectioned, ScoringRule::Objective),
            ModuleKind::Writing => (3_600, 300, NavigationTopology::Sectioned, ScoringRule::WordCount),
            ModuleKind::Speaking => (900, 60, NavigationTopology::Parts, ScoringRule::PartCoverage),
            ModuleKind::Generic => (3_600, 300, NavigationTopology::Flat, ScoringRule::Objective),
        };
        Self {
            kind,
            duration_secs,
            low_time_threshold_secs,
            topology,
            scoring,
        }
    }

    /// Override the starting duration, e.g. from question-set metadata.
    ///
    /// A zero duration is ignored.
    #[must_use]
    pub fn with_duration_secs(mut self, secs: u32) -> Self {
        if secs > 0 {
            self.duration_secs = secs;
        }
        self
    }

    #[must_use]
    pub fn with_low_time_threshold_secs(mut self, secs: u32) -> Self {
        self.low_time_threshold_secs = secs;
        self
    }

    #[must_use]
    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    #[must_use]
    pub fn low_time_threshold_secs(&self) -> u32 {
        self.low_time_threshold_secs
    }

    #[must_use]
    pub fn topology(&self) -> NavigationTopology {
        self.topology
    }

    #[must_use]
    pub fn scoring(&self) -> ScoringRule {
        self.scoring
    }

    /// Instructions shown before the session starts.
    #[must_use]
    pub fn instructions(&self) -> &'static str {
        match self.kind {
            ModuleKind::Listening => {
                "You will hear each recording once. Answer the questions for each section as you listen."
            }
            ModuleKind::Reading => {
                "Read each passage carefully and answer the questions that follow it."
            }
            ModuleKind::Writing => {
                "Complete both tasks. Write at least 150 words for Task 1 and 250 words for Task 2."
            }
            ModuleKind::Speaking => {
                "Work through each part. Note down your key points before you speak."
            }
            ModuleKind::Generic => "Answer every question before the timer runs out.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_durations_match_exam_timing() {
        assert_eq!(ModuleDescriptor::for_kind(ModuleKind::Listening).duration_secs(), 1_800);
        assert_eq!(ModuleDescriptor::for_kind(ModuleKind::Reading).duration_secs(), 3_600);
        assert_eq!(ModuleDescriptor::for_kind(ModuleKind::Writing).duration_secs(), 3_600);
        assert_eq!(ModuleDescriptor::for_kind(ModuleKind::Speaking).duration_secs(), 900);
        assert_eq!(ModuleDescriptor::for_kind(ModuleKind::Generic).duration_secs(), 3_600);
    }

    #[test]
    fn speaking_uses_final_minute_threshold() {
        let speaking = ModuleDescriptor::for_kind(ModuleKind::Speaking);
        assert_eq!(speaking.low_time_threshold_secs(), 60);
        assert_eq!(speaking.topology(), NavigationTopology::Parts);
        assert_eq!(
            ModuleDescriptor::for_kind(ModuleKind::Reading).low_time_threshold_secs(),
            300
        );
    }

    #[test]
    fn zero_duration_override_is_ignored() {
        let generic = ModuleDescriptor::for_kind(ModuleKind::Generic).with_duration_secs(0);
        assert_eq!(generic.duration_secs(), 3_600);
        let generic = generic.with_duration_secs(45 * 60);
        assert_eq!(generic.duration_secs(), 2_700);
    }

    #[test]
    fn module_kind_parses_case_insensitively() {
        assert_eq!("Reading".parse::<ModuleKind>().unwrap(), ModuleKind::Reading);
        assert_eq!(ModuleKind::Speaking.to_string(), "speaking");
        assert!("maths".parse::<ModuleKind>().is_err());
    }
}
