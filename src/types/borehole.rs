//! Borehole identity types
//!
//! A well may be re-drilled from the same surface location: the original
//! path is the main hole, successive re-drills are sidetracks S1 and S2.
//! Reporting always follows the most recently drilled path, so S2 (if
//! present) supersedes S1, which supersedes the main hole.

use serde::{Deserialize, Serialize};

use super::RankedCandidate;

/// Wellbore identity derived from a fragment's text and filename.
///
/// Each tag carries a fixed priority; higher priority means more recently
/// drilled and therefore authoritative for reporting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
pub enum BoreholeTag {
    /// Original wellbore path (priority 1, the default)
    #[default]
    MainHole,
    /// First sidetrack (priority 2)
    Sidetrack1,
    /// Second sidetrack (priority 3, always supersedes S1)
    Sidetrack2,
}

impl BoreholeTag {
    /// Fixed reporting priority: Sidetrack2 > Sidetrack1 > MainHole.
    pub const fn priority(self) -> u8 {
        match self {
            BoreholeTag::MainHole => 1,
            BoreholeTag::Sidetrack1 => 2,
            BoreholeTag::Sidetrack2 => 3,
        }
    }
}

impl std::fmt::Display for BoreholeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoreholeTag::MainHole => write!(f, "Main Hole"),
            BoreholeTag::Sidetrack1 => write!(f, "S1"),
            BoreholeTag::Sidetrack2 => write!(f, "S2"),
        }
    }
}

/// A ranked candidate annotated with its resolved borehole identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedCandidate {
    pub candidate: RankedCandidate,
    pub tag: BoreholeTag,
    /// Priority of `tag`, duplicated for downstream consumers
    pub priority: u8,
}

/// Per-tag candidate counts, ordered by descending priority.
///
/// Informational only: exposed for audit logging, never used by the
/// resolution decision itself.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BoreholeSummary {
    /// (tag, candidate count) pairs, highest priority first
    pub counts: Vec<(BoreholeTag, usize)>,
}

impl std::fmt::Display for BoreholeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.counts.is_empty() {
            return write!(f, "no candidates");
        }
        let mut first = true;
        for (tag, count) in &self.counts {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{} (Priority {}): {} documents", tag, tag.priority(), count)?;
            first = false;
        }
        Ok(())
    }
}
