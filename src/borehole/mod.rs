//! Borehole Resolution Module
//!
//! Collapses a ranked, mixed-provenance evidence set down to one coherent
//! wellbore's evidence. The domain rule: the most recently drilled sidetrack
//! supersedes earlier ones for reporting, so S2 > S1 > Main Hole.
//!
//! Classification is a pure function over normalized text driven by a fixed
//! marker table evaluated in documented precedence order (S2 checked before
//! S1 — a text carrying both markers is S2).

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::types::{BoreholeSummary, BoreholeTag, RankedCandidate, ResolvedCandidate};

// ============================================================================
// Marker Table
// ============================================================================

/// One row of the marker table: pattern set for a sidetrack tag.
struct MarkerRule {
    pattern: &'static Regex,
    tag: BoreholeTag,
}

/// Sidetrack 2 indicators: token-boundary `s2` and the spelled-out
/// variants. `-S2` / `_S2` filename forms match only when the marker is
/// not followed by another word character (`_` is a word character, so
/// `_s2_` stays unmatched — same behavior as the field naming convention
/// this table was built from).
fn s2_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // fixed pattern, compile checked by tests
        Regex::new(r"[-_\s]s2\b|\bs2[-_\s]|\bs2\b|sidetrack[ -]?2|side track 2").unwrap()
    })
}

/// Sidetrack 1 indicators, the exact analogue of the S2 set.
fn s1_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"[-_\s]s1\b|\bs1[-_\s]|\bs1\b|sidetrack[ -]?1|side track 1").unwrap()
    })
}

/// The marker table in precedence order: S2 strictly before S1.
fn marker_rules() -> [MarkerRule; 2] {
    [
        MarkerRule { pattern: s2_pattern(), tag: BoreholeTag::Sidetrack2 },
        MarkerRule { pattern: s1_pattern(), tag: BoreholeTag::Sidetrack1 },
    ]
}

// ============================================================================
// Classification
// ============================================================================

/// Classify text by wellbore identity.
///
/// Lowercase-normalizes, then checks the marker table in precedence order.
/// No marker at all means the original (main) hole.
pub fn classify(text: &str) -> BoreholeTag {
    let normalized = text.to_lowercase();
    for rule in marker_rules() {
        if rule.pattern.is_match(&normalized) {
            return rule.tag;
        }
    }
    BoreholeTag::MainHole
}

/// Classification input for a candidate: body text plus source filename.
/// The filename often carries the borehole marker when the text does not.
fn classification_input(candidate: &RankedCandidate) -> String {
    format!("{} {}", candidate.fragment.text, candidate.fragment.source_file)
}

// ============================================================================
// Resolution
// ============================================================================

/// Tag every candidate with its borehole identity, preserving order.
pub fn annotate(candidates: &[RankedCandidate]) -> Vec<ResolvedCandidate> {
    candidates
        .iter()
        .map(|candidate| {
            let tag = classify(&classification_input(candidate));
            ResolvedCandidate {
                candidate: candidate.clone(),
                tag,
                priority: tag.priority(),
            }
        })
        .collect()
}

/// Collapse candidates to the single highest-priority wellbore's evidence.
///
/// Returns ALL candidates of the winning group — never a mix of groups and
/// never an artificially truncated subset. Empty in, empty out. When every
/// candidate classifies to the same tag the whole set passes through.
pub fn resolve(candidates: &[RankedCandidate]) -> Vec<ResolvedCandidate> {
    let annotated = annotate(candidates);
    let Some(winning_tag) = annotated.iter().map(|c| c.tag).max_by_key(|t| t.priority()) else {
        return Vec::new();
    };

    let resolved: Vec<ResolvedCandidate> = annotated
        .into_iter()
        .filter(|c| c.tag == winning_tag)
        .collect();

    info!(
        tag = %winning_tag,
        kept = resolved.len(),
        input = candidates.len(),
        "Resolved evidence to highest-priority borehole"
    );
    resolved
}

/// Per-tag candidate counts ordered by descending priority.
///
/// Purely informational — exposed for audit logging, never consulted by
/// [`resolve`].
pub fn summary(candidates: &[RankedCandidate]) -> BoreholeSummary {
    let annotated = annotate(candidates);
    let mut counts: Vec<(BoreholeTag, usize)> = Vec::new();
    for resolved in &annotated {
        match counts.iter_mut().find(|(tag, _)| *tag == resolved.tag) {
            Some((_, count)) => *count += 1,
            None => counts.push((resolved.tag, 1)),
        }
    }
    counts.sort_by(|a, b| b.0.priority().cmp(&a.0.priority()));

    debug!(groups = counts.len(), "Borehole summary computed");
    BoreholeSummary { counts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Fragment;

    fn candidate(text: &str, source_file: &str, rank: usize) -> RankedCandidate {
        RankedCandidate {
            fragment: Fragment {
                well_name: "ADK-01".to_string(),
                source_file: source_file.to_string(),
                sequence_index: 0,
                total_in_document: 1,
                text: text.to_string(),
                embedding: vec![0.0; 4],
                is_image_derived: false,
            },
            similarity: 0.9,
            rank,
        }
    }

    #[test]
    fn classifies_s2_markers() {
        assert_eq!(classify("ADK-01-S2 completion report"), BoreholeTag::Sidetrack2);
        assert_eq!(classify("sidetrack 2 drilling summary"), BoreholeTag::Sidetrack2);
        assert_eq!(classify("Sidetrack-2 final"), BoreholeTag::Sidetrack2);
        assert_eq!(classify("side track 2 data"), BoreholeTag::Sidetrack2);
        assert_eq!(classify("sidetrack2.pdf"), BoreholeTag::Sidetrack2);
        assert_eq!(classify("ADK-01_S2 completion"), BoreholeTag::Sidetrack2);
        assert_eq!(classify("report for s2_section"), BoreholeTag::Sidetrack2);
    }

    #[test]
    fn classifies_s1_markers() {
        assert_eq!(classify("ADK-01-S1 completion"), BoreholeTag::Sidetrack1);
        assert_eq!(classify("sidetrack 1 summary"), BoreholeTag::Sidetrack1);
        assert_eq!(classify("s1_completion.pdf"), BoreholeTag::Sidetrack1);
    }

    #[test]
    fn s2_supersedes_s1_when_both_present() {
        assert_eq!(
            classify("S1 abandoned, drilling continued as S2"),
            BoreholeTag::Sidetrack2
        );
        assert_eq!(
            classify("sidetrack 2 kicked off from sidetrack 1 window"),
            BoreholeTag::Sidetrack2
        );
    }

    #[test]
    fn defaults_to_main_hole() {
        assert_eq!(classify("General well information"), BoreholeTag::MainHole);
        assert_eq!(classify(""), BoreholeTag::MainHole);
        // "s20" and "as2x" are not token-boundary s2 markers
        assert_eq!(classify("sample s20 casing"), BoreholeTag::MainHole);
    }

    #[test]
    fn filename_marker_wins_when_text_is_silent() {
        let c = candidate("Completion interval details", "ADK-01_S2.pdf", 1);
        let resolved = resolve(&[c]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].tag, BoreholeTag::Sidetrack2);
    }

    #[test]
    fn underscore_flanked_marker_is_not_matched() {
        // `_` is a word character: `_s2_` carries no token boundary on
        // either side, so this filename classifies as main hole.
        assert_eq!(classify("ADK-01_S2_final.pdf"), BoreholeTag::MainHole);
        let c = candidate("Completion interval details", "ADK-01_S2_final.pdf", 1);
        let resolved = resolve(&[c]);
        assert_eq!(resolved[0].tag, BoreholeTag::MainHole);
    }

    #[test]
    fn resolve_keeps_only_highest_priority_group() {
        let candidates = vec![
            candidate("Main hole completion data", "main_hole_data.pdf", 1),
            candidate("Sidetrack 1 well data", "s1_completion.pdf", 2),
            candidate("S2 final report", "s2_report.pdf", 3),
            candidate("General well information", "general.pdf", 4),
        ];
        let resolved = resolve(&candidates);
        assert_eq!(resolved.len(), 1);
        assert!(resolved.iter().all(|c| c.tag == BoreholeTag::Sidetrack2));
    }

    #[test]
    fn resolve_passes_uniform_set_through() {
        let candidates = vec![
            candidate("Main hole completion", "completion.pdf", 1),
            candidate("Production log", "production.pdf", 2),
        ];
        let resolved = resolve(&candidates);
        assert_eq!(resolved.len(), 2);
        assert!(resolved.iter().all(|c| c.tag == BoreholeTag::MainHole));
    }

    #[test]
    fn resolve_empty_is_empty() {
        assert!(resolve(&[]).is_empty());
    }

    #[test]
    fn resolved_group_has_max_priority_of_input() {
        let candidates = vec![
            candidate("Main hole data", "main.pdf", 1),
            candidate("Sidetrack 1 report", "s1.pdf", 2),
        ];
        let resolved = resolve(&candidates);
        let max_input_priority = annotate(&candidates)
            .iter()
            .map(|c| c.priority)
            .max()
            .unwrap();
        assert!(!resolved.is_empty());
        assert!(resolved.iter().all(|c| c.priority == max_input_priority));
    }

    #[test]
    fn summary_orders_by_descending_priority() {
        let candidates = vec![
            candidate("Main hole data", "main.pdf", 1),
            candidate("S2 report", "s2.pdf", 2),
            candidate("More main hole data", "main2.pdf", 3),
        ];
        let s = summary(&candidates);
        assert_eq!(s.counts.len(), 2);
        assert_eq!(s.counts[0], (BoreholeTag::Sidetrack2, 1));
        assert_eq!(s.counts[1], (BoreholeTag::MainHole, 2));
        let rendered = s.to_string();
        assert!(rendered.contains("S2 (Priority 3): 1 documents"));
    }
}
