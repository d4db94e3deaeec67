//! Regex fallback extraction of solver parameters from evidence text
//!
//! When a production question is asked, the resolved evidence often states
//! the key reservoir numbers in prose ("Reservoir pressure: 215 bar").
//! This module scrapes the simple scalar parameters; anything it cannot
//! find keeps its documented default. Richer extraction (trajectories,
//! pump tables) is the external answer service's concern.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::types::WellPhysicalModel;

/// Scalar parameters recoverable from evidence text. `None` means the
/// pattern did not match and the default applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedParameters {
    pub reservoir_pressure_bar: Option<f64>,
    pub wellhead_pressure_bar: Option<f64>,
    pub productivity_index_m3hr_bar: Option<f64>,
    pub pump_intake_depth_m: Option<f64>,
}

impl ExtractedParameters {
    /// True when no pattern matched at all.
    pub const fn is_empty(&self) -> bool {
        self.reservoir_pressure_bar.is_none()
            && self.wellhead_pressure_bar.is_none()
            && self.productivity_index_m3hr_bar.is_none()
            && self.pump_intake_depth_m.is_none()
    }

    /// Number of parameters recovered.
    pub const fn count(&self) -> usize {
        self.reservoir_pressure_bar.is_some() as usize
            + self.wellhead_pressure_bar.is_some() as usize
            + self.productivity_index_m3hr_bar.is_some() as usize
            + self.pump_intake_depth_m.is_some() as usize
    }

    /// Overlay the recovered values onto a base model (typically
    /// `WellPhysicalModel::default()`).
    pub fn apply_to(&self, base: &WellPhysicalModel) -> WellPhysicalModel {
        let mut model = base.clone();
        if let Some(v) = self.reservoir_pressure_bar {
            model.reservoir_pressure_bar = v;
        }
        if let Some(v) = self.wellhead_pressure_bar {
            model.wellhead_pressure_bar = v;
        }
        if let Some(v) = self.productivity_index_m3hr_bar {
            model.productivity_index_m3hr_bar = v;
        }
        if let Some(v) = self.pump_intake_depth_m {
            model.pump_intake_depth_m = v;
        }
        model
    }
}

fn reservoir_pressure_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // fixed pattern, compile checked by tests
        Regex::new(r"(?i)reservoir\s+pressure[:\s]+(\d+\.?\d*)\s*bar").unwrap()
    })
}

fn wellhead_pressure_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"(?i)wellhead\s+pressure[:\s]+(\d+\.?\d*)\s*bar").unwrap()
    })
}

fn productivity_index_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"(?i)productivity\s+index[:\s]+(\d+\.?\d*)").unwrap()
    })
}

fn pump_depth_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"(?i)esp\s+(?:intake\s+)?depth[:\s]+(\d+\.?\d*)\s*m").unwrap()
    })
}

fn capture_f64(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Scan combined evidence text for solver parameters.
pub fn extract_parameters(text: &str) -> ExtractedParameters {
    let extracted = ExtractedParameters {
        reservoir_pressure_bar: capture_f64(reservoir_pressure_pattern(), text),
        wellhead_pressure_bar: capture_f64(wellhead_pressure_pattern(), text),
        productivity_index_m3hr_bar: capture_f64(productivity_index_pattern(), text),
        pump_intake_depth_m: capture_f64(pump_depth_pattern(), text),
    };
    debug!(recovered = extracted.count(), "Parameter extraction from evidence");
    extracted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_stated_parameters() {
        let text = "Well test summary. Reservoir pressure: 215.5 bar. \
                    Wellhead pressure 12 bar. Productivity Index: 4.2 m3/hr per bar. \
                    ESP intake depth: 620 m below rotary table.";
        let params = extract_parameters(text);
        assert_eq!(params.reservoir_pressure_bar, Some(215.5));
        assert_eq!(params.wellhead_pressure_bar, Some(12.0));
        assert_eq!(params.productivity_index_m3hr_bar, Some(4.2));
        assert_eq!(params.pump_intake_depth_m, Some(620.0));
        assert_eq!(params.count(), 4);
    }

    #[test]
    fn silent_text_yields_empty_extraction() {
        let params = extract_parameters("Completion ran 7\" liner to TD without incident.");
        assert!(params.is_empty());
    }

    #[test]
    fn apply_to_keeps_defaults_for_missing_values() {
        let params = ExtractedParameters {
            reservoir_pressure_bar: Some(200.0),
            ..ExtractedParameters::default()
        };
        let model = params.apply_to(&WellPhysicalModel::default());
        assert!((model.reservoir_pressure_bar - 200.0).abs() < f64::EPSILON);
        assert!((model.wellhead_pressure_bar - 10.0).abs() < f64::EPSILON);
        assert!((model.productivity_index_m3hr_bar - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn esp_depth_matches_without_intake_word() {
        let params = extract_parameters("ESP depth: 540 m");
        assert_eq!(params.pump_intake_depth_m, Some(540.0));
    }
}
