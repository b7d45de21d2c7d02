//! Classification results and label selection.
//!
//! The detector itself is an external collaborator: it turns a frame into a
//! list of [`Detection`]s (model class name + confidence).  This module maps
//! model classes onto the station's display categories and picks the single
//! best detection, exactly as the station reports it on its display.

pub mod worker;

use core::fmt;

use heapless::String;
use log::debug;

/// Longest display category the status screen can show next to `Type: `.
pub const LABEL_CAPACITY: usize = 16;

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Best recognised object for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub label: String<LABEL_CAPACITY>,
    /// 0.0 – 1.0
    pub confidence: f32,
}

impl ClassificationResult {
    /// Labels longer than [`LABEL_CAPACITY`] are truncated; confidence is
    /// clamped into `[0, 1]` (NaN becomes 0).
    pub fn new(label: &str, confidence: f32) -> Self {
        let mut l = String::new();
        for c in label.chars() {
            if l.push(c).is_err() {
                debug!("classify: label {:?} truncated to {:?}", label, l.as_str());
                break;
            }
        }
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            label: l,
            confidence,
        }
    }

    pub fn confidence_percent(&self) -> f32 {
        self.confidence * 100.0
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.1}%", self.label, self.confidence_percent())
    }
}

// ---------------------------------------------------------------------------
// Label mapping
// ---------------------------------------------------------------------------

/// Raw detector output for one bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection<'a> {
    pub class_name: &'a str,
    pub confidence: f32,
}

/// Model classes the station sorts, and the category shown for each.
pub const DEFAULT_LABELS: &[(&str, &str)] = &[
    ("plastic", "PLASTIC"),
    ("paper", "PAPER"),
    ("cardboard", "CARDBOARD"),
    ("organic", "ORGANIC"),
    ("green-glass", "GLASS"),
];

/// Model class → display category.  Classes not in the map are ignored.
#[derive(Debug, Clone, Copy)]
pub struct LabelMap<'a> {
    entries: &'a [(&'a str, &'a str)],
}

impl Default for LabelMap<'static> {
    fn default() -> Self {
        Self {
            entries: DEFAULT_LABELS,
        }
    }
}

impl<'a> LabelMap<'a> {
    pub const fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self { entries }
    }

    pub fn category(&self, class_name: &str) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|(class, _)| *class == class_name)
            .map(|(_, category)| *category)
    }
}

/// Highest-confidence mapped detection strictly above `min_confidence`.
///
/// Ties keep the earlier detection.  Returns `None` when nothing qualifies.
pub fn select_best(
    detections: &[Detection<'_>],
    map: &LabelMap<'_>,
    min_confidence: f32,
) -> Option<ClassificationResult> {
    let mut best: Option<(&str, f32)> = None;
    for d in detections {
        if d.confidence.is_nan() || d.confidence <= min_confidence {
            continue;
        }
        let Some(category) = map.category(d.class_name) else {
            continue;
        };
        if best.is_none_or(|(_, conf)| d.confidence > conf) {
            best = Some((category, d.confidence));
        }
    }
    best.map(|(label, conf)| ClassificationResult::new(label, conf))
}
