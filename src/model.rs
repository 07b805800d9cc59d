use serde::{Deserialize, Serialize};

use crate::day::Weekday;
use crate::error::ExtractError;
use crate::warning::ExtractWarning;

/// Axis-aligned word box in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    #[must_use]
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    #[must_use]
    pub fn x_center(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }

    pub(crate) fn overlaps_vertically(&self, y0: f32, y1: f32, slack: f32) -> bool {
        let top = self.y0.max(y0 - slack);
        let bottom = self.y1.min(y1 + slack);
        bottom >= top
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrWord {
    pub text: String,
    pub bbox: BoundingBox,
}

/// Line grouping reported by the recognizer. The geometry pipeline only
/// checks for presence; the text-only fallback reads [`OcrResult::text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrLine {
    pub text: String,
}

/// Recognizer output for one image: full text plus word boxes in no
/// guaranteed order. Never mutated by the extraction pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub words: Vec<OcrWord>,
    #[serde(default)]
    pub lines: Vec<OcrLine>,
}

impl OcrResult {
    /// Parse a recognizer dump serialized as JSON.
    pub fn from_json(raw: &str) -> Result<Self, ExtractError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub sno: u32,
    pub subject: String,
    pub time: String,
    /// Reserved for the caller's attendance workflow; always empty here.
    pub status: String,
}

/// Strategy that produced the returned timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    Column,
    Row,
    Text,
}

/// Output shape shared by the three extraction strategies.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Extraction {
    pub timetable: Vec<TimetableEntry>,
    pub subjects: Vec<String>,
    pub found_header: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub timetable: Vec<TimetableEntry>,
    /// Distinct subject strings, first-seen order.
    pub subjects: Vec<String>,
    pub holiday: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Canonical days found anywhere in the document, calendar order.
    pub detected_days: Vec<Weekday>,
    pub detected_days_count: usize,
    pub detected_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ExtractionMode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ExtractWarning>,
}
