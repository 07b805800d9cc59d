use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::model::OcrResult;

/// Canonical weekday. The derived order follows the calendar week starting
/// Monday, which fixes the ordering of detected-day lists.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    /// Accepts only the canonical lower-case names.
    #[must_use]
    pub fn from_canonical(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.as_str() == token)
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized day tokens after lower-casing and letter-stripping.
pub(crate) const DAY_TOKENS: [(&str, Weekday); 17] = [
    ("mon", Weekday::Monday),
    ("monday", Weekday::Monday),
    ("tue", Weekday::Tuesday),
    ("tues", Weekday::Tuesday),
    ("tuesday", Weekday::Tuesday),
    ("wed", Weekday::Wednesday),
    ("wednesday", Weekday::Wednesday),
    ("thu", Weekday::Thursday),
    ("thur", Weekday::Thursday),
    ("thurs", Weekday::Thursday),
    ("thursday", Weekday::Thursday),
    ("fri", Weekday::Friday),
    ("friday", Weekday::Friday),
    ("sat", Weekday::Saturday),
    ("saturday", Weekday::Saturday),
    ("sun", Weekday::Sunday),
    ("sunday", Weekday::Sunday),
];

/// Per-day patterns over lower-cased text, tolerant of the substitutions a
/// recognizer commonly makes (`0` for `o`, `3` for `e`, `1`/`l` for `i`,
/// `@` for `a`, `v` for `u`), plus word-boundary abbreviations.
const FUZZY_DAY_PATTERNS: [(&str, Weekday); 17] = [
    (r"m[o0]nday|m[o0]nd[a@]y|m[o0][nm]day", Weekday::Monday),
    (r"tu[e3]sday|tu[e3]sd[a@]y|t[uv][e3]sday", Weekday::Tuesday),
    (
        r"w[e3]dn[e3]sday|w[e3]dn[e3]sd[a@]y|wedn[e3]sday",
        Weekday::Wednesday,
    ),
    (r"thursday|thursd[a@]y|th[uv]rsday", Weekday::Thursday),
    (r"friday|frid[a@]y|fr[i1l]day|fr[i1]d[a@]y", Weekday::Friday),
    (r"saturday|saturd[a@]y|s[a@]turday", Weekday::Saturday),
    (r"sunday|sund[a@]y|s[uv]nday", Weekday::Sunday),
    (r"\bm[o0]n\b", Weekday::Monday),
    (r"\btu[e3]\b", Weekday::Tuesday),
    (r"\btu[e3]s\b", Weekday::Tuesday),
    (r"\bw[e3]d\b", Weekday::Wednesday),
    (r"\bth[uv]\b", Weekday::Thursday),
    (r"\bthur\b", Weekday::Thursday),
    (r"\bthurs\b", Weekday::Thursday),
    (r"\bfr[i1l]\b", Weekday::Friday),
    (r"\bs[a@]t\b", Weekday::Saturday),
    (r"\bs[uv]n\b", Weekday::Sunday),
];

const DATE_PATTERNS: [&str; 3] = [
    r"\b\d{4}-\d{2}-\d{2}\b",
    r"\b\d{2}[/.\-]\d{2}[/.\-]\d{4}\b",
    r"\b\d{2}[/.\-]\d{2}[/.\-]\d{2}\b",
];

/// Lower-case, strip non-letters, expand known abbreviations. Unknown tokens
/// pass through stripped rather than failing.
#[must_use]
pub fn normalize_day(token: &str) -> String {
    let stripped: String = token
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect();

    match DAY_TOKENS.iter().find(|(known, _)| *known == stripped) {
        Some((_, day)) => day.as_str().to_string(),
        None => stripped,
    }
}

pub(crate) fn weekday_for_token(token: &str) -> Option<Weekday> {
    Weekday::from_canonical(&normalize_day(token))
}

/// Every canonical day present in the document: an exact pass over the word
/// list unioned with a fuzzy pass over the full text. Calendar order,
/// deduplicated, regardless of discovery order.
pub fn detect_days(ocr: &OcrResult) -> Result<Vec<Weekday>, ExtractError> {
    let mut found = BTreeSet::new();

    for word in &ocr.words {
        if let Some(day) = weekday_for_token(&word.text) {
            found.insert(day);
        }
    }

    let lower = ocr.text.to_lowercase();
    for (pattern, day) in FUZZY_DAY_PATTERNS {
        let matcher =
            Regex::new(pattern).map_err(|error| ExtractError::Pattern(error.to_string()))?;
        if matcher.is_match(&lower) {
            found.insert(day);
        }
    }

    Ok(found.into_iter().collect())
}

/// First date-like substring in the text. The earliest match wins across all
/// three patterns; pattern order breaks offset ties.
pub fn detect_date(text: &str) -> Result<Option<String>, ExtractError> {
    let mut best: Option<(usize, String)> = None;

    for pattern in DATE_PATTERNS {
        let matcher =
            Regex::new(pattern).map_err(|error| ExtractError::Pattern(error.to_string()))?;
        if let Some(found) = matcher.find(text)
            && best
                .as_ref()
                .is_none_or(|(start, _)| found.start() < *start)
        {
            best = Some((found.start(), found.as_str().to_string()));
        }
    }

    Ok(best.map(|(_, date)| date))
}
