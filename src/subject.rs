use std::collections::HashSet;

use regex::Regex;

use crate::day::DAY_TOKENS;
use crate::error::ExtractError;
use crate::model::TimetableEntry;

const NOISE_WORDS: [&str; 8] = [
    "period", "time", "duration", "day", "date", "am", "pm", "name",
];

fn pattern(source: &str) -> Result<Regex, ExtractError> {
    Regex::new(source).map_err(|error| ExtractError::Pattern(error.to_string()))
}

fn has_letter_run(text: &str, min_len: usize) -> bool {
    let mut run = 0;
    for ch in text.chars() {
        if ch.is_ascii_alphabetic() {
            run += 1;
            if run >= min_len {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Scrub a candidate subject string; `None` means the remainder is noise and
/// no entry should be emitted. `truncate_at_separator` cuts at the first
/// tab/comma/semicolon/hyphen/pipe before the final character sweep, which
/// only the text-only extractor asks for.
pub(crate) fn clean_subject(
    raw: &str,
    truncate_at_separator: bool,
) -> Result<Option<String>, ExtractError> {
    let room = pattern(r"\b\d{3,4}\b")?;
    let parenthetical = pattern(r"\([^)]*\)")?;
    let ampm = pattern(r"\b(?i:a\.?m\.?|p\.?m\.?)\b")?;
    let pure_ampm = pattern(r"^(?i:am|pm|ampm|a m|p m|am pm|pm am)$")?;

    let mut subject = room.replace_all(raw, " ").into_owned();
    subject = parenthetical.replace_all(&subject, " ").into_owned();
    if truncate_at_separator {
        subject = subject
            .split(['\t', ',', ';', '-', '|'])
            .next()
            .unwrap_or_default()
            .to_string();
    }
    subject = ampm.replace_all(&subject, " ").into_owned();
    subject = subject
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphabetic() || ch.is_whitespace() || matches!(ch, '+' | '&') {
                ch
            } else {
                ' '
            }
        })
        .collect();
    let subject = subject.split_whitespace().collect::<Vec<_>>().join(" ");

    if !has_letter_run(&subject, 3) || subject.len() < 3 {
        return Ok(None);
    }

    let lower = subject.to_lowercase();
    if NOISE_WORDS.contains(&lower.as_str())
        || DAY_TOKENS.iter().any(|(token, _)| *token == lower)
    {
        return Ok(None);
    }

    let squeezed: String = lower.chars().filter(|ch| !ch.is_whitespace()).collect();
    if pure_ampm.is_match(&squeezed) {
        return Ok(None);
    }

    Ok(Some(subject))
}

/// Distinct subject strings in first-seen order.
pub(crate) fn distinct_subjects(timetable: &[TimetableEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut subjects = Vec::new();
    for entry in timetable {
        if seen.insert(entry.subject.as_str()) {
            subjects.push(entry.subject.clone());
        }
    }
    subjects
}

#[cfg(test)]
mod tests {
    use super::{clean_subject, distinct_subjects};
    use crate::model::TimetableEntry;

    fn clean(raw: &str) -> Option<String> {
        clean_subject(raw, false).expect("cleaner should not fail")
    }

    #[test]
    fn accepts_real_subject_names() {
        assert_eq!(clean("Mathematics").as_deref(), Some("Mathematics"));
        assert_eq!(clean("Social Studies").as_deref(), Some("Social Studies"));
        assert_eq!(clean("Arts & Crafts").as_deref(), Some("Arts & Crafts"));
    }

    #[test]
    fn rejects_noise_tokens() {
        assert_eq!(clean("AM"), None);
        assert_eq!(clean("101"), None);
        assert_eq!(clean("Monday"), None);
        assert_eq!(clean("Tue"), None);
        assert_eq!(clean("Period"), None);
        assert_eq!(clean("p.m."), None);
    }

    #[test]
    fn strips_rooms_parentheticals_and_markers() {
        assert_eq!(clean("Physics (Lab) 204").as_deref(), Some("Physics"));
        assert_eq!(clean("9 Chemistry a.m.").as_deref(), Some("Chemistry"));
    }

    #[test]
    fn truncation_applies_only_when_requested() {
        let truncated = clean_subject("Maths, double period", true).expect("cleaner should not fail");
        assert_eq!(truncated.as_deref(), Some("Maths"));

        assert_eq!(
            clean("Maths, double period").as_deref(),
            Some("Maths double period")
        );
    }

    #[test]
    fn rejects_short_remainders() {
        assert_eq!(clean("PE"), None);
        assert_eq!(clean("12:3"), None);
    }

    #[test]
    fn collects_distinct_subjects_in_first_seen_order() {
        let entries = ["Maths", "Arts", "Maths"]
            .iter()
            .enumerate()
            .map(|(index, subject)| TimetableEntry {
                sno: u32::try_from(index).unwrap_or(0) + 1,
                subject: (*subject).to_string(),
                time: String::new(),
                status: String::new(),
            })
            .collect::<Vec<_>>();

        assert_eq!(distinct_subjects(&entries), vec!["Maths", "Arts"]);
    }
}
