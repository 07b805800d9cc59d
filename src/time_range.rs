use regex::Regex;

use crate::error::ExtractError;

/// One recognized time span, with byte offsets into the scanned text so
/// callers can split around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TimeMatch {
    pub start: usize,
    pub end: usize,
    pub raw: String,
    pub label: String,
}

const TIME_RANGE_PATTERN: &str = r"(?i)(\d{1,2})[:.](\d{2})\s*(?:am|pm|a\.?m\.?|p\.?m\.?)?\s*[-–—]\s*(\d{1,2})[:.](\d{2})\s*(?:am|pm|a\.?m\.?|p\.?m\.?)?";

pub(crate) fn time_range_regex() -> Result<Regex, ExtractError> {
    Regex::new(TIME_RANGE_PATTERN).map_err(|error| ExtractError::Pattern(error.to_string()))
}

fn strip_leading_zeros(digits: &str) -> String {
    match digits.parse::<u32>() {
        Ok(hour) => hour.to_string(),
        Err(_) => digits.to_string(),
    }
}

/// All non-overlapping time ranges in `text`, left to right. Hours lose
/// leading zeros; minutes and any am/pm hints pass through untouched (no
/// 24-hour conversion).
pub(crate) fn find_time_ranges(text: &str) -> Result<Vec<TimeMatch>, ExtractError> {
    let matcher = time_range_regex()?;
    let mut matches = Vec::new();

    for captures in matcher.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };

        let label = format!(
            "{}:{} - {}:{}",
            strip_leading_zeros(&captures[1]),
            &captures[2],
            strip_leading_zeros(&captures[3]),
            &captures[4],
        );

        matches.push(TimeMatch {
            start: whole.start(),
            end: whole.end(),
            raw: whole.as_str().to_string(),
            label,
        });
    }

    Ok(matches)
}

pub(crate) fn has_time_range(text: &str) -> Result<bool, ExtractError> {
    Ok(time_range_regex()?.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::{find_time_ranges, has_time_range};

    #[test]
    fn finds_single_range_in_noisy_text() {
        let matches = find_time_ranges("Class 9:00-10:00 Room").expect("scan should succeed");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].label, "9:00 - 10:00");
        assert_eq!(matches[0].raw.trim_end(), "9:00-10:00");
    }

    #[test]
    fn accepts_dot_separator_and_ampm_suffixes() {
        let matches = find_time_ranges("9.00am–10.00pm").expect("scan should succeed");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].label, "9:00 - 10:00");
    }

    #[test]
    fn drops_leading_zero_from_hours_only() {
        let matches = find_time_ranges("09:05 AM - 10:15 P.M.").expect("scan should succeed");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].label, "9:05 - 10:15");
    }

    #[test]
    fn reports_matches_left_to_right_with_offsets() {
        let text = "8:00-9:00 Maths 10:00-11:00 Arts";
        let matches = find_time_ranges(text).expect("scan should succeed");
        assert_eq!(matches.len(), 2);
        assert!(matches[0].start < matches[1].start);
        assert_eq!(text[matches[0].start..matches[0].end].trim_end(), "8:00-9:00");
        assert_eq!(
            text[matches[1].start..matches[1].end].trim_end(),
            "10:00-11:00"
        );
    }

    #[test]
    fn ignores_bare_times_without_a_range() {
        assert!(!has_time_range("meet at 9:00 sharp").expect("scan should succeed"));
        assert!(!has_time_range("no digits at all").expect("scan should succeed"));
    }
}
