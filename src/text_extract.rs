use crate::day::Weekday;
use crate::error::ExtractError;
use crate::model::{Extraction, TimetableEntry};
use crate::subject::{clean_subject, distinct_subjects};
use crate::time_range::find_time_ranges;

/// Geometry-free last resort: scan raw text lines for time ranges. Lines
/// naming a different day are skipped so an unlabeled grid cannot bleed
/// neighboring columns into the result.
pub(crate) fn extract_from_text(
    text: &str,
    requested_token: &str,
) -> Result<Extraction, ExtractError> {
    let mut timetable = Vec::new();
    let mut sno = 1;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let lower = line.to_ascii_lowercase();
        let mentions_other_day = Weekday::ALL
            .iter()
            .any(|day| day.as_str() != requested_token && lower.contains(day.as_str()));
        if mentions_other_day {
            continue;
        }

        let matches = find_time_ranges(line)?;
        let Some(first) = matches.first() else {
            continue;
        };

        let mut remainder = line.to_string();
        remainder.replace_range(first.start..first.end, "");
        if let Some(subject) = clean_subject(remainder.trim(), true)? {
            timetable.push(TimetableEntry {
                sno,
                subject,
                time: first.label.clone(),
                status: String::new(),
            });
            sno += 1;
        }
    }

    let subjects = distinct_subjects(&timetable);
    Ok(Extraction {
        timetable,
        subjects,
        found_header: false,
    })
}

#[cfg(test)]
mod tests {
    use super::extract_from_text;

    #[test]
    fn emits_one_entry_per_time_bearing_line() {
        let text = "Saturday classes\n10:00-11:00 Chemistry 204\nlunch break\n12:00-13:00 Algebra";
        let extraction =
            extract_from_text(text, "saturday").expect("extraction should succeed");

        assert_eq!(extraction.timetable.len(), 2);
        assert_eq!(extraction.timetable[0].subject, "Chemistry");
        assert_eq!(extraction.timetable[0].time, "10:00 - 11:00");
        assert_eq!(extraction.timetable[1].subject, "Algebra");
        assert_eq!(extraction.timetable[1].time, "12:00 - 13:00");
    }

    #[test]
    fn skips_lines_naming_a_different_day() {
        let text = "monday 9:00-10:00 History\n9:00-10:00 Physics";
        let extraction = extract_from_text(text, "tuesday").expect("extraction should succeed");

        assert_eq!(extraction.timetable.len(), 1);
        assert_eq!(extraction.timetable[0].subject, "Physics");
    }

    #[test]
    fn returns_empty_without_time_ranges() {
        let extraction = extract_from_text("saturday sports meet", "saturday")
            .expect("extraction should succeed");
        assert!(extraction.timetable.is_empty());
    }
}
