use crate::column_extract::bucket_rows;
use crate::error::ExtractError;
use crate::model::{Extraction, OcrResult, OcrWord, TimetableEntry};
use crate::options::ExtractOptions;
use crate::subject::{clean_subject, distinct_subjects};
use crate::time_range::find_time_ranges;

/// Row-oriented fallback for sheets that list one day per line instead of
/// one day per column. Only the first row mentioning the requested day is
/// read; its text is split into one entry per time range.
pub(crate) fn extract_by_row(
    ocr: &OcrResult,
    requested_token: &str,
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    if ocr.words.is_empty() || requested_token.is_empty() {
        return Ok(Extraction::default());
    }

    let mut sorted: Vec<&OcrWord> = ocr.words.iter().collect();
    sorted.sort_by(|a, b| {
        a.bbox
            .y0
            .total_cmp(&b.bbox.y0)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });
    let rows = bucket_rows(&sorted, options.row_bucket_tolerance_px);

    let mut timetable = Vec::new();
    let mut sno = 1;

    for row in rows {
        let line_text = row
            .iter()
            .map(|word| word.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        if !line_text.to_ascii_lowercase().contains(requested_token) {
            continue;
        }

        let matches = find_time_ranges(&line_text)?;
        if matches.is_empty() {
            // No explicit times: the whole row minus the day token is one
            // subject block.
            let mut block = line_text.clone();
            if let Some(at) = block.to_ascii_lowercase().find(requested_token) {
                block.replace_range(at..at + requested_token.len(), " ");
            }
            if let Some(subject) = clean_subject(block.trim(), false)? {
                timetable.push(TimetableEntry {
                    sno,
                    subject,
                    time: String::new(),
                    status: String::new(),
                });
            }
        } else {
            for (index, found) in matches.iter().enumerate() {
                let segment_end = matches
                    .get(index + 1)
                    .map_or(line_text.len(), |next| next.start);
                let segment = line_text[found.end..segment_end].trim();
                if let Some(subject) = clean_subject(segment, false)? {
                    timetable.push(TimetableEntry {
                        sno,
                        subject,
                        time: found.label.clone(),
                        status: String::new(),
                    });
                    sno += 1;
                }
            }
        }

        // Later rows mentioning the same day are other cells of the grid,
        // not continuations.
        break;
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
    use super::extract_by_row;
    use crate::model::{BoundingBox, OcrResult, OcrWord};
    use crate::options::ExtractOptions;

    fn word(text: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> OcrWord {
        OcrWord {
            text: text.to_string(),
            bbox: BoundingBox { x0, y0, x1, y1 },
        }
    }

    fn row_fixture() -> OcrResult {
        OcrResult {
            text: String::new(),
            words: vec![
                word("Monday", 0.0, 40.0, 60.0, 58.0),
                word("9:00-10:00", 70.0, 40.0, 140.0, 58.0),
                word("Maths", 150.0, 41.0, 200.0, 59.0),
                word("10:00-11:00", 210.0, 40.0, 290.0, 58.0),
                word("English", 300.0, 41.0, 360.0, 59.0),
                word("Tuesday", 0.0, 90.0, 60.0, 108.0),
                word("Arts", 70.0, 90.0, 110.0, 108.0),
            ],
            lines: Vec::new(),
        }
    }

    #[test]
    fn splits_matching_row_at_time_ranges() {
        let extraction = extract_by_row(&row_fixture(), "monday", &ExtractOptions::default())
            .expect("extraction should succeed");

        assert_eq!(extraction.timetable.len(), 2);
        assert_eq!(extraction.timetable[0].subject, "Maths");
        assert_eq!(extraction.timetable[0].time, "9:00 - 10:00");
        assert_eq!(extraction.timetable[1].subject, "English");
        assert_eq!(extraction.timetable[1].time, "10:00 - 11:00");
        assert_eq!(extraction.subjects, vec!["Maths", "English"]);
    }

    #[test]
    fn treats_timeless_row_as_single_subject_block() {
        let extraction = extract_by_row(&row_fixture(), "tuesday", &ExtractOptions::default())
            .expect("extraction should succeed");

        assert_eq!(extraction.timetable.len(), 1);
        assert_eq!(extraction.timetable[0].subject, "Arts");
        assert_eq!(extraction.timetable[0].time, "");
    }

    #[test]
    fn returns_empty_when_no_row_mentions_the_day() {
        let extraction = extract_by_row(&row_fixture(), "friday", &ExtractOptions::default())
            .expect("extraction should succeed");
        assert!(extraction.timetable.is_empty());
    }
}
