use crate::day::{Weekday, weekday_for_token};
use crate::error::ExtractError;
use crate::model::{BoundingBox, Extraction, OcrResult, OcrWord, TimetableEntry};
use crate::options::ExtractOptions;
use crate::subject::{clean_subject, distinct_subjects};
use crate::time_range::{find_time_ranges, has_time_range};
use crate::warning::{ExtractWarning, WarningCode};

/// Day-name word promoted to a header-row candidate. Header lists are
/// always sorted ascending by `x_center`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HeaderEntry {
    day: Weekday,
    bbox: BoundingBox,
    x_center: f32,
}

fn header_entries<'a, I>(day_words: I) -> Vec<HeaderEntry>
where
    I: IntoIterator<Item = &'a OcrWord>,
{
    let mut headers: Vec<HeaderEntry> = day_words
        .into_iter()
        .filter_map(|word| {
            let day = weekday_for_token(&word.text)?;
            Some(HeaderEntry {
                day,
                bbox: word.bbox,
                x_center: word.bbox.x_center(),
            })
        })
        .collect();
    headers.sort_by(|left, right| left.x_center.total_cmp(&right.x_center));
    headers
}

/// Words whose horizontal center falls inside the column and whose top edge
/// sits below the header, sorted top-to-bottom then left-to-right.
fn column_words(words: &[OcrWord], left: f32, right: f32, min_top: f32) -> Vec<&OcrWord> {
    let mut selected: Vec<&OcrWord> = words
        .iter()
        .filter(|word| {
            let center = word.bbox.x_center();
            center >= left && center <= right && word.bbox.y0 >= min_top
        })
        .collect();
    selected.sort_by(|a, b| {
        a.bbox
            .y0
            .total_cmp(&b.bbox.y0)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });
    selected
}

/// Group words into visual rows: a word joins the first row whose most
/// recently added word sits within `tolerance` of its top edge.
pub(crate) fn bucket_rows<'a>(words: &[&'a OcrWord], tolerance: f32) -> Vec<Vec<&'a OcrWord>> {
    let mut rows: Vec<Vec<&OcrWord>> = Vec::new();

    for &word in words {
        if word.text.trim().is_empty() {
            continue;
        }

        let open = rows.iter_mut().find(|row| {
            row.last()
                .is_some_and(|last| (word.bbox.y0 - last.bbox.y0).abs() <= tolerance)
        });
        match open {
            Some(row) => row.push(word),
            None => rows.push(vec![word]),
        }
    }

    rows
}

struct RowSpan {
    x0: f32,
    x1: f32,
    y0: f32,
    y1: f32,
    text: String,
}

fn row_span(row: &[&OcrWord]) -> RowSpan {
    let mut span = RowSpan {
        x0: f32::INFINITY,
        x1: f32::NEG_INFINITY,
        y0: f32::INFINITY,
        y1: f32::NEG_INFINITY,
        text: String::new(),
    };

    for word in row {
        span.x0 = span.x0.min(word.bbox.x0);
        span.x1 = span.x1.max(word.bbox.x1);
        span.y0 = span.y0.min(word.bbox.y0);
        span.y1 = span.y1.max(word.bbox.y1);
    }
    span.text = row
        .iter()
        .map(|word| word.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();
    span
}

/// Reassemble cell text that the recognizer split across two lines: short
/// time-free rows absorb following short rows with matching x-spans.
fn merge_continuation_rows<'a>(
    rows: Vec<Vec<&'a OcrWord>>,
    options: &ExtractOptions,
) -> Result<Vec<Vec<&'a OcrWord>>, ExtractError> {
    let mut merged = Vec::new();
    let mut index = 0;

    while index < rows.len() {
        let mut current = rows[index].clone();
        let mut span = row_span(&current);
        let current_short =
            span.text.len() <= options.merge_max_text_len && !has_time_range(&span.text)?;

        if current_short {
            while let Some(next) = rows.get(index + 1) {
                let next_span = row_span(next);
                let gap = (next_span.y0 - span.y1).abs();
                let intersection = (span.x1.min(next_span.x1) - span.x0.max(next_span.x0)).max(0.0);
                let union = span.x1.max(next_span.x1) - span.x0.min(next_span.x0);
                let overlap_ratio = if union > 0.0 {
                    intersection / union
                } else {
                    0.0
                };
                let next_short = next_span.text.len() <= options.merge_max_text_len
                    && !has_time_range(&next_span.text)?;

                if next_short
                    && gap <= options.row_tolerance_px * 2.0
                    && overlap_ratio >= options.merge_overlap_ratio
                {
                    current.extend(next.iter().copied());
                    span = row_span(&current);
                    index += 1;
                } else {
                    break;
                }
            }
        }

        merged.push(current);
        index += 1;
    }

    Ok(merged)
}

/// Turn merged rows into timetable entries. The time label is hunted across
/// the whole document at the row's height, since the recognizer often drops
/// the time column slightly outside the day column; the subject text stays
/// column-local.
fn emit_rows(
    ocr: &OcrResult,
    rows: &[Vec<&OcrWord>],
    options: &ExtractOptions,
) -> Result<Vec<TimetableEntry>, ExtractError> {
    let mut timetable = Vec::new();
    let mut sno = 1;

    for row in rows {
        let column_text = row
            .iter()
            .map(|word| word.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();
        if column_text.is_empty() {
            continue;
        }

        let span = row_span(row);
        let mut line_words: Vec<&OcrWord> = row.clone();
        for word in &ocr.words {
            let already_in_row = row.iter().any(|member| std::ptr::eq(*member, word));
            if !already_in_row
                && word
                    .bbox
                    .overlaps_vertically(span.y0, span.y1, options.time_search_slack_px)
            {
                line_words.push(word);
            }
        }
        line_words.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
        let full_row_text = line_words
            .iter()
            .map(|word| word.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let matches = find_time_ranges(&full_row_text)?;
        let time = matches.first().map(|m| m.label.clone()).unwrap_or_default();

        let mut subject_text = column_text;
        if let Some(first) = matches.first()
            && let Some(at) = subject_text.find(first.raw.trim_end())
        {
            subject_text.replace_range(at..at + first.raw.trim_end().len(), "");
        }

        if let Some(subject) = clean_subject(subject_text.trim(), false)? {
            timetable.push(TimetableEntry {
                sno,
                subject,
                time,
                status: String::new(),
            });
            sno += 1;
        }
    }

    Ok(timetable)
}

fn rows_between(
    ocr: &OcrResult,
    left: f32,
    right: f32,
    min_top: f32,
    options: &ExtractOptions,
) -> Result<Vec<TimetableEntry>, ExtractError> {
    let words = column_words(&ocr.words, left, right, min_top);
    let rows = bucket_rows(&words, options.row_tolerance_px);
    let rows = merge_continuation_rows(rows, options)?;
    emit_rows(ocr, &rows, options)
}

/// Layout-aware extraction: find the requested day's header, derive its
/// column boundaries from the neighboring headers, and read the cells below.
pub(crate) fn extract_by_column(
    ocr: &OcrResult,
    requested_day: Weekday,
    options: &ExtractOptions,
    warnings: &mut Vec<ExtractWarning>,
) -> Result<Extraction, ExtractError> {
    if ocr.words.is_empty() && ocr.lines.is_empty() {
        return Ok(Extraction::default());
    }

    let day_words: Vec<&OcrWord> = ocr
        .words
        .iter()
        .filter(|word| weekday_for_token(&word.text).is_some())
        .collect();
    if day_words.is_empty() {
        return Ok(Extraction::default());
    }

    let min_y = day_words
        .iter()
        .map(|word| word.bbox.y0)
        .fold(f32::INFINITY, f32::min);
    let heights: Vec<f32> = day_words
        .iter()
        .map(|word| word.bbox.height())
        .filter(|height| *height > 0.0)
        .collect();
    let average_height = if heights.is_empty() {
        20.0
    } else {
        heights.iter().sum::<f32>() / heights.len() as f32
    };
    let band_tolerance = options
        .header_band_min_px
        .max(average_height * options.band_height_factor);

    let band: Vec<&OcrWord> = day_words
        .iter()
        .copied()
        .filter(|word| word.bbox.y0 - min_y <= band_tolerance)
        .collect();
    let mut headers = header_entries(band.iter().copied());
    if headers.is_empty() {
        warnings.push(ExtractWarning::new(
            WarningCode::NoHeaderBand,
            "no coherent header band; considering every day word a header candidate",
        ));
        headers = header_entries(day_words.iter().copied());
    }

    let mut header_index = headers.iter().position(|entry| entry.day == requested_day);
    if header_index.is_none() {
        let topmost = day_words
            .iter()
            .copied()
            .filter(|word| weekday_for_token(&word.text) == Some(requested_day))
            .min_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0));

        if let Some(anchor) = topmost {
            let retry_tolerance = options
                .header_retry_band_min_px
                .max(average_height * options.band_height_factor);
            let local_band: Vec<&OcrWord> = day_words
                .iter()
                .copied()
                .filter(|word| (word.bbox.y0 - anchor.bbox.y0).abs() <= retry_tolerance)
                .collect();
            headers = header_entries(local_band.iter().copied());
            header_index = headers.iter().position(|entry| entry.day == requested_day);
            if header_index.is_some() {
                warnings.push(
                    ExtractWarning::new(
                        WarningCode::HeaderRebuiltFromBody,
                        "requested day sits outside the top header band; rebuilt the band around its first occurrence",
                    )
                    .with_day(requested_day.as_str()),
                );
            }
        }
    }
    let Some(header_index) = header_index else {
        return Ok(Extraction::default());
    };

    let header = headers[header_index];
    let previous = header_index.checked_sub(1).and_then(|i| headers.get(i));
    let next = headers.get(header_index + 1);
    let header_width = header.bbox.width();
    let left = previous.map_or_else(
        || (header.bbox.x0 - header_width * options.boundary_extend_factor).max(0.0),
        |entry| (entry.x_center + header.x_center) / 2.0,
    );
    let right = next.map_or(
        header.bbox.x1 + header_width * options.boundary_extend_factor,
        |entry| (header.x_center + entry.x_center) / 2.0,
    );
    let min_top = header.bbox.y1 + options.below_header_margin_px;

    let mut timetable = rows_between(ocr, left, right, min_top, options)?;

    if timetable.is_empty() {
        let widen = if header_width > 0.0 { header_width } else { 40.0 };
        warnings.push(
            ExtractWarning::new(
                WarningCode::ColumnWidened,
                "no rows inside the computed column; retrying with widened boundaries",
            )
            .with_day(requested_day.as_str()),
        );
        timetable = rows_between(ocr, (left - widen).max(0.0), right + widen, min_top, options)?;
    }

    let subjects = distinct_subjects(&timetable);
    Ok(Extraction {
        timetable,
        subjects,
        found_header: true,
    })
}
