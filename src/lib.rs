mod column_extract;
mod csv_out;
mod day;
mod error;
mod model;
mod options;
mod row_extract;
mod subject;
mod text_extract;
mod time_range;
mod warning;

pub use csv_out::{timetable_csv_string, write_timetable_csv};
pub use day::{Weekday, detect_date, detect_days, normalize_day};
pub use error::ExtractError;
pub use model::{
    BoundingBox, ExtractionMode, ExtractionResult, OcrLine, OcrResult, OcrWord, TimetableEntry,
};
pub use options::ExtractOptions;
pub use warning::{ExtractWarning, WarningCode};

use model::Extraction;

/// Reconstruct one day's timetable from a recognizer pass over a photographed
/// weekly schedule, or decide that the day is a holiday.
///
/// `Err` is reserved for invalid options; every input-shaped failure surfaces
/// inside the returned [`ExtractionResult`] instead, so a noisy photo can
/// never take the caller down.
pub fn extract_timetable(
    ocr: &OcrResult,
    requested_day: &str,
    options: &ExtractOptions,
) -> Result<ExtractionResult, ExtractError> {
    options.validate()?;

    let requested_token = normalize_day(requested_day.trim());
    Ok(
        match run_extraction(ocr, requested_day, &requested_token, options) {
            Ok(result) => result,
            Err(error) => fault_result(&error),
        },
    )
}

fn run_extraction(
    ocr: &OcrResult,
    raw_day: &str,
    requested_token: &str,
    options: &ExtractOptions,
) -> Result<ExtractionResult, ExtractError> {
    let mut warnings = Vec::new();

    let detected_days = detect_days(ocr)?;
    let detected_date = detect_date(&ocr.text)?;
    let requested = Weekday::from_canonical(requested_token);
    tracing::debug!(
        requested = requested_token,
        detected = detected_days.len(),
        "day detection finished"
    );

    let column = match requested {
        Some(day) => column_extract::extract_by_column(ocr, day, options, &mut warnings)?,
        None => Extraction::default(),
    };
    let found_header = column.found_header;

    let mut timetable = column.timetable;
    let mut subjects = column.subjects;
    let mut mode = (!timetable.is_empty()).then_some(ExtractionMode::Column);

    if !requested_token.is_empty() && timetable.is_empty() {
        let row = row_extract::extract_by_row(ocr, requested_token, options)?;
        if !row.timetable.is_empty() {
            mode = Some(ExtractionMode::Row);
            timetable = row.timetable;
            subjects = row.subjects;
        }
    }

    let requested_detected = requested.is_some_and(|day| detected_days.contains(&day));

    if !requested_token.is_empty() && timetable.is_empty() && requested_detected {
        let text = text_extract::extract_from_text(&ocr.text, requested_token)?;
        if !text.timetable.is_empty() {
            mode = Some(ExtractionMode::Text);
            timetable = text.timetable;
            subjects = text.subjects;
        }
    }

    // Holiday rules, first match wins. The last guard is subsumed by the
    // first two for every known input class but stays part of the documented
    // policy order.
    if !requested_token.is_empty() && !requested_detected {
        let listed = detected_days
            .iter()
            .map(|day| day.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Ok(holiday_result(
            format!("No classes for {raw_day}. Detected days: {listed}"),
            detected_days,
            detected_date,
            warnings,
        ));
    }
    if !requested_token.is_empty() && timetable.is_empty() && !requested_detected {
        return Ok(holiday_result(
            format!("No classes for {raw_day} in uploaded timetable"),
            detected_days,
            detected_date,
            warnings,
        ));
    }
    if !requested_token.is_empty() && !found_header && !requested_detected {
        return Ok(holiday_result(
            format!("No classes for {raw_day} in uploaded timetable"),
            detected_days,
            detected_date,
            warnings,
        ));
    }

    if found_header && timetable.is_empty() {
        warnings.push(
            ExtractWarning::new(
                WarningCode::NoRowsExtracted,
                "header row located but no timetable rows survived cleaning",
            )
            .with_day(requested_token)
            .with_row_count(timetable.len()),
        );
    }
    tracing::debug!(
        rows = timetable.len(),
        mode = ?mode,
        "timetable extraction completed"
    );

    let detected_days_count = detected_days.len();
    Ok(ExtractionResult {
        timetable,
        subjects,
        holiday: false,
        message: None,
        detected_days,
        detected_days_count,
        detected_date,
        mode,
        warnings,
    })
}

fn holiday_result(
    message: String,
    detected_days: Vec<Weekday>,
    detected_date: Option<String>,
    warnings: Vec<ExtractWarning>,
) -> ExtractionResult {
    let detected_days_count = detected_days.len();
    ExtractionResult {
        timetable: Vec::new(),
        subjects: Vec::new(),
        holiday: true,
        message: Some(message),
        detected_days,
        detected_days_count,
        detected_date,
        mode: None,
        warnings,
    }
}

fn fault_result(error: &ExtractError) -> ExtractionResult {
    tracing::warn!(%error, "extraction fault absorbed at orchestrator boundary");
    ExtractionResult {
        timetable: Vec::new(),
        subjects: Vec::new(),
        holiday: true,
        message: Some(error.to_string()),
        detected_days: Vec::new(),
        detected_days_count: 0,
        detected_date: None,
        mode: None,
        warnings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{ExtractOptions, ExtractionResult, OcrResult, extract_timetable};
    use crate::model::{BoundingBox, OcrWord};

    fn days_only(names: &[&str]) -> OcrResult {
        let words = names
            .iter()
            .enumerate()
            .map(|(index, name)| OcrWord {
                text: (*name).to_string(),
                bbox: BoundingBox {
                    x0: index as f32 * 100.0,
                    y0: 50.0,
                    x1: index as f32 * 100.0 + 80.0,
                    y1: 70.0,
                },
            })
            .collect::<Vec<_>>();
        OcrResult {
            text: names.join(" "),
            words,
            lines: Vec::new(),
        }
    }

    fn extract(ocr: &OcrResult, day: &str) -> ExtractionResult {
        extract_timetable(ocr, day, &ExtractOptions::default())
            .expect("default options should validate")
    }

    #[test]
    fn missing_day_is_a_holiday_citing_detected_days() {
        let result = extract(&days_only(&["Monday", "Tuesday"]), "friday");

        assert!(result.holiday);
        assert!(result.timetable.is_empty());
        let message = result.message.expect("holiday should carry a message");
        assert!(message.contains("friday"));
        assert!(message.contains("monday, tuesday"));
    }

    #[test]
    fn detected_but_unparseable_day_is_not_a_holiday() {
        let result = extract(&days_only(&["Monday", "Tuesday"]), "tuesday");

        assert!(!result.holiday);
        assert!(result.timetable.is_empty());
        assert_eq!(result.mode, None);
    }

    #[test]
    fn empty_requested_day_reports_detections_without_holiday() {
        let result = extract(&days_only(&["Wednesday"]), "");

        assert!(!result.holiday);
        assert!(result.timetable.is_empty());
        assert_eq!(result.detected_days_count, 1);
    }

    #[test]
    fn invalid_options_are_rejected_up_front() {
        let options = ExtractOptions {
            row_tolerance_px: -1.0,
            ..ExtractOptions::default()
        };
        let error = extract_timetable(&days_only(&["Monday"]), "monday", &options)
            .expect_err("negative tolerance should fail validation");
        assert!(error.to_string().contains("row_tolerance_px"));
    }
}
