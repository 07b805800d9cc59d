use timetable_extract::{BoundingBox, OcrLine, OcrResult, OcrWord};

/// Build a synthetic recognizer result from `(text, x0, y0, x1, y1)` word
/// tuples plus the full text the recognizer would report for the page.
pub fn ocr_result(text: &str, words: &[(&str, f32, f32, f32, f32)]) -> OcrResult {
    OcrResult {
        text: text.to_string(),
        words: words
            .iter()
            .map(|(word, x0, y0, x1, y1)| OcrWord {
                text: (*word).to_string(),
                bbox: BoundingBox {
                    x0: *x0,
                    y0: *y0,
                    x1: *x1,
                    y1: *y1,
                },
            })
            .collect(),
        lines: text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| OcrLine {
                text: line.to_string(),
            })
            .collect(),
    }
}

/// A three-column weekly grid with one class under each day.
pub fn weekly_grid() -> OcrResult {
    ocr_result(
        "Monday Tuesday Wednesday\n9:00-10:00 Physics\nHistory\nArts",
        &[
            ("Monday", 100.0, 50.0, 180.0, 70.0),
            ("Tuesday", 300.0, 50.0, 380.0, 70.0),
            ("Wednesday", 500.0, 50.0, 580.0, 70.0),
            ("History", 105.0, 121.0, 170.0, 139.0),
            ("9:00-10:00", 285.0, 120.0, 355.0, 138.0),
            ("Physics", 360.0, 121.0, 410.0, 139.0),
            ("Arts", 510.0, 121.0, 560.0, 139.0),
        ],
    )
}
