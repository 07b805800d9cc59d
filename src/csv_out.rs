use std::path::Path;

use csv::WriterBuilder;

use crate::error::ExtractError;
use crate::model::TimetableEntry;

const CSV_HEADERS: [&str; 4] = ["sno", "subject", "time", "status"];

fn entry_record(entry: &TimetableEntry) -> [String; 4] {
    [
        entry.sno.to_string(),
        entry.subject.clone(),
        entry.time.clone(),
        entry.status.clone(),
    ]
}

pub fn write_timetable_csv(
    path: &Path,
    timetable: &[TimetableEntry],
    delimiter: u8,
) -> Result<(), ExtractError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    writer.write_record(CSV_HEADERS)?;
    for entry in timetable {
        writer.write_record(entry_record(entry))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn timetable_csv_string(
    timetable: &[TimetableEntry],
    delimiter: u8,
) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::<u8>::new());
    writer.write_record(CSV_HEADERS)?;
    for entry in timetable {
        writer.write_record(entry_record(entry))?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractError::Csv(error.into_error().into()))?;
    String::from_utf8(bytes)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}

#[cfg(test)]
mod tests {
    use super::timetable_csv_string;
    use crate::model::TimetableEntry;

    #[test]
    fn renders_header_and_rows() {
        let timetable = vec![TimetableEntry {
            sno: 1,
            subject: "Physics".to_string(),
            time: "9:00 - 10:00".to_string(),
            status: String::new(),
        }];

        let csv = timetable_csv_string(&timetable, b',').expect("csv should render");
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("sno,subject,time,status"));
        assert_eq!(lines.next(), Some("1,Physics,9:00 - 10:00,"));
    }
}
