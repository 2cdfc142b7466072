//! Append-only CSV export of grade records.
//!
//! The header row is written exactly once, when the file is first created.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::error::PersistenceError;
use crate::record::{GradeRecord, Subject};

/// One CSV row, in the fixed export column order.
#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Student Name")]
    student_name: &'a str,
    #[serde(rename = "English")]
    english: f64,
    #[serde(rename = "Mathematics")]
    mathematics: f64,
    #[serde(rename = "Science")]
    science: f64,
    #[serde(rename = "Hindi")]
    hindi: f64,
    #[serde(rename = "SST")]
    sst: f64,
    #[serde(rename = "Total Marks")]
    total: f64,
    #[serde(rename = "Average Marks")]
    average: f64,
    #[serde(rename = "Final Grade")]
    grade: &'a str,
}

impl<'a> From<&'a GradeRecord> for ExportRow<'a> {
    fn from(record: &'a GradeRecord) -> Self {
        ExportRow {
            student_name: &record.student_name,
            english: record.mark(Subject::English),
            mathematics: record.mark(Subject::Mathematics),
            science: record.mark(Subject::Science),
            hindi: record.mark(Subject::Hindi),
            sst: record.mark(Subject::Sst),
            total: record.total,
            average: record.average,
            grade: record.grade.as_str(),
        }
    }
}

/// Append-only CSV artifact. Writes are serialized with a scoped lock so
/// concurrent callers cannot interleave partial rows.
pub struct CsvExport {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvExport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvExport {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a [`GradeRecord`] as one row.
    ///
    /// Creates the file with the header row if it does not already exist;
    /// an existing file is left untouched apart from the appended row.
    pub fn append(&self, record: &GradeRecord) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let file_exists = self.path.exists();
        debug!(path = %self.path.display(), file_exists, "Appending CSV record");

        let file = OpenOptions::new().append(true).create(true).open(&self.path)?;

        let mut writer = WriterBuilder::new()
            .has_headers(!file_exists) // IMPORTANT when appending
            .from_writer(file);

        writer.serialize(ExportRow::from(record))?;
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawMarks;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_record() -> GradeRecord {
        let raw = RawMarks {
            english: "95".to_string(),
            mathematics: "88".to_string(),
            science: "76".to_string(),
            hindi: "60".to_string(),
            sst: "45".to_string(),
        };
        GradeRecord::build("Asha", &raw).unwrap()
    }

    #[test]
    fn test_append_creates_file_with_expected_header() {
        let path = temp_path("gradebook_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        let export = CsvExport::new(&path);
        export.append(&sample_record()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(
            header,
            "Student Name,English,Mathematics,Science,Hindi,SST,Total Marks,Average Marks,Final Grade"
        );

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_writes_header_once() {
        let path = temp_path("gradebook_test_header.csv");
        let _ = fs::remove_file(&path);

        let export = CsvExport::new(&path);
        export.append(&sample_record()).unwrap();
        export.append(&sample_record()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content
            .lines()
            .filter(|l| l.contains("Student Name"))
            .count();
        assert_eq!(header_count, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_twice_keeps_both_rows() {
        let path = temp_path("gradebook_test_rows.csv");
        let _ = fs::remove_file(&path);

        let export = CsvExport::new(&path);
        export.append(&sample_record()).unwrap();
        let after_first = fs::read_to_string(&path).unwrap();
        export.append(&sample_record()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // 1 header + 2 data rows
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        // append-only: the earlier content is a prefix of the later content
        assert!(content.starts_with(&after_first));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_row_contains_marks_and_grade() {
        let path = temp_path("gradebook_test_values.csv");
        let _ = fs::remove_file(&path);

        let export = CsvExport::new(&path);
        export.append(&sample_record()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert_eq!(row, "Asha,95.0,88.0,76.0,60.0,45.0,364.0,72.8,B");

        fs::remove_file(&path).unwrap();
    }
}
