//! Grade records: validated, immutable calculation results.

use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::ValidationError;
use crate::grade::{Grade, classify};

/// Timestamp layout used across the ledger and the report.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const SUBJECT_COUNT: usize = 5;

/// The five fixed subjects, in ledger column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Subject {
    English,
    Mathematics,
    Science,
    Hindi,
    #[serde(rename = "SST")]
    Sst,
}

impl Subject {
    pub const ALL: [Subject; SUBJECT_COUNT] = [
        Subject::English,
        Subject::Mathematics,
        Subject::Science,
        Subject::Hindi,
        Subject::Sst,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Subject::English => "English",
            Subject::Mathematics => "Mathematics",
            Subject::Science => "Science",
            Subject::Hindi => "Hindi",
            Subject::Sst => "SST",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unvalidated mark input, one textual value per subject. Having one field
/// per subject means no subject can be missing or duplicated.
#[derive(Debug, Clone, Default)]
pub struct RawMarks {
    pub english: String,
    pub mathematics: String,
    pub science: String,
    pub hindi: String,
    pub sst: String,
}

impl RawMarks {
    pub fn get(&self, subject: Subject) -> &str {
        match subject {
            Subject::English => &self.english,
            Subject::Mathematics => &self.mathematics,
            Subject::Science => &self.science,
            Subject::Hindi => &self.hindi,
            Subject::Sst => &self.sst,
        }
    }
}

/// JSON blob of per-subject marks stored in the history table. Field order
/// matches [`Subject::ALL`].
#[derive(Serialize)]
struct MarksBlob {
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
}

/// One validated calculation result, ready for persistence or display.
///
/// Immutable once built; the ledger only ever appends it.
#[derive(Debug, Clone)]
pub struct GradeRecord {
    pub student_name: String,
    marks: [f64; SUBJECT_COUNT],
    pub total: f64,
    pub average: f64,
    pub grade: Grade,
    pub timestamp: DateTime<Local>,
}

impl GradeRecord {
    /// Validates a name and five raw marks and builds a record.
    ///
    /// Pure construction: no I/O happens here. Fails with a
    /// [`ValidationError`] naming the offending subject if a mark does not
    /// parse as a number or falls outside 0–100, and with
    /// [`ValidationError::MissingName`] if the trimmed name is empty.
    pub fn build(name: &str, raw: &RawMarks) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        let mut marks = [0.0; SUBJECT_COUNT];
        for subject in Subject::ALL {
            let value = raw.get(subject).trim();
            let mark: f64 = value.parse().map_err(|_| ValidationError::NonNumericMark {
                subject,
                value: value.to_string(),
            })?;
            if !(0.0..=100.0).contains(&mark) {
                return Err(ValidationError::OutOfRange { subject, mark });
            }
            marks[subject.index()] = mark;
        }

        let total: f64 = marks.iter().sum();
        let average = total / SUBJECT_COUNT as f64;

        Ok(GradeRecord {
            student_name: name.to_string(),
            marks,
            total,
            average,
            grade: classify(average),
            timestamp: Local::now(),
        })
    }

    pub fn mark(&self, subject: Subject) -> f64 {
        self.marks[subject.index()]
    }

    /// Per-subject marks in fixed subject order.
    pub fn entries(&self) -> impl Iterator<Item = (Subject, f64)> + '_ {
        Subject::ALL.into_iter().map(|s| (s, self.mark(s)))
    }

    /// Serializes the per-subject marks as a JSON object in subject order.
    pub fn marks_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&MarksBlob {
            english: self.mark(Subject::English),
            mathematics: self.mark(Subject::Mathematics),
            science: self.mark(Subject::Science),
            hindi: self.mark(Subject::Hindi),
            sst: self.mark(Subject::Sst),
        })
    }

    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(english: &str, mathematics: &str, science: &str, hindi: &str, sst: &str) -> RawMarks {
        RawMarks {
            english: english.to_string(),
            mathematics: mathematics.to_string(),
            science: science.to_string(),
            hindi: hindi.to_string(),
            sst: sst.to_string(),
        }
    }

    #[test]
    fn test_build_computes_total_average_and_grade() {
        let record = GradeRecord::build("Asha", &raw("95", "88", "76", "60", "45")).unwrap();

        assert_eq!(record.student_name, "Asha");
        assert!((record.total - 364.0).abs() < 1e-9);
        assert!((record.average - 72.8).abs() < 1e-9);
        assert_eq!(record.grade, Grade::B);
        assert_eq!(record.mark(Subject::English), 95.0);
        assert_eq!(record.mark(Subject::Sst), 45.0);
    }

    #[test]
    fn test_build_all_hundreds() {
        let record = GradeRecord::build("Ravi", &raw("100", "100", "100", "100", "100")).unwrap();

        assert!((record.total - 500.0).abs() < 1e-9);
        assert!((record.average - 100.0).abs() < 1e-9);
        assert_eq!(record.grade, Grade::APlus);
    }

    #[test]
    fn test_build_accepts_marks_at_both_bounds() {
        let record = GradeRecord::build("Mina", &raw("0", "100", "0", "100", "0")).unwrap();

        assert!((record.total - 200.0).abs() < 1e-9);
        assert_eq!(record.grade, Grade::F);
    }

    #[test]
    fn test_build_trims_name() {
        let record = GradeRecord::build("  Asha  ", &raw("50", "50", "50", "50", "50")).unwrap();
        assert_eq!(record.student_name, "Asha");
    }

    #[test]
    fn test_build_rejects_whitespace_only_name() {
        let err = GradeRecord::build("   ", &raw("50", "50", "50", "50", "50")).unwrap_err();
        assert_eq!(err, ValidationError::MissingName);
    }

    #[test]
    fn test_build_rejects_negative_mark_naming_subject() {
        let err = GradeRecord::build("Asha", &raw("95", "88", "-1", "60", "45")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                subject: Subject::Science,
                mark: -1.0
            }
        );
    }

    #[test]
    fn test_build_rejects_mark_above_hundred() {
        let err = GradeRecord::build("Asha", &raw("95", "88", "76", "100.001", "45")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                subject: Subject::Hindi,
                mark: 100.001
            }
        );
    }

    #[test]
    fn test_build_rejects_non_numeric_mark_naming_subject() {
        let err = GradeRecord::build("Asha", &raw("95", "eighty", "76", "60", "45")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonNumericMark {
                subject: Subject::Mathematics,
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn test_marks_json_fixed_order() {
        let record = GradeRecord::build("Asha", &raw("95", "88", "76", "60", "45")).unwrap();
        let json = record.marks_json().unwrap();
        assert_eq!(
            json,
            r#"{"English":95.0,"Mathematics":88.0,"Science":76.0,"Hindi":60.0,"SST":45.0}"#
        );
    }

    #[test]
    fn test_validation_error_message_names_subject() {
        let err = GradeRecord::build("Asha", &raw("95", "88", "76", "60", "101")).unwrap_err();
        assert!(err.to_string().contains("SST"));
    }
}
