//! Fixed-layout textual grade report.

use std::fmt::Write as _;

use crate::grade::classify;
use crate::record::GradeRecord;

/// Renders a display report for one record: header, per-subject table with
/// per-subject grades, then the total/average/final-grade summary.
///
/// Pure formatting; reapplies [`classify`] to each single mark for the
/// per-subject grade column.
pub fn format_report(record: &GradeRecord) -> String {
    let mut report = String::new();

    let _ = writeln!(report, "Grade Report for {}", record.student_name);
    let _ = writeln!(report, "Generated on: {}", record.timestamp_string());
    let _ = writeln!(report, "{}", "=".repeat(50));
    report.push('\n');

    let _ = writeln!(report, "Subject-wise Details:");
    let _ = writeln!(report, "{}", "-".repeat(50));
    let _ = writeln!(report, "{:<15} {:<10} {:<10}", "Subject", "Marks", "Grade");
    let _ = writeln!(report, "{}", "-".repeat(50));

    for (subject, mark) in record.entries() {
        let _ = writeln!(
            report,
            "{:<15} {:<10.2} {:<10}",
            subject.name(),
            mark,
            classify(mark)
        );
    }

    let _ = writeln!(report, "{}", "-".repeat(50));
    let _ = writeln!(report, "{:<15} {:<10.2}", "Total Marks:", record.total);
    let _ = writeln!(report, "{:<15} {:<10.2}", "Average:", record.average);
    let _ = writeln!(report, "{:<15} {}", "Final Grade:", record.grade);
    let _ = writeln!(report, "{}", "=".repeat(50));

    report
}
