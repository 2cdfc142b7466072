//! Letter-grade classification.

use std::fmt;

use serde::Serialize;

/// A letter grade derived from an average mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts an average mark (0–100) into a letter grade.
///
/// | Range   | Grade |
/// |---------|-------|
/// | >= 90   | A+    |
/// | >= 80   | A     |
/// | >= 70   | B     |
/// | >= 60   | C     |
/// | >= 50   | D     |
/// | < 50    | F     |
///
/// Each band is inclusive of its lower bound: exactly 90.0 is A+.
pub fn classify(average: f64) -> Grade {
    match average {
        a if a >= 90.0 => Grade::APlus,
        a if a >= 80.0 => Grade::A,
        a if a >= 70.0 => Grade::B,
        a if a >= 60.0 => Grade::C,
        a if a >= 50.0 => Grade::D,
        _ => Grade::F,
    }
}
