//! The ledger: one CSV export plus one SQLite history store, written as a
//! pair on every successful calculation.

use tracing::info;

use crate::error::PersistenceError;
use crate::export::CsvExport;
use crate::history::HistoryStore;
use crate::record::GradeRecord;

/// Explicitly constructed pair of durable artifacts. Passed to callers
/// instead of being held in globals; each write acquires and releases its
/// underlying handle within the call.
pub struct Ledger {
    export: CsvExport,
    history: HistoryStore,
}

impl Ledger {
    pub fn new(export: CsvExport, history: HistoryStore) -> Self {
        Ledger { export, history }
    }

    pub fn export(&self) -> &CsvExport {
        &self.export
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Appends `record` to both artifacts.
    ///
    /// Appends are never deduplicated and never mutate prior rows. A failure
    /// of either write surfaces as a [`PersistenceError`]; the record itself
    /// stays valid and rows already written are untouched. No retry is
    /// attempted.
    pub async fn persist(&self, record: &GradeRecord) -> Result<(), PersistenceError> {
        self.export.append(record)?;
        let id = self.history.append(record).await?;
        info!(
            id,
            student = %record.student_name,
            grade = %record.grade,
            "Grade record persisted"
        );
        Ok(())
    }
}
