//! Checkpoint ledger of processed days

use super::UnitOfWork;
use crate::error::Result;
use crate::types::ProcessedDay;
use crate::utils::current_unix_timestamp;
use chrono::NaiveDate;

impl UnitOfWork<'_> {
    /// Whether `day` has a ledger entry
    pub fn is_processed(&self, day: NaiveDate) -> Result<bool> {
        Ok(self.read_day(day)?.is_some())
    }

    /// Record `day` as processed now, overwriting any earlier entry
    pub fn mark_processed(&mut self, day: NaiveDate) {
        self.changes_mut().days.insert(
            day,
            ProcessedDay {
                day,
                processed_at: current_unix_timestamp(),
            },
        );
    }

    /// Forget every processed day, including ones staged in this unit of work
    pub fn clear_all(&mut self) {
        let changes = self.changes_mut();
        changes.clear_days = true;
        changes.days.clear();
    }
}
