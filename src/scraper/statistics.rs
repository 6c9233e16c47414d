use std::time::Duration;

use super::report::{RunReport, StateOutcome};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub categories_ok: usize,
    pub categories_failed: usize,
    pub cards_seen: usize,
    pub products_written: usize,
    pub cards_skipped: usize,
}

impl Statistics {
    pub fn from_report(report: &RunReport) -> Self {
        let mut stats = Self::default();
        for category in &report.categories {
            match &category.result {
                StateOutcome::Ok(written) => {
                    stats.categories_ok += 1;
                    stats.cards_seen += written.cards_seen;
                    stats.products_written += written.written;
                    stats.cards_skipped += written.skipped.len();
                }
                StateOutcome::Error(_) => stats.categories_failed += 1,
            }
        }
        stats
    }

    pub fn write_to_log(&self, running_time: Duration) {
        tracing::info!(
            categories_ok = self.categories_ok,
            categories_failed = self.categories_failed,
            cards_seen = self.cards_seen,
            products_written = self.products_written,
            cards_skipped = self.cards_skipped,
            running_time = ?running_time,
            "statistics"
        );
    }
}
