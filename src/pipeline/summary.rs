//! Per-run counters.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::outcome::{FetchOutcome, OutcomeKind};

/// What one run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Albums or conversations whose directory was produced.
    pub units_processed: usize,
    /// Albums or conversations skipped (unreadable, no first page, cancelled).
    pub units_skipped: usize,
    /// Fetch outcomes by kind.
    pub outcomes: BTreeMap<OutcomeKind, usize>,
    /// Bytes written by successful downloads.
    pub bytes_downloaded: u64,
}

impl RunSummary {
    pub(crate) fn record_outcomes(&mut self, outcomes: &[FetchOutcome]) {
        self.units_processed += 1;
        for outcome in outcomes {
            *self.outcomes.entry(outcome.kind()).or_insert(0) += 1;
            if let FetchOutcome::Downloaded { bytes, .. } = outcome {
                self.bytes_downloaded += bytes;
            }
        }
    }

    pub(crate) fn record_skipped(&mut self) {
        self.units_skipped += 1;
    }

    /// Number of fetches that ended as `kind`.
    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.outcomes.get(&kind).copied().unwrap_or(0)
    }

    /// Total fetches attempted or short-circuited.
    pub fn total_fetches(&self) -> usize {
        self.outcomes.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_counts() {
        let mut summary = RunSummary::default();
        summary.record_outcomes(&[
            FetchOutcome::Downloaded {
                path: PathBuf::from("a.jpg"),
                bytes: 10,
            },
            FetchOutcome::Downloaded {
                path: PathBuf::from("b.jpg"),
                bytes: 5,
            },
            FetchOutcome::SkippedClientError(404),
        ]);
        summary.record_skipped();

        assert_eq!(summary.units_processed, 1);
        assert_eq!(summary.units_skipped, 1);
        assert_eq!(summary.count(OutcomeKind::Downloaded), 2);
        assert_eq!(summary.count(OutcomeKind::FailedExhausted), 0);
        assert_eq!(summary.total_fetches(), 3);
        assert_eq!(summary.bytes_downloaded, 15);
    }

    #[test]
    fn test_serializes_outcome_keys_as_strings() {
        let mut summary = RunSummary::default();
        summary.record_outcomes(&[FetchOutcome::SkippedWrongMime("text/html".into())]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["outcomes"]["skipped_wrong_mime"], 1);
    }
}
