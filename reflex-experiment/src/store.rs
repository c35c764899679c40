//! Result Store - ordered, append-only trial records for one session
//!
//! Records are never removed. Ignoring a record is a soft exclusion that hides
//! it from [`ResultStore::exportable`] and [`ResultStore::summary`].

use reflex_core::TrialRecord;

use crate::error::IgnoreError;

/// Position of a record in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(usize);

impl RecordId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Reaction time statistics over exportable records
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

#[derive(Debug, Default, Clone)]
pub struct ResultStore {
    records: Vec<TrialRecord>,
}

impl ResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: TrialRecord) -> RecordId {
        self.records.push(record);
        RecordId(self.records.len() - 1)
    }

    /// Marks `id` as ignored. Only the latest record qualifies, and only once.
    pub fn ignore_latest(&mut self, id: RecordId) -> Result<(), IgnoreError> {
        if self.latest_id() != Some(id) {
            return Err(IgnoreError::NotLatest);
        }
        let record = &mut self.records[id.0];
        if record.mark_ignored() {
            Ok(())
        } else {
            Err(IgnoreError::AlreadyIgnored)
        }
    }

    /// Non-ignored records in insertion order.
    pub fn exportable(&self) -> impl Iterator<Item = &TrialRecord> + '_ {
        self.records.iter().filter(|r| !r.is_ignored())
    }

    pub fn exportable_count(&self) -> usize {
        self.exportable().count()
    }

    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&TrialRecord> {
        self.records.get(id.0)
    }

    pub fn latest_id(&self) -> Option<RecordId> {
        self.records.len().checked_sub(1).map(RecordId)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `None` when every record is ignored or the store is empty.
    pub fn summary(&self) -> Option<Summary> {
        let times: Vec<f64> = self.exportable().map(|r| r.reaction_time_ms()).collect();
        if times.is_empty() {
            return None;
        }
        Some(Summary {
            count: times.len(),
            mean_ms: times.iter().sum::<f64>() / times.len() as f64,
            min_ms: times.iter().copied().fold(f64::INFINITY, f64::min),
            max_ms: times.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}
