//! The single current-dataset slot.
//!
//! Every load rebuilds the dataset from scratch and replaces the slot
//! wholesale; nothing is mutated in place. Loads may overlap (poll timer
//! racing a manual refresh), so each load takes a monotonic generation
//! token and a completed load is applied only if no newer one has already
//! landed; a slow stale response cannot clobber fresher data.

use chrono::{DateTime, Local};

use crate::models::PersonRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Updated,
    Failed,
}

/// Everything a successful load produces.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub records: Vec<PersonRecord>,
    /// Normalized headers actually present in the sheet.
    pub headers: Vec<String>,
    /// Prefixes of logical fields no header matched.
    pub missing_fields: Vec<&'static str>,
    pub fetched_at: DateTime<Local>,
}

#[derive(Debug, Default)]
pub struct BoardSlot {
    issued_generation: u64,
    applied_generation: u64,
    status: Option<LoadStatus>,
    dataset: Option<LoadOutcome>,
    error: Option<String>,
}

impl BoardSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the token for a load that is about to start.
    pub fn begin_load(&mut self) -> u64 {
        self.issued_generation += 1;
        self.status = Some(LoadStatus::Loading);
        self.issued_generation
    }

    /// Apply a finished load. Returns false when a newer load already
    /// landed and this result was discarded as stale.
    pub fn complete(&mut self, generation: u64, result: Result<LoadOutcome, String>) -> bool {
        if generation <= self.applied_generation {
            return false;
        }
        self.applied_generation = generation;

        match result {
            Ok(outcome) => {
                self.dataset = Some(outcome);
                self.error = None;
                self.status = Some(LoadStatus::Updated);
            }
            Err(message) => {
                self.dataset = None;
                self.error = Some(message);
                self.status = Some(LoadStatus::Failed);
            }
        }
        true
    }

    pub fn status(&self) -> Option<LoadStatus> {
        self.status
    }

    pub fn dataset(&self) -> Option<&LoadOutcome> {
        self.dataset.as_ref()
    }

    pub fn records(&self) -> &[PersonRecord] {
        self.dataset
            .as_ref()
            .map(|outcome| outcome.records.as_slice())
            .unwrap_or(&[])
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
