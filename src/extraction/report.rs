//! Diagnostics raised while extracting samples.
//!
//! The driver never prints directly; it calls an [`ExtractionReporter`].
//! [`TracingReporter`] forwards events to `tracing`, and
//! [`CollectingReporter`] keeps them in memory.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, error, info, warn};

use crate::core::types::SeqCategory;

/// Receives per-sample events from the extraction driver.
///
/// Implementations must be shareable between worker threads.
pub trait ExtractionReporter: Send + Sync {
    fn sample_started(&self, category: SeqCategory, sample: &str, reference: &Path, requested: usize);

    /// The sample's reference file does not exist; the sample is skipped
    fn missing_reference(&self, category: SeqCategory, sample: &str, path: &Path);

    /// The reference could not be read or the output could not be written
    fn sample_failed(&self, category: SeqCategory, sample: &str, error: &str);

    /// A requested id was not present in the sample's reference file
    fn unresolved_id(&self, category: SeqCategory, sample: &str, id: &str);

    fn sample_finished(&self, category: SeqCategory, sample: &str, found: usize, missing: usize);
}

/// Logs events with `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ExtractionReporter for TracingReporter {
    fn sample_started(&self, category: SeqCategory, sample: &str, reference: &Path, requested: usize) {
        info!(
            "Extracting {requested} {category} hits for {sample} from {}",
            reference.display()
        );
    }

    fn missing_reference(&self, category: SeqCategory, sample: &str, path: &Path) {
        error!(
            "Reference file {} does not exist, skipping {category} hits for {sample}",
            path.display()
        );
    }

    fn sample_failed(&self, category: SeqCategory, sample: &str, error: &str) {
        error!("Failed to extract {category} hits for {sample}: {error}");
    }

    fn unresolved_id(&self, category: SeqCategory, sample: &str, id: &str) {
        warn!("Failed to find {category} sequence '{id}' in {sample}");
    }

    fn sample_finished(&self, category: SeqCategory, sample: &str, found: usize, missing: usize) {
        debug!("Finished {category} hits for {sample}: {found} found, {missing} missing");
    }
}

/// A recorded reporter event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Started {
        category: SeqCategory,
        sample: String,
        reference: PathBuf,
        requested: usize,
    },
    MissingReference {
        category: SeqCategory,
        sample: String,
        path: PathBuf,
    },
    Failed {
        category: SeqCategory,
        sample: String,
        error: String,
    },
    UnresolvedId {
        category: SeqCategory,
        sample: String,
        id: String,
    },
    Finished {
        category: SeqCategory,
        sample: String,
        found: usize,
        missing: usize,
    },
}

/// Keeps every event in memory, in the order reported
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<ReportEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Ids reported as unresolved, as `(sample, id)` pairs
    #[must_use]
    pub fn unresolved(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportEvent::UnresolvedId { sample, id, .. } => Some((sample, id)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ReportEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl ExtractionReporter for CollectingReporter {
    fn sample_started(&self, category: SeqCategory, sample: &str, reference: &Path, requested: usize) {
        self.push(ReportEvent::Started {
            category,
            sample: sample.to_string(),
            reference: reference.to_path_buf(),
            requested,
        });
    }

    fn missing_reference(&self, category: SeqCategory, sample: &str, path: &Path) {
        self.push(ReportEvent::MissingReference {
            category,
            sample: sample.to_string(),
            path: path.to_path_buf(),
        });
    }

    fn sample_failed(&self, category: SeqCategory, sample: &str, error: &str) {
        self.push(ReportEvent::Failed {
            category,
            sample: sample.to_string(),
            error: error.to_string(),
        });
    }

    fn unresolved_id(&self, category: SeqCategory, sample: &str, id: &str) {
        self.push(ReportEvent::UnresolvedId {
            category,
            sample: sample.to_string(),
            id: id.to_string(),
        });
    }

    fn sample_finished(&self, category: SeqCategory, sample: &str, found: usize, missing: usize) {
        self.push(ReportEvent::Finished {
            category,
            sample: sample.to_string(),
            found,
            missing,
        });
    }
}
