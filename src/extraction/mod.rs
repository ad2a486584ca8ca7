//! Extraction of hit sequences from reference FASTA files.
//!
//! - [`extractor`]: Single bounded pass over one reference file
//! - [`driver`]: Runs the extractor for every sample of a run
//! - [`report`]: Diagnostics collaborator for skipped samples and unresolved ids
//!
//! ## Scan Algorithm
//!
//! The matched ids of a sample are copied into a search set. Reference
//! records are streamed in file order; a record whose id is in the set is
//! emitted and its id removed. As soon as the set is empty the scan stops,
//! so a sample with a handful of hits near the start of a large reference
//! file costs only a short read. Whatever remains in the set after the
//! scan is reported as unresolved.
//!
//! ## Example
//!
//! ```rust,no_run
//! use blast_hit_extract::extraction::extractor::extract_to_writer;
//! use blast_hit_extract::parsing::fasta::{create_output, open_reference};
//! use std::path::Path;
//!
//! let mut reader = open_reference(Path::new("ohana/HOT229_1_0200m/genes.fna")).unwrap();
//! let mut out = create_output(Path::new("HOT229_1_0200m-genes.fna")).unwrap();
//!
//! let outcome = extract_to_writer(["c10096_4"], reader.records(), &mut out).unwrap();
//! for id in &outcome.missing {
//!     eprintln!("not found: {id}");
//! }
//! ```

pub mod driver;
pub mod extractor;
pub mod report;

pub use driver::{ExtractionConfig, RunSummary, SampleResult, SampleStatus};
pub use extractor::{extract, extract_to_writer, ExtractError, Extraction, ExtractionOutcome};
pub use report::{CollectingReporter, ExtractionReporter, TracingReporter};
