//! # blast-hit-extract
//!
//! A library for pulling BLAST-hit sequences out of a per-sample reference catalog.
//!
//! When a query is searched against BLAST databases built from a catalog of
//! metagenomic samples (such as the Ohana catalog of the HOT time series),
//! every hit names its subject with a composite identifier like
//! `HOT234_1_0200m_rep_c55158_2`: the sample `HOT234_1_0200m` followed by the
//! sequence id `rep_c55158_2`. To get the hit sequences themselves, each
//! sample's reference FASTA has to be searched for its matched ids.
//!
//! `blast-hit-extract` does this in two steps:
//!
//! - **Hit parsing**: decompose every subject id and group the matched ids by sample
//! - **Extraction**: scan each sample's reference file once, writing the matched
//!   records and stopping as soon as all of them are found
//!
//! ## Example
//!
//! ```rust,no_run
//! use blast_hit_extract::{CatalogLayout, HitParser, IdMode, SeqCategory};
//! use blast_hit_extract::core::hit::CategoryHits;
//! use blast_hit_extract::extraction::{driver, ExtractionConfig, TracingReporter};
//! use std::path::Path;
//!
//! let genes = HitParser::new(IdMode::Suffix)
//!     .parse_file(Path::new("blast-out/query.fa-genes.tab"))
//!     .unwrap();
//!
//! let mut hits = CategoryHits::new();
//! hits.insert(SeqCategory::Genes, genes);
//!
//! let catalog = CatalogLayout::open("/data/ohana").unwrap();
//! let summary = driver::run(
//!     &hits,
//!     &catalog,
//!     Path::new("hits"),
//!     &ExtractionConfig::default(),
//!     &TracingReporter,
//! )
//! .unwrap();
//!
//! println!("{} sequences written", summary.found());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Hit records, aggregations, and sequence categories
//! - [`parsing`]: BLAST report and FASTA parsing
//! - [`catalog`]: Location of reference and output files
//! - [`extraction`]: Bounded single-pass extraction and the per-sample driver
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod extraction;
pub mod parsing;

// Re-export commonly used types for convenience
pub use crate::catalog::layout::CatalogLayout;
pub use crate::core::hit::{HitAggregation, HitRecord};
pub use crate::core::types::*;
pub use crate::extraction::extractor::{extract, Extraction, SequenceRecord};
pub use crate::parsing::blast::{parse_composite_id, HitParser};
