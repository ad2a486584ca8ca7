//! Core data types for BLAST hit extraction.
//!
//! - [`HitRecord`]: One row of a BLAST report, decomposed into sample and sequence id
//! - [`HitAggregation`]: Matched sequence ids grouped by sample
//! - [`IdMode`]: Which part of the composite identifier names a reference record
//! - [`SeqCategory`]: Contigs, genes, or proteins
//!
//! ## Composite Identifiers
//!
//! Subjects in the BLAST databases are named by joining the sample label and
//! the sequence id with an underscore:
//!
//! | Composite identifier | Sample | Sequence id |
//! |----------------------|--------|-------------|
//! | `HOT234_1_0200m_rep_c55158_2` | `HOT234_1_0200m` | `rep_c55158_2` |
//! | `HOT229_1_0200m_c10096_4` | `HOT229_1_0200m` | `c10096_4` |
//! | `HOT233_1c_0200m_c3_1` | `HOT233_1c_0200m` | `c3_1` |

pub mod hit;
pub mod types;

pub use hit::{CategoryHits, HitAggregation, HitRecord};
pub use types::{IdMode, SeqCategory};
