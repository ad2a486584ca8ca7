//! Layout of the per-sample reference catalog.
//!
//! Each sample in the catalog has its own directory holding one FASTA per
//! sequence category:
//!
//! ```text
//! ohana/
//! ├── HOT229_1_0200m/
//! │   ├── contigs.fa
//! │   ├── genes.fna
//! │   └── proteins.faa
//! └── HOT233_1c_0200m/
//!     └── ...
//! ```
//!
//! Extracted records for a sample are written to `<out>/<sample>-<category><ext>`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use blast_hit_extract::catalog::layout::CatalogLayout;
//! use blast_hit_extract::core::types::SeqCategory;
//!
//! let catalog = CatalogLayout::open("/data/ohana").unwrap();
//! let genes = catalog.locate("HOT229_1_0200m", SeqCategory::Genes).unwrap();
//! ```

pub mod layout;

pub use layout::{output_path, CatalogError, CatalogLayout, MissingReferenceFile};
