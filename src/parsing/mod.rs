//! Parsers for the inputs of an extraction run.
//!
//! This module provides parsers for:
//!
//! - **BLAST tabular reports**: Decompose subject ids into sample and sequence id
//! - **BLAST output directories**: Discover `<input>-<category>.tab` reports
//! - **FASTA files**: Stream reference records and write extracted ones
//!
//! ## Example
//!
//! ```rust,no_run
//! use blast_hit_extract::core::types::IdMode;
//! use blast_hit_extract::parsing::blast::HitParser;
//! use std::path::Path;
//!
//! let hits = HitParser::new(IdMode::Suffix)
//!     .parse_file(Path::new("query.fa-genes.tab"))
//!     .unwrap();
//!
//! for (sample, ids) in &hits {
//!     println!("{sample}: {} hits", ids.len());
//! }
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

pub mod blast;
pub mod fasta;
pub mod report_dir;

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
#[must_use]
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Open a text file for buffered reading, decompressing gzip/bgzip files.
///
/// # Errors
///
/// Returns the underlying IO error if the file cannot be opened.
pub fn open_buffered(path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped(Path::new("genes.fna.gz")));
        assert!(is_gzipped(Path::new("contigs.fa.BGZ")));
        assert!(!is_gzipped(Path::new("proteins.faa")));
        assert!(!is_gzipped(Path::new("query.fa-genes.tab")));
    }

    #[test]
    fn test_open_missing_file() {
        let err = open_buffered(Path::new("/nonexistent/genes.fna")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
