//! FASTA input and output using noodles.
//!
//! Reference files may be uncompressed or gzip/bgzip compressed. Extracted
//! records are always written uncompressed.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna`, `.faa` (uncompressed)
//! - any of the above with `.gz` or `.bgz` appended (compressed)

use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufRead, BufWriter};
use std::path::Path;

use noodles::fasta;

use crate::parsing::{is_gzipped, open_buffered};

/// Streaming reader over a reference FASTA
pub type ReferenceReader = fasta::io::Reader<Box<dyn BufRead + Send>>;

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let stem_ext = if is_gzipped(path) {
        path.file_stem()
            .map(Path::new)
            .and_then(Path::extension)
    } else {
        path.extension()
    };

    matches!(
        stem_ext.and_then(OsStr::to_str).map(str::to_lowercase).as_deref(),
        Some("fa" | "fasta" | "fna" | "faa")
    )
}

/// Open a reference FASTA for a single streaming pass.
///
/// # Errors
///
/// Returns the underlying IO error if the file cannot be opened.
pub fn open_reference(path: &Path) -> io::Result<ReferenceReader> {
    open_buffered(path).map(fasta::io::Reader::new)
}

/// Create (or truncate) an output FASTA file.
///
/// The caller wraps the returned writer in a `fasta::io::Writer` and must
/// flush it once all records are written.
///
/// # Errors
///
/// Returns the underlying IO error if the file cannot be created.
pub fn create_output(path: &Path) -> io::Result<BufWriter<File>> {
    File::create(path).map(BufWriter::new)
}
