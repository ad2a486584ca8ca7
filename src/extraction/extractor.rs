use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};
use std::io::{self, Write};

use noodles::fasta;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A record that can be looked up by identifier
pub trait SequenceRecord {
    fn id(&self) -> Cow<'_, str>;
}

impl SequenceRecord for fasta::Record {
    /// The record name: the definition line up to the first whitespace
    fn id(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.name())
    }
}

/// Single pass over a reference source that yields the wanted records.
///
/// Records are yielded in source order. Each wanted id is satisfied by the
/// first record carrying it. Once every wanted id has been seen the source
/// is not read any further. A source error is yielded once and ends the scan.
#[derive(Debug)]
pub struct Extraction<I> {
    source: I,
    search_set: HashSet<String>,
    failed: bool,
}

/// Start extracting `wanted` ids from `source`.
///
/// Nothing is read until the returned iterator is polled; with an empty
/// `wanted` set the source is never read at all.
pub fn extract<W, S, I>(wanted: W, source: I) -> Extraction<I::IntoIter>
where
    W: IntoIterator<Item = S>,
    S: Into<String>,
    I: IntoIterator,
{
    Extraction {
        source: source.into_iter(),
        search_set: wanted.into_iter().map(Into::into).collect(),
        failed: false,
    }
}

impl<I> Extraction<I> {
    /// Number of wanted ids not seen so far
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.search_set.len()
    }

    /// Ids that were never found.
    ///
    /// Only meaningful once the iterator has been drained; ids still pending
    /// in an unfinished scan are reported as missing.
    #[must_use]
    pub fn finish(self) -> BTreeSet<String> {
        self.search_set.into_iter().collect()
    }
}

impl<I, R, E> Iterator for Extraction<I>
where
    I: Iterator<Item = Result<R, E>>,
    R: SequenceRecord,
{
    type Item = Result<R, E>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.search_set.is_empty() && !self.failed {
            match self.source.next()? {
                Ok(record) => {
                    let hit = self.search_set.remove(&*record.id());
                    if hit {
                        return Some(Ok(record));
                    }
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// Ids found and not found by one extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionOutcome {
    /// Found ids, in the order their records were written
    pub found: Vec<String>,
    pub missing: BTreeSet<String>,
}

/// Extract `wanted` records from a FASTA record stream and write them to `out`.
///
/// The caller owns `out` and is responsible for flushing it.
///
/// # Errors
///
/// Returns `ExtractError::Noodles` if a reference record cannot be parsed,
/// or `ExtractError::Io` if writing fails.
pub fn extract_to_writer<W, S, I, O>(
    wanted: W,
    source: I,
    out: O,
) -> Result<ExtractionOutcome, ExtractError>
where
    W: IntoIterator<Item = S>,
    S: Into<String>,
    I: IntoIterator<Item = io::Result<fasta::Record>>,
    O: Write,
{
    let mut writer = fasta::io::Writer::new(out);
    let mut extraction = extract(wanted, source);
    let mut found = Vec::new();

    for result in extraction.by_ref() {
        let record = result
            .map_err(|e| ExtractError::Noodles(format!("Failed to parse FASTA record: {e}")))?;
        writer.write_record(&record)?;
        found.push(record.id().into_owned());
    }

    Ok(ExtractionOutcome {
        found,
        missing: extraction.finish(),
    })
}
