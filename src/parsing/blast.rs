//! Parser for tabular BLAST output (`-outfmt 6`).
//!
//! Only the subject column (field 2) is used. Its value is a composite
//! identifier `SAMPLE_SEQID` that is decomposed with [`parse_composite_id`].

use std::io::BufRead;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::hit::{HitAggregation, HitRecord};
use crate::core::types::IdMode;
use crate::parsing::open_buffered;

/// Composite subject identifier: sample label, underscore, sequence id.
/// Anchored at the start of the field only.
static COMPOSITE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<sample>HOT\d+(?:_\dc?)?_\d+m)_(?P<seq_id>(?:rep_)?c\d+(?:_\d)?)")
        .expect("composite id pattern is a valid regex")
});

/// Zero-based index of the subject id column
pub const SUBJECT_FIELD: usize = 1;

#[derive(Error, Debug)]
pub enum HitParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed hit row on line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
}

/// A subject identifier that does not decompose into sample and sequence id
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a composite SAMPLE_SEQID identifier")]
pub struct CompositeIdError(pub String);

/// Decompose a composite identifier into a [`HitRecord`].
///
/// # Errors
///
/// Returns `CompositeIdError` if the start of `composite_id` does not match
/// the `HOT<n>[_<d>[c]]_<n>m_[rep_]c<n>[_<d>]` pattern.
///
/// # Examples
///
/// ```
/// use blast_hit_extract::core::types::IdMode;
/// use blast_hit_extract::parsing::blast::parse_composite_id;
///
/// let hit = parse_composite_id("HOT234_1_0200m_rep_c55158_2", IdMode::Suffix).unwrap();
/// assert_eq!(hit.sample_name, "HOT234_1_0200m");
/// assert_eq!(hit.sequence_id, "rep_c55158_2");
/// ```
pub fn parse_composite_id(composite_id: &str, mode: IdMode) -> Result<HitRecord, CompositeIdError> {
    let caps = COMPOSITE_ID
        .captures(composite_id)
        .ok_or_else(|| CompositeIdError(composite_id.to_string()))?;

    let sample_name = caps["sample"].to_string();
    let sequence_id = match mode {
        IdMode::Suffix => caps["seq_id"].to_string(),
        IdMode::Full => composite_id.to_string(),
    };

    Ok(HitRecord {
        composite_id: composite_id.to_string(),
        sample_name,
        sequence_id,
    })
}

/// Build the composite identifier BLAST reports for a sample's sequence
#[must_use]
pub fn compose_composite_id(sample_name: &str, sequence_id: &str) -> String {
    format!("{sample_name}_{sequence_id}")
}

/// What to do with a row whose subject id cannot be decomposed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedRowPolicy {
    /// Stop parsing and return the error
    #[default]
    Abort,
    /// Log a warning and continue with the next row
    Skip,
}

/// Parse a single report row into a [`HitRecord`].
///
/// `line` is the 1-based line number used in error messages.
///
/// # Errors
///
/// Returns `HitParseError::MalformedRow` if the row has fewer than two
/// tab-separated fields or its subject id is not a composite identifier.
pub fn parse_row(row: &str, line: usize, mode: IdMode) -> Result<HitRecord, HitParseError> {
    let subject = row
        .trim()
        .split('\t')
        .nth(SUBJECT_FIELD)
        .ok_or_else(|| HitParseError::MalformedRow {
            line,
            reason: "fewer than 2 tab-separated fields".to_string(),
        })?;

    parse_composite_id(subject, mode).map_err(|e| HitParseError::MalformedRow {
        line,
        reason: e.to_string(),
    })
}

/// Builds a [`HitAggregation`] from the rows of a BLAST report
#[derive(Debug, Clone, Default)]
pub struct HitParser {
    /// How sequence ids are derived from composite identifiers
    pub mode: IdMode,

    /// Stop after this many rows; the rest of the input is left unread
    pub row_limit: Option<usize>,

    pub on_malformed: MalformedRowPolicy,
}

impl HitParser {
    pub fn new(mode: IdMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_row_limit(mut self, row_limit: Option<usize>) -> Self {
        self.row_limit = row_limit;
        self
    }

    #[must_use]
    pub fn with_malformed_policy(mut self, policy: MalformedRowPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    /// Parse rows of report text.
    ///
    /// Blank rows are ignored and do not count toward the row limit.
    ///
    /// # Errors
    ///
    /// Returns `HitParseError::MalformedRow` on the first unparsable row
    /// unless the parser is configured to skip them.
    pub fn parse_rows<I, S>(&self, rows: I) -> Result<HitAggregation, HitParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parse_lines(rows.into_iter().map(Ok))
    }

    /// Parse a report from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns `HitParseError::Io` if reading fails, or
    /// `HitParseError::MalformedRow` as for [`HitParser::parse_rows`].
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<HitAggregation, HitParseError> {
        self.parse_lines(reader.lines())
    }

    /// Parse a report file. Gzip-compressed reports (`.gz`) are decompressed.
    ///
    /// # Errors
    ///
    /// Returns `HitParseError::Io` if the file cannot be opened or read, or
    /// `HitParseError::MalformedRow` as for [`HitParser::parse_rows`].
    pub fn parse_file(&self, path: &Path) -> Result<HitAggregation, HitParseError> {
        info!("Parsing BLAST report {}", path.display());
        let reader = open_buffered(path)?;
        self.parse_reader(reader)
    }

    fn parse_lines<I, S>(&self, lines: I) -> Result<HitAggregation, HitParseError>
    where
        I: IntoIterator<Item = std::io::Result<S>>,
        S: AsRef<str>,
    {
        let mut aggregation = HitAggregation::new();
        let mut rows = 0usize;

        let mut lines = lines.into_iter().enumerate();
        loop {
            // Checked before pulling so rows past the limit stay unread
            if self.row_limit.is_some_and(|limit| rows >= limit) {
                debug!("Row limit of {rows} reached, ignoring remaining rows");
                break;
            }
            let Some((i, line)) = lines.next() else {
                break;
            };
            let line = line?;
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }

            let line_num = i + 1;
            rows += 1;

            match parse_row(line, line_num, self.mode) {
                Ok(hit) => {
                    debug!(
                        sample = %hit.sample_name,
                        sequence_id = %hit.sequence_id,
                        "Parsed hit on line {line_num}"
                    );
                    aggregation.insert(hit);
                }
                Err(e) if self.on_malformed == MalformedRowPolicy::Skip => {
                    warn!("Skipping {e}");
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Finished parsing {rows} rows: {} samples, {} distinct sequence ids",
            aggregation.len(),
            aggregation.total_ids()
        );

        Ok(aggregation)
    }
}
