//! Command-line interface for blast-hit-extract.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **extract**: Extract the hit sequences of every report in a BLAST output directory
//! - **hits**: Parse a single BLAST report and show its hits grouped by sample
//! - **fetch**: Extract one sample's hits from a single reference file
//!
//! ## Usage
//!
//! ```text
//! # Extract hits for all reports in blast-out/ from the Ohana catalog
//! blast-hit-extract extract blast-out/ /data/ohana/ hits/
//!
//! # Inspect the hits of one report
//! blast-hit-extract hits blast-out/query.fa-genes.tab --format json
//!
//! # Pipe a report from stdin
//! cat query.fa-genes.tab | blast-hit-extract hits -
//!
//! # Extract one sample by hand
//! blast-hit-extract fetch query.fa-genes.tab /data/ohana/HOT229_1_0200m/genes.fna \
//!     HOT229_1_0200m HOT229_1_0200m-genes.fna
//! ```

use clap::{Parser, Subcommand};

use crate::core::types::IdMode;
use crate::parsing::blast::{HitParser, MalformedRowPolicy};

pub mod extract;
pub mod fetch;
pub mod hits;

#[derive(Parser)]
#[command(name = "blast-hit-extract")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Extract BLAST-hit sequences from a per-sample reference catalog")]
#[command(
    long_about = "blast-hit-extract reads tabular BLAST reports whose subject ids name a catalog sample and a sequence (e.g. HOT234_1_0200m_rep_c55158_2).\n\nHits are grouped by sample, and each sample's reference FASTA is scanned once to write the matched records to a per-sample output file. Ids that cannot be found are reported but do not fail the run."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract hit sequences for every report in a BLAST output directory
    Extract(extract::ExtractArgs),

    /// Show the hits of a BLAST report grouped by sample
    Hits(hits::HitsArgs),

    /// Extract one sample's hits from a single reference FASTA
    Fetch(fetch::FetchArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Options shared by every command that parses BLAST reports
#[derive(clap::Args, Clone, Debug)]
pub struct HitParsingArgs {
    /// Which part of the subject id names a reference record
    #[arg(long, value_enum, default_value = "suffix")]
    pub id_mode: IdMode,

    /// Only parse the first N rows of each report
    #[arg(long)]
    pub row_limit: Option<usize>,

    /// Warn about and skip rows whose subject id cannot be parsed
    /// instead of failing
    #[arg(long)]
    pub skip_malformed: bool,
}

impl HitParsingArgs {
    #[must_use]
    pub fn malformed_policy(&self) -> MalformedRowPolicy {
        if self.skip_malformed {
            MalformedRowPolicy::Skip
        } else {
            MalformedRowPolicy::Abort
        }
    }

    #[must_use]
    pub fn parser(&self) -> HitParser {
        HitParser::new(self.id_mode)
            .with_row_limit(self.row_limit)
            .with_malformed_policy(self.malformed_policy())
    }
}
