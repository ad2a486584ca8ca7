use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use tracing::warn;

use crate::cli::{HitParsingArgs, OutputFormat};
use crate::extraction::extractor::{extract_to_writer, ExtractionOutcome};
use crate::parsing::fasta::{create_output, is_fasta_file, open_reference};

#[derive(Args)]
pub struct FetchArgs {
    /// Tabular BLAST report
    #[arg(required = true)]
    pub report: PathBuf,

    /// Reference FASTA of the sample (may be gzipped)
    #[arg(required = true)]
    pub reference: PathBuf,

    /// Sample whose hits are extracted (e.g. HOT229_1_0200m)
    #[arg(required = true)]
    pub sample: String,

    /// Output FASTA
    #[arg(required = true)]
    pub output: PathBuf,

    #[command(flatten)]
    pub parsing: HitParsingArgs,
}

#[derive(Serialize)]
struct FetchReport<'a> {
    sample: &'a str,
    reference: &'a std::path::Path,
    output: &'a std::path::Path,
    found: &'a [String],
    missing: Vec<&'a String>,
}

/// Execute fetch subcommand
///
/// # Errors
///
/// Returns an error if the report is malformed, has no hits for the sample,
/// or the reference cannot be read.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: FetchArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let hits = args
        .parsing
        .parser()
        .parse_file(&args.report)
        .with_context(|| format!("Failed to parse BLAST report {}", args.report.display()))?;

    let wanted = hits.get(&args.sample).with_context(|| {
        format!(
            "No hits for sample {} in {}",
            args.sample,
            args.report.display()
        )
    })?;

    if !is_fasta_file(&args.reference) {
        warn!(
            "{} does not have a FASTA extension, reading it as FASTA anyway",
            args.reference.display()
        );
    }

    let mut reader = open_reference(&args.reference)
        .with_context(|| format!("Failed to open reference {}", args.reference.display()))?;
    let mut out = create_output(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    if verbose {
        eprintln!(
            "Extracting {} hits for {} from {}",
            wanted.len(),
            args.sample,
            args.reference.display()
        );
    }

    let outcome = extract_to_writer(wanted.iter().cloned(), reader.records(), &mut out)
        .with_context(|| format!("Failed to extract from {}", args.reference.display()))?;
    out.flush()?;

    for id in &outcome.missing {
        warn!("Failed to find '{id}' in {}", args.reference.display());
    }

    print_outcome(&args, &outcome, format)
}

fn print_outcome(
    args: &FetchArgs,
    outcome: &ExtractionOutcome,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!(
                "Wrote {} of {} sequences to {}",
                outcome.found.len(),
                outcome.found.len() + outcome.missing.len(),
                args.output.display()
            );
            for id in &outcome.missing {
                println!("  not found: {id}");
            }
        }
        OutputFormat::Json => {
            let report = FetchReport {
                sample: &args.sample,
                reference: &args.reference,
                output: &args.output,
                found: &outcome.found,
                missing: outcome.missing.iter().collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Tsv => {
            println!("sequence_id\tstatus");
            for id in &outcome.found {
                println!("{id}\tfound");
            }
            for id in &outcome.missing {
                println!("{id}\tmissing");
            }
        }
    }

    Ok(())
}
