use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::{HitParsingArgs, OutputFormat};
use crate::core::hit::HitAggregation;

#[derive(Args)]
pub struct HitsArgs {
    /// Tabular BLAST report. Use '-' for stdin
    #[arg(required = true)]
    pub report: PathBuf,

    #[command(flatten)]
    pub parsing: HitParsingArgs,
}

/// Execute hits subcommand
///
/// # Errors
///
/// Returns an error if the report cannot be read or contains a malformed row.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: HitsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let parser = args.parsing.parser();

    let hits = if args.report.to_string_lossy() == "-" {
        parser
            .parse_reader(std::io::stdin().lock())
            .context("Failed to parse BLAST report from stdin")?
    } else {
        parser
            .parse_file(&args.report)
            .with_context(|| format!("Failed to parse BLAST report {}", args.report.display()))?
    };

    if verbose {
        eprintln!(
            "Parsed {} rows: {} samples, {} distinct hits",
            hits.rows(),
            hits.len(),
            hits.total_ids()
        );
    }

    match format {
        OutputFormat::Text => print_text(&hits),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(hits.as_map())?),
        OutputFormat::Tsv => print_tsv(&hits),
    }

    Ok(())
}

fn print_text(hits: &HitAggregation) {
    if hits.is_empty() {
        println!("No hits found.");
        return;
    }

    for (sample, ids) in hits {
        println!("{sample} ({} hits)", ids.len());
        for id in ids {
            println!("  {id}");
        }
    }
}

fn print_tsv(hits: &HitAggregation) {
    println!("sample\tsequence_id");
    for (sample, ids) in hits {
        for id in ids {
            println!("{sample}\t{id}");
        }
    }
}
