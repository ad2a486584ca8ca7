use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::catalog::layout::CatalogLayout;
use crate::cli::{HitParsingArgs, OutputFormat};
use crate::core::hit::CategoryHits;
use crate::core::types::SeqCategory;
use crate::extraction::driver::{self, ExtractionConfig, RunSummary, SampleStatus};
use crate::extraction::report::TracingReporter;
use crate::parsing::blast::HitParser;
use crate::parsing::report_dir::{find_reports, HitReportFile};

#[derive(Args)]
pub struct ExtractArgs {
    /// Directory of BLAST reports named `<input>-<category>.tab`
    #[arg(required = true)]
    pub blast_output_dir: PathBuf,

    /// Reference catalog directory with one subdirectory per sample
    #[arg(required = true)]
    pub catalog_dir: PathBuf,

    /// Directory for extracted sequences (created if missing)
    #[arg(required = true)]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub parsing: HitParsingArgs,

    /// Only extract these categories (default: all)
    #[arg(long, value_enum)]
    pub category: Vec<SeqCategory>,

    /// Number of samples to extract concurrently
    #[arg(short = 't', long, default_value = "1", value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: u16,

    /// Also write the run summary as JSON to this file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

/// Execute extract subcommand
///
/// # Errors
///
/// Returns an error if an input directory is missing, the output directory
/// cannot be created, or a BLAST report is malformed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ExtractArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let reports = find_reports(&args.blast_output_dir)?;
    let layout = CatalogLayout::open(&args.catalog_dir)?;

    if !args.output_dir.is_dir() {
        info!(
            "Output directory {} will be created",
            args.output_dir.display()
        );
        std::fs::create_dir_all(&args.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                args.output_dir.display()
            )
        })?;
    }

    let config = ExtractionConfig {
        id_mode: args.parsing.id_mode,
        row_limit: args.parsing.row_limit,
        threads: usize::from(args.threads),
    };
    let parser = config
        .hit_parser()
        .with_malformed_policy(args.parsing.malformed_policy());
    let hits = collect_hits(&reports, &parser, &args.category)?;

    if verbose {
        for (category, aggregation) in &hits {
            eprintln!(
                "{category}: {} samples, {} distinct hits",
                aggregation.len(),
                aggregation.total_ids()
            );
        }
    }

    if hits.is_empty() {
        eprintln!(
            "No BLAST reports found in {}.",
            args.blast_output_dir.display()
        );
        return Ok(());
    }

    let summary = driver::run(&hits, &layout, &args.output_dir, &config, &TracingReporter)?;

    if let Some(path) = &args.summary {
        write_summary(&summary, path)?;
    }

    match format {
        OutputFormat::Text => print_text_summary(&summary, verbose),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Tsv => print_tsv_summary(&summary),
    }

    Ok(())
}

/// Parse every report and group the hits by category.
///
/// # Errors
///
/// Returns an error naming the report if any report fails to parse.
pub fn collect_hits(
    reports: &[HitReportFile],
    parser: &HitParser,
    categories: &[SeqCategory],
) -> anyhow::Result<CategoryHits> {
    let mut hits = CategoryHits::new();

    for report in reports {
        if !categories.is_empty() && !categories.contains(&report.category) {
            info!("Skipping {} ({} not requested)", report.path.display(), report.category);
            continue;
        }

        info!(
            "BLAST input file name: {}, sequence type: {}",
            report.input, report.category
        );
        let aggregation = parser
            .parse_file(&report.path)
            .with_context(|| format!("Failed to parse BLAST report {}", report.path.display()))?;

        hits.entry(report.category).or_default().merge(aggregation);
    }

    Ok(hits)
}

fn write_summary(summary: &RunSummary, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    info!("Wrote run summary to {}", path.display());
    Ok(())
}

fn print_text_summary(summary: &RunSummary, verbose: bool) {
    println!(
        "Extracted {} of {} samples ({} skipped): {} sequences written, {} unresolved ids",
        summary.extracted(),
        summary.samples.len(),
        summary.skipped(),
        summary.found(),
        summary.unresolved(),
    );

    for sample in &summary.samples {
        match &sample.status {
            SampleStatus::Extracted { found, missing } => {
                let output = sample
                    .output
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                println!(
                    "  {:<9}{:<20}{found}/{} found -> {output}",
                    sample.category.name(),
                    sample.sample,
                    sample.requested,
                );
                if verbose {
                    for id in missing {
                        println!("      not found: {id}");
                    }
                }
            }
            SampleStatus::MissingReference => {
                println!(
                    "  {:<9}{:<20}skipped, missing reference {}",
                    sample.category.name(),
                    sample.sample,
                    sample.reference.display()
                );
            }
            SampleStatus::Failed { error } => {
                println!(
                    "  {:<9}{:<20}failed: {error}",
                    sample.category.name(),
                    sample.sample,
                );
            }
        }
    }
}

fn print_tsv_summary(summary: &RunSummary) {
    println!("category\tsample\trequested\tfound\tmissing\tstatus\treference\toutput");
    for sample in &summary.samples {
        let (found, status) = match &sample.status {
            SampleStatus::Extracted { found, .. } => (*found, "extracted"),
            SampleStatus::MissingReference => (0, "missing_reference"),
            SampleStatus::Failed { .. } => (0, "failed"),
        };
        println!(
            "{}\t{}\t{}\t{found}\t{}\t{status}\t{}\t{}",
            sample.category,
            sample.sample,
            sample.requested,
            sample.missing_ids().len(),
            sample.reference.display(),
            sample
                .output
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        );
    }
}
