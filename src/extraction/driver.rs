use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::layout::{output_path, CatalogLayout, MissingReferenceFile};
use crate::core::hit::CategoryHits;
use crate::core::types::{IdMode, SeqCategory};
use crate::extraction::extractor::{extract_to_writer, ExtractError, ExtractionOutcome};
use crate::extraction::report::ExtractionReporter;
use crate::parsing::blast::HitParser;
use crate::parsing::fasta::{create_output, open_reference};

/// Default number of worker threads for per-sample extraction
pub const DEFAULT_THREADS: usize = 1;

/// Configuration for an extraction run
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// How sequence ids are derived from BLAST subject ids
    pub id_mode: IdMode,
    /// Only parse this many rows of each report
    pub row_limit: Option<usize>,
    /// Samples extracted concurrently; 1 runs everything on the calling thread
    pub threads: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            id_mode: IdMode::default(),
            row_limit: None,
            threads: DEFAULT_THREADS,
        }
    }
}

impl ExtractionConfig {
    /// A hit parser configured for this run
    #[must_use]
    pub fn hit_parser(&self) -> HitParser {
        HitParser::new(self.id_mode).with_row_limit(self.row_limit)
    }
}

/// One unit of work: a sample's hits within one category
#[derive(Debug, Clone, Copy)]
pub struct SampleJob<'a> {
    pub category: SeqCategory,
    pub sample: &'a str,
    pub wanted: &'a BTreeSet<String>,
}

/// Outcome for a single sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SampleStatus {
    Extracted { found: usize, missing: Vec<String> },
    MissingReference,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleResult {
    pub category: SeqCategory,
    pub sample: String,
    /// Number of distinct ids requested
    pub requested: usize,
    /// Reference file scanned, or the expected path if it was missing
    pub reference: PathBuf,
    /// Output file, present only when extraction succeeded
    pub output: Option<PathBuf>,
    #[serde(flatten)]
    pub status: SampleStatus,
}

impl SampleResult {
    #[must_use]
    pub fn missing_ids(&self) -> &[String] {
        match &self.status {
            SampleStatus::Extracted { missing, .. } => missing,
            _ => &[],
        }
    }
}

/// Results of a whole extraction run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub created_at: String,
    pub samples: Vec<SampleResult>,
}

impl RunSummary {
    /// Samples whose reference was scanned
    #[must_use]
    pub fn extracted(&self) -> usize {
        self.samples
            .iter()
            .filter(|s| matches!(s.status, SampleStatus::Extracted { .. }))
            .count()
    }

    /// Samples skipped because of a missing or unreadable reference
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.samples.len() - self.extracted()
    }

    /// Total records written
    #[must_use]
    pub fn found(&self) -> usize {
        self.samples
            .iter()
            .map(|s| match s.status {
                SampleStatus::Extracted { found, .. } => found,
                _ => 0,
            })
            .sum()
    }

    /// Total ids not present in their reference
    #[must_use]
    pub fn unresolved(&self) -> usize {
        self.samples.iter().map(|s| s.missing_ids().len()).sum()
    }
}

/// List the jobs for a run: categories in order, samples sorted within each
#[must_use]
pub fn plan(hits: &CategoryHits) -> Vec<SampleJob<'_>> {
    hits.iter()
        .flat_map(|(category, aggregation)| {
            aggregation.iter().map(move |(sample, wanted)| SampleJob {
                category: *category,
                sample,
                wanted,
            })
        })
        .collect()
}

/// Extract every sample in `hits` into `out_dir`.
///
/// A sample with a missing or unreadable reference is reported and skipped;
/// the rest of the run continues. Results come back in plan order
/// regardless of the number of threads.
///
/// # Errors
///
/// Returns `ExtractError::ThreadPool` if the worker pool cannot be created.
pub fn run(
    hits: &CategoryHits,
    layout: &CatalogLayout,
    out_dir: &Path,
    config: &ExtractionConfig,
    reporter: &dyn ExtractionReporter,
) -> Result<RunSummary, ExtractError> {
    let jobs = plan(hits);
    debug!("Planned {} sample extractions", jobs.len());

    let samples: Vec<SampleResult> = if config.threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        pool.install(|| {
            jobs.par_iter()
                .map(|job| extract_sample(job, layout, out_dir, reporter))
                .collect()
        })
    } else {
        jobs.iter()
            .map(|job| extract_sample(job, layout, out_dir, reporter))
            .collect()
    };

    Ok(RunSummary {
        created_at: chrono::Utc::now().to_rfc3339(),
        samples,
    })
}

/// Extract one sample's hits from its reference file.
///
/// Never fails: problems are reported and recorded in the returned status.
pub fn extract_sample(
    job: &SampleJob<'_>,
    layout: &CatalogLayout,
    out_dir: &Path,
    reporter: &dyn ExtractionReporter,
) -> SampleResult {
    let mut result = SampleResult {
        category: job.category,
        sample: job.sample.to_string(),
        requested: job.wanted.len(),
        reference: layout.reference_path(job.sample, job.category),
        output: None,
        status: SampleStatus::MissingReference,
    };

    let reference = match layout.locate(job.sample, job.category) {
        Ok(path) => path,
        Err(MissingReferenceFile { path, .. }) => {
            reporter.missing_reference(job.category, job.sample, &path);
            return result;
        }
    };
    result.reference.clone_from(&reference);

    reporter.sample_started(job.category, job.sample, &reference, job.wanted.len());

    let output = output_path(out_dir, job.sample, job.category);
    match write_sample(job.wanted, &reference, &output) {
        Ok(outcome) => {
            for id in &outcome.missing {
                reporter.unresolved_id(job.category, job.sample, id);
            }
            reporter.sample_finished(
                job.category,
                job.sample,
                outcome.found.len(),
                outcome.missing.len(),
            );
            result.output = Some(output);
            result.status = SampleStatus::Extracted {
                found: outcome.found.len(),
                missing: outcome.missing.into_iter().collect(),
            };
        }
        Err(e) => {
            if output.exists() {
                if let Err(remove_err) = std::fs::remove_file(&output) {
                    warn!("Failed to remove partial output {}: {remove_err}", output.display());
                }
            }
            reporter.sample_failed(job.category, job.sample, &e.to_string());
            result.status = SampleStatus::Failed { error: e.to_string() };
        }
    }

    result
}

/// Scan `reference` once, writing the wanted records to `output`.
///
/// Both files are closed when this returns, on every path.
///
/// # Errors
///
/// Returns `ExtractError::Io` if either file cannot be opened or written, or
/// `ExtractError::Noodles` if the reference is not valid FASTA.
pub fn write_sample(
    wanted: &BTreeSet<String>,
    reference: &Path,
    output: &Path,
) -> Result<ExtractionOutcome, ExtractError> {
    let mut reader = open_reference(reference)?;
    let mut out = create_output(output)?;

    let outcome = extract_to_writer(wanted.iter().cloned(), reader.records(), &mut out)?;
    out.flush()?;

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hit::{HitAggregation, HitRecord};
    use crate::extraction::report::{CollectingReporter, ReportEvent};
    use tempfile::tempdir;

    fn aggregation(hits: &[(&str, &str)]) -> HitAggregation {
        let mut agg = HitAggregation::new();
        for (sample, id) in hits {
            agg.insert(HitRecord {
                composite_id: format!("{sample}_{id}"),
                sample_name: (*sample).to_string(),
                sequence_id: (*id).to_string(),
            });
        }
        agg
    }

    fn write_reference(root: &Path, sample: &str, category: SeqCategory, content: &str) {
        let dir = root.join(sample);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(category.file_name()), content).unwrap();
    }

    #[test]
    fn test_plan_is_sorted() {
        let mut hits = CategoryHits::new();
        hits.insert(
            SeqCategory::Proteins,
            aggregation(&[("HOT236_1_0200m", "c24599_1")]),
        );
        hits.insert(
            SeqCategory::Genes,
            aggregation(&[("HOT234_1_0200m", "rep_c55158_2"), ("HOT229_1_0200m", "c10096_4")]),
        );

        let order: Vec<(SeqCategory, &str)> =
            plan(&hits).iter().map(|j| (j.category, j.sample)).collect();
        assert_eq!(
            order,
            vec![
                (SeqCategory::Genes, "HOT229_1_0200m"),
                (SeqCategory::Genes, "HOT234_1_0200m"),
                (SeqCategory::Proteins, "HOT236_1_0200m"),
            ]
        );
    }

    #[test]
    fn test_extract_sample_found_and_missing() {
        let catalog = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_reference(
            catalog.path(),
            "HOT229_1_0200m",
            SeqCategory::Genes,
            ">c10096_4\nACGT\n>c10096_5\nGGGG\n",
        );

        let layout = CatalogLayout::open(catalog.path()).unwrap();
        let wanted = BTreeSet::from(["c10096_4".to_string(), "c99999_1".to_string()]);
        let job = SampleJob {
            category: SeqCategory::Genes,
            sample: "HOT229_1_0200m",
            wanted: &wanted,
        };
        let reporter = CollectingReporter::new();

        let result = extract_sample(&job, &layout, out.path(), &reporter);

        assert_eq!(
            result.status,
            SampleStatus::Extracted {
                found: 1,
                missing: vec!["c99999_1".to_string()]
            }
        );
        let output = result.output.unwrap();
        assert_eq!(output, out.path().join("HOT229_1_0200m-genes.fna"));
        assert_eq!(std::fs::read_to_string(output).unwrap(), ">c10096_4\nACGT\n");
        assert_eq!(
            reporter.unresolved(),
            vec![("HOT229_1_0200m".to_string(), "c99999_1".to_string())]
        );
    }

    #[test]
    fn test_missing_reference_skips_sample() {
        let catalog = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_reference(
            catalog.path(),
            "HOT233_1c_0200m",
            SeqCategory::Genes,
            ">c3_1\nACGT\n",
        );

        let mut hits = CategoryHits::new();
        hits.insert(
            SeqCategory::Genes,
            aggregation(&[("HOT229_1_0200m", "c10096_4"), ("HOT233_1c_0200m", "c3_1")]),
        );

        let layout = CatalogLayout::open(catalog.path()).unwrap();
        let reporter = CollectingReporter::new();
        let summary = run(
            &hits,
            &layout,
            out.path(),
            &ExtractionConfig::default(),
            &reporter,
        )
        .unwrap();

        assert_eq!(summary.samples.len(), 2);
        assert_eq!(summary.samples[0].status, SampleStatus::MissingReference);
        assert!(summary.samples[0].output.is_none());
        assert_eq!(summary.extracted(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.found(), 1);
        assert!(!out.path().join("HOT229_1_0200m-genes.fna").exists());
        assert!(out.path().join("HOT233_1c_0200m-genes.fna").exists());

        assert!(matches!(
            &reporter.events()[0],
            ReportEvent::MissingReference { sample, .. } if sample == "HOT229_1_0200m"
        ));
    }

    #[test]
    fn test_unreadable_reference_removes_output() {
        let catalog = tempdir().unwrap();
        let out = tempdir().unwrap();
        write_reference(
            catalog.path(),
            "HOT229_1_0200m",
            SeqCategory::Contigs,
            "not a fasta file\n",
        );

        let layout = CatalogLayout::open(catalog.path()).unwrap();
        let wanted = BTreeSet::from(["c10096".to_string()]);
        let job = SampleJob {
            category: SeqCategory::Contigs,
            sample: "HOT229_1_0200m",
            wanted: &wanted,
        };
        let reporter = CollectingReporter::new();

        let result = extract_sample(&job, &layout, out.path(), &reporter);

        assert!(matches!(result.status, SampleStatus::Failed { .. }));
        assert!(result.output.is_none());
        assert!(!out.path().join("HOT229_1_0200m-contigs.fa").exists());
        assert!(reporter
            .events()
            .iter()
            .any(|e| matches!(e, ReportEvent::Failed { .. })));
    }

    #[test]
    fn test_parallel_run_matches_sequential() {
        let catalog = tempdir().unwrap();
        let samples = ["HOT229_1_0200m", "HOT233_1c_0200m", "HOT234_1_0200m", "HOT236_1_0200m"];
        let mut hits_list = Vec::new();
        for (i, sample) in samples.iter().enumerate() {
            write_reference(
                catalog.path(),
                sample,
                SeqCategory::Genes,
                &format!(">c{i}_1\nACGT\n>c{i}_2\nTTTT\n"),
            );
            hits_list.push((*sample, format!("c{i}_2")));
        }
        let pairs: Vec<(&str, &str)> = hits_list.iter().map(|(s, id)| (*s, id.as_str())).collect();

        let mut hits = CategoryHits::new();
        hits.insert(SeqCategory::Genes, aggregation(&pairs));
        let layout = CatalogLayout::open(catalog.path()).unwrap();

        let sequential_out = tempdir().unwrap();
        let sequential = run(
            &hits,
            &layout,
            sequential_out.path(),
            &ExtractionConfig::default(),
            &CollectingReporter::new(),
        )
        .unwrap();

        let parallel_out = tempdir().unwrap();
        let config = ExtractionConfig {
            threads: 4,
            ..ExtractionConfig::default()
        };
        let parallel = run(
            &hits,
            &layout,
            parallel_out.path(),
            &config,
            &CollectingReporter::new(),
        )
        .unwrap();

        let strip = |s: &RunSummary| -> Vec<(String, SampleStatus)> {
            s.samples
                .iter()
                .map(|r| (r.sample.clone(), r.status.clone()))
                .collect()
        };
        assert_eq!(strip(&sequential), strip(&parallel));
        assert_eq!(parallel.found(), 4);
        assert_eq!(parallel.unresolved(), 0);
    }
}
