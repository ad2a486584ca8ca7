//! Discovery of BLAST reports in an output directory.
//!
//! A BLAST run of `query.fa` against the three catalog databases leaves
//! `query.fa-contigs.tab`, `query.fa-genes.tab` and `query.fa-proteins.tab`.
//! Directories are searched recursively.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::types::SeqCategory;

static REPORT_FILE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<input>.+)-(?P<category>contigs|genes|proteins)\.tab(?:\.gz)?$")
        .expect("report file name pattern is a valid regex")
});

#[derive(Error, Debug)]
pub enum ReportDirError {
    #[error("BLAST output directory '{0}' does not exist")]
    NotADirectory(PathBuf),

    #[error("Failed to read directory '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A BLAST report found in the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitReportFile {
    /// Name of the query file that was searched
    pub input: String,
    pub category: SeqCategory,
    pub path: PathBuf,
}

/// Interpret a file name as `<input>-<category>.tab`
#[must_use]
pub fn parse_report_file_name(file_name: &str) -> Option<(String, SeqCategory)> {
    let caps = REPORT_FILE_NAME.captures(file_name)?;
    let category = caps["category"].parse().ok()?;
    Some((caps["input"].to_string(), category))
}

/// Find all BLAST reports below `dir`, sorted by path.
///
/// Files whose names do not follow the report naming scheme are skipped
/// with a warning. Symlinks to files are reported; symlinks to directories
/// are not followed.
///
/// # Errors
///
/// Returns `ReportDirError::NotADirectory` if `dir` is not a directory, or
/// `ReportDirError::Io` if a directory cannot be listed.
pub fn find_reports(dir: &Path) -> Result<Vec<HitReportFile>, ReportDirError> {
    if !dir.is_dir() {
        return Err(ReportDirError::NotADirectory(dir.to_path_buf()));
    }

    let mut reports = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        debug!("Searching {} for BLAST reports", current.display());
        let entries = std::fs::read_dir(&current).map_err(|source| ReportDirError::Io {
            path: current.clone(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| ReportDirError::Io {
                path: current.clone(),
                source,
            })?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|source| ReportDirError::Io {
                path: path.clone(),
                source,
            })?;

            // Symlinked directories are not descended into
            if file_type.is_dir() {
                pending.push(path);
                continue;
            }
            if file_type.is_symlink() && path.is_dir() {
                debug!("Not following directory symlink {}", path.display());
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            match parse_report_file_name(&file_name) {
                Some((input, category)) => reports.push(HitReportFile {
                    input,
                    category,
                    path,
                }),
                None => warn!("Failed to parse report file name '{file_name}', skipping"),
            }
        }
    }

    reports.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_report_file_name() {
        assert_eq!(
            parse_report_file_name("test.fa-contigs.tab"),
            Some(("test.fa".to_string(), SeqCategory::Contigs))
        );
        assert_eq!(
            parse_report_file_name("my-query.fasta-proteins.tab.gz"),
            Some(("my-query.fasta".to_string(), SeqCategory::Proteins))
        );
        assert_eq!(parse_report_file_name("test.fa-reads.tab"), None);
        assert_eq!(parse_report_file_name("-genes.tab"), None);
        assert_eq!(parse_report_file_name("notes.txt"), None);
    }

    #[test]
    fn test_find_reports_recursive() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("batch2");
        std::fs::create_dir(&nested).unwrap();

        std::fs::write(dir.path().join("a.fa-genes.tab"), "").unwrap();
        std::fs::write(dir.path().join("a.fa-contigs.tab"), "").unwrap();
        std::fs::write(dir.path().join("README"), "").unwrap();
        std::fs::write(nested.join("b.fa-proteins.tab"), "").unwrap();

        let reports = find_reports(dir.path()).unwrap();
        let found: Vec<(&str, SeqCategory)> = reports
            .iter()
            .map(|r| (r.input.as_str(), r.category))
            .collect();

        assert_eq!(
            found,
            vec![
                ("a.fa", SeqCategory::Contigs),
                ("a.fa", SeqCategory::Genes),
                ("b.fa", SeqCategory::Proteins),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_find_reports_ignores_directory_symlinks() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("q.fa-genes.tab"), "").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

        let reports = find_reports(dir.path()).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].path, dir.path().join("q.fa-genes.tab"));
    }

    #[test]
    fn test_find_reports_missing_dir() {
        let dir = tempdir().unwrap();
        let err = find_reports(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, ReportDirError::NotADirectory(_)));
    }
}
