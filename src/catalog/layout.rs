use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::types::SeqCategory;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Reference catalog directory '{0}' does not exist")]
    NotADirectory(PathBuf),
}

/// A sample has no reference file of the requested category
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Reference file '{path}' for sample {sample} does not exist")]
pub struct MissingReferenceFile {
    pub sample: String,
    /// The uncompressed path that was expected
    pub path: PathBuf,
}

/// Per-sample reference files laid out as `<root>/<sample>/<category><ext>`
#[derive(Debug, Clone)]
pub struct CatalogLayout {
    root: PathBuf,
}

impl CatalogLayout {
    /// Open a catalog rooted at an existing directory
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotADirectory` if `root` is not a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CatalogError::NotADirectory(root));
        }
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Expected path of a sample's reference file, whether or not it exists
    #[must_use]
    pub fn reference_path(&self, sample: &str, category: SeqCategory) -> PathBuf {
        self.root.join(sample).join(category.file_name())
    }

    /// Find a sample's reference file, falling back to a gzipped copy.
    ///
    /// # Errors
    ///
    /// Returns `MissingReferenceFile` naming the uncompressed path if
    /// neither file exists.
    pub fn locate(
        &self,
        sample: &str,
        category: SeqCategory,
    ) -> Result<PathBuf, MissingReferenceFile> {
        let path = self.reference_path(sample, category);
        if path.is_file() {
            return Ok(path);
        }

        let mut gz = path.clone().into_os_string();
        gz.push(".gz");
        let gz = PathBuf::from(gz);
        if gz.is_file() {
            return Ok(gz);
        }

        Err(MissingReferenceFile {
            sample: sample.to_string(),
            path,
        })
    }
}

/// Output file for a sample's extracted records: `<out_dir>/<sample>-<category><ext>`
#[must_use]
pub fn output_path(out_dir: &Path, sample: &str, category: SeqCategory) -> PathBuf {
    out_dir.join(format!("{sample}-{}", category.file_name()))
}
