use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which part of the composite identifier is used as the sequence id.
///
/// BLAST databases built from the Ohana catalog name their subjects
/// `SAMPLE_SEQID` (e.g. `HOT234_1_0200m_rep_c55158_2`), while the per-sample
/// reference FASTA files may name records either by the short suffix
/// (`rep_c55158_2`) or by the full composite identifier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum IdMode {
    /// Match reference records by the suffix following the sample prefix
    #[default]
    Suffix,
    /// Match reference records by the full composite identifier
    Full,
}

impl std::fmt::Display for IdMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Suffix => write!(f, "suffix"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// Kind of reference sequence a BLAST database was built from.
///
/// Each category has its own FASTA extension inside a sample directory
/// of the catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum SeqCategory {
    /// Assembled contigs (`contigs.fa`)
    Contigs,
    /// Predicted genes (`genes.fna`)
    Genes,
    /// Translated proteins (`proteins.faa`)
    Proteins,
}

impl SeqCategory {
    pub const ALL: [Self; 3] = [Self::Contigs, Self::Genes, Self::Proteins];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Contigs => "contigs",
            Self::Genes => "genes",
            Self::Proteins => "proteins",
        }
    }

    /// FASTA extension, including the leading dot
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Contigs => ".fa",
            Self::Genes => ".fna",
            Self::Proteins => ".faa",
        }
    }

    /// File name of this category's FASTA, e.g. `genes.fna`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}{}", self.name(), self.extension())
    }
}

impl std::fmt::Display for SeqCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown sequence category '{0}' (expected contigs, genes, or proteins)")]
pub struct UnknownCategory(pub String);

impl FromStr for SeqCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
