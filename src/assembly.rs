use std::path::Path;

use anyhow::{Context, Result};
use bio::io::fasta;
use serde::{Deserialize, Serialize};

/// A single contig within an assembly.
#[derive(Clone, Debug)]
pub struct Contig {
    pub id: String,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
}

impl Contig {
    pub fn len(&self) -> u64 {
        self.sequence.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Per-contig metadata derived for the duration of one filter call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContigSummary {
    pub id: String,
    pub length: u64,
}

/// An ordered collection of contigs backed by a multi-record FASTA file.
///
/// The order of contigs is the order they appear in the source file and is
/// preserved by every operation in this crate.
#[derive(Clone, Debug)]
pub struct Assembly {
    name: String,
    contigs: Vec<Contig>,
}

impl Assembly {
    pub fn new(name: impl Into<String>, contigs: Vec<Contig>) -> Self {
        Self {
            name: name.into(),
            contigs,
        }
    }

    /// Read every record of a FASTA file into an in-memory assembly.
    pub fn from_fasta(name: impl Into<String>, path: &Path) -> Result<Self> {
        let reader = fasta::Reader::from_file(path)
            .with_context(|| format!("Failed to open FASTA file: {}", path.display()))?;

        let mut contigs = Vec::new();
        for record in reader.records() {
            let record = record
                .with_context(|| format!("Failed to read FASTA record from {}", path.display()))?;
            contigs.push(Contig {
                id: record.id().to_string(),
                description: record.desc().map(|d| d.to_string()),
                sequence: record.seq().to_vec(),
            });
        }

        Ok(Self::new(name, contigs))
    }

    /// Write the assembly as a multi-record FASTA file.
    pub fn to_fasta(&self, path: &Path) -> Result<()> {
        let mut writer = fasta::Writer::to_file(path)
            .with_context(|| format!("Failed to create FASTA file: {}", path.display()))?;

        for contig in &self.contigs {
            writer
                .write(&contig.id, contig.description.as_deref(), &contig.sequence)
                .with_context(|| format!("Failed to write contig {}", contig.id))?;
        }

        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contigs(&self) -> &[Contig] {
        &self.contigs
    }

    pub fn n_contigs(&self) -> u64 {
        self.contigs.len() as u64
    }

    /// Identifier and length of every contig, in source order.
    pub fn summaries(&self) -> Vec<ContigSummary> {
        self.contigs
            .iter()
            .map(|contig| ContigSummary {
                id: contig.id.clone(),
                length: contig.len(),
            })
            .collect()
    }
}
