use std::fmt::Display;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::assembly::{Assembly, Contig, ContigSummary};
use crate::utils::progress_bar;

#[derive(Clone, Copy, Debug, Default)]
pub struct ContigFilterStats {
    // Total number of contigs inspected
    n_total: u64,
    // Number of contigs below the minimum length
    n_failed_min_length: u64,
    // Number of contigs above the maximum length
    n_failed_max_length: u64,
}

impl ContigFilterStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_total(&self) -> u64 {
        self.n_total
    }

    pub fn n_failed(&self) -> u64 {
        self.n_failed_min_length + self.n_failed_max_length
    }
}

impl Display for ContigFilterStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "Total contigs: {}", self.n_total)?;
        writeln!(f, "Failed minimum length: {}", self.n_failed_min_length)?;
        writeln!(f, "Failed maximum length: {}", self.n_failed_max_length)?;
        Ok(())
    }
}

/// Counts returned by a filter run.
///
/// Invariant: `n_initial_contigs = n_contigs_removed + n_contigs_remaining`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCounts {
    pub n_initial_contigs: u64,
    pub n_contigs_removed: u64,
    pub n_contigs_remaining: u64,
}

/// A length filter for assembly contigs.
///
/// Set the minimum and optionally the maximum contig length. The filter is
/// applied to each contig in the assembly; both bounds are inclusive, so a
/// contig exactly at either threshold is kept.
#[derive(Debug)]
pub struct ContigFilter {
    // Minimum contig length
    min_length: u64,
    // Maximum contig length
    max_length: u64,
    // Statistics for the filtering process, shared so the filter can be
    // interrogated after a run
    stats: Arc<Mutex<ContigFilterStats>>,
}

impl Display for ContigFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\tMinimum contig length: {}", self.min_length)?;
        writeln!(f, "\tMaximum contig length: {}", self.max_length)?;
        Ok(())
    }
}

impl ContigFilter {
    pub fn new(min_length: Option<u64>, max_length: Option<u64>) -> Self {
        let min_length = min_length.unwrap_or(0);
        let max_length = max_length.unwrap_or(u64::MAX);

        Self {
            min_length,
            max_length,
            stats: Arc::new(Mutex::new(ContigFilterStats::new())),
        }
    }

    /// Core predicate. Inclusive on both ends.
    pub fn accepts_length(&self, length: u64) -> bool {
        self.stats.lock().unwrap().n_total += 1;

        if length < self.min_length {
            self.stats.lock().unwrap().n_failed_min_length += 1;
            return false;
        }

        if length > self.max_length {
            self.stats.lock().unwrap().n_failed_max_length += 1;
            return false;
        }

        true
    }

    pub fn is_valid(&self, contig: &Contig) -> bool {
        self.accepts_length(contig.len())
    }

    /// Count passing and failing contigs from their metadata alone.
    pub fn count(&self, summaries: &[ContigSummary]) -> FilterCounts {
        let n_initial_contigs = summaries.len() as u64;
        let mut n_contigs_remaining = 0;
        for summary in summaries {
            if self.accepts_length(summary.length) {
                n_contigs_remaining += 1;
            }
        }

        FilterCounts {
            n_initial_contigs,
            n_contigs_removed: n_initial_contigs - n_contigs_remaining,
            n_contigs_remaining,
        }
    }

    /// Partition an assembly into a new assembly holding the surviving
    /// contigs in source order, plus the counts for the run.
    pub fn partition(&self, assembly: &Assembly, output_name: &str) -> (Assembly, FilterCounts) {
        let bar = progress_bar(assembly.n_contigs(), "Filtering contigs".to_string());

        let mut kept = Vec::new();
        for contig in assembly.contigs() {
            if self.is_valid(contig) {
                kept.push(contig.clone());
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        let counts = FilterCounts {
            n_initial_contigs: assembly.n_contigs(),
            n_contigs_removed: assembly.n_contigs() - kept.len() as u64,
            n_contigs_remaining: kept.len() as u64,
        };

        (Assembly::new(output_name, kept), counts)
    }

    pub fn stats(&self) -> ContigFilterStats {
        let stats = self.stats.lock().unwrap();
        *stats
    }
}
