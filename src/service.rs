use anyhow::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::filter::{ContigFilter, FilterCounts};
use crate::params::{FilterMaxParams, FilterParams};
use crate::report::FilterReport;
use crate::workspace::{AssemblyStore, MethodContext, ReportStore};

/// Result record of the extended filter operation. All three fields are
/// non-empty on success.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilterMaxResult {
    pub output_assembly_ref: String,
    pub report_name: String,
    pub report_ref: String,
}

/// The contig-filter operations, bound to a workspace backend.
///
/// Each call is a single linear validate -> fetch -> filter -> persist
/// pipeline. External-service errors propagate unmodified; there are no
/// retries and no rollback across the save/report steps.
pub struct ContigFilterService<W> {
    workspace: W,
}

impl<W: AssemblyStore + ReportStore> ContigFilterService<W> {
    pub fn new(workspace: W) -> Self {
        Self { workspace }
    }

    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    /// Basic filter: count contigs at or above `min_length`. Read-only with
    /// respect to the store. Returns a single-element vector holding the
    /// counts record.
    pub fn run_filter(
        &self,
        ctx: &MethodContext,
        params: FilterParams,
    ) -> Result<Vec<FilterCounts>> {
        let config = params.validate()?;
        info!(
            "Filtering {} with min_length {}",
            config.assembly_input_ref, config.min_length
        );

        let assembly = self.workspace.get_assembly(ctx, &config.assembly_input_ref)?;
        let filter = ContigFilter::new(Some(config.min_length), None);
        let counts = filter.count(&assembly.summaries());

        info!(
            "Kept {} of {} contigs",
            counts.n_contigs_remaining, counts.n_initial_contigs
        );

        Ok(vec![counts])
    }

    /// Extended filter: keep contigs with length inside
    /// `[min_length, max_length]`, save the survivors as a new assembly in
    /// the target workspace and create a report for the run.
    pub fn run_filter_max(
        &self,
        ctx: &MethodContext,
        params: FilterMaxParams,
    ) -> Result<Vec<FilterMaxResult>> {
        let config = params.validate()?;

        let assembly = self.workspace.get_assembly(ctx, &config.assembly_input_ref)?;
        let filter = ContigFilter::new(Some(config.min_length), Some(config.max_length));
        debug!("Filter settings:\n{}", filter);

        let output_name = format!("{}.filtered", assembly.name());
        let (filtered, counts) = filter.partition(&assembly, &output_name);

        let output_assembly_ref =
            self.workspace
                .save_assembly(ctx, &config.workspace_name, &output_name, &filtered)?;

        let report = FilterReport::new(
            &config.workspace_name,
            &config.assembly_input_ref,
            &output_assembly_ref,
            &output_name,
            counts,
        );
        let handle = self
            .workspace
            .create_report(ctx, &config.workspace_name, &report)?;

        info!(
            "Saved {} ({} of {} contigs kept)",
            output_assembly_ref, counts.n_contigs_remaining, counts.n_initial_contigs
        );

        Ok(vec![FilterMaxResult {
            output_assembly_ref,
            report_name: handle.name,
            report_ref: handle.reference,
        }])
    }
}
